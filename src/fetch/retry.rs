//! Retry loop with exponential backoff and per-attempt timeout

use super::{FetchError, FetchPolicy, HttpTransport};
use crate::telemetry::{self, LatencyMetric};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sleep capability used between retries
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleep
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Fetches JSON with timeout, retry and exponential backoff
#[derive(Clone)]
pub struct ResilientFetcher {
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: FetchPolicy,
}

impl ResilientFetcher {
    /// Create a fetcher that sleeps on the tokio timer
    pub fn new(transport: Arc<dyn HttpTransport>, policy: FetchPolicy) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            policy,
        }
    }

    /// Replace the backoff sleeper
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Fetch with the fetcher's default policy
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.fetch_json_with(url, self.policy).await
    }

    /// Fetch with an explicit policy
    ///
    /// After `policy.retries` extra attempts the last observed error is
    /// returned. No backoff sleep follows the final attempt.
    pub async fn fetch_json_with(
        &self,
        url: &str,
        policy: FetchPolicy,
    ) -> Result<Value, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            let started = Instant::now();
            telemetry::record_fetch_attempt();

            let outcome =
                match tokio::time::timeout(policy.timeout, self.transport.get_json(url)).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout {
                        url: url.to_string(),
                        timeout_ms: policy.timeout.as_millis() as u64,
                    }),
                };

            telemetry::record_latency(LatencyMetric::Fetch, started.elapsed());

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            telemetry::record_fetch_failure(err.reason());

            if attempt >= policy.retries {
                tracing::warn!(
                    url = %url,
                    attempts = attempt + 1,
                    error = %err,
                    "Fetch failed after all retries"
                );
                return Err(err);
            }

            let delay = policy.backoff_for(attempt);
            tracing::debug!(
                url = %url,
                attempt = attempt + 1,
                max_attempts = policy.max_attempts(),
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Fetch attempt failed, backing off"
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}
