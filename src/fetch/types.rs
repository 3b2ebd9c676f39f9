//! Fetch policy and error types

use std::time::Duration;
use thiserror::Error;

/// Retry, backoff and timeout settings for a single logical request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Extra attempts after the first one
    pub retries: u32,
    /// Base backoff; attempt `k` waits `backoff * 2^k`
    pub backoff: Duration,
    /// Upper bound on each individual attempt
    pub timeout: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff: Duration::from_millis(250),
            timeout: Duration::from_secs(9),
        }
    }
}

impl FetchPolicy {
    /// Delay to wait after the given zero-based failed attempt
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }

    /// Total number of attempts, including the first
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Failure of a single fetch attempt
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
    /// Connection or transport level failure
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
    /// Attempt exceeded the policy timeout and was cancelled
    #[error("timeout after {timeout_ms}ms for {url}")]
    Timeout { url: String, timeout_ms: u64 },
    /// Body was not valid JSON
    #[error("invalid JSON from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    /// Short label used for metrics and diagnostics
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "status",
            FetchError::Network { .. } => "network",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Decode { .. } => "decode",
        }
    }

    /// URL of the failed request
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Network { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.retries, 2);
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = FetchPolicy {
            retries: 4,
            backoff: Duration::from_millis(100),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(policy.backoff_for(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = FetchPolicy {
            retries: u32::MAX,
            backoff: Duration::from_secs(1),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(policy.max_attempts(), u32::MAX);
        assert!(policy.backoff_for(40) >= Duration::from_secs(u64::from(u32::MAX)));
    }

    #[test]
    fn test_error_display_and_reason() {
        let err = FetchError::Status {
            status: 503,
            url: "https://example.com/x".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 for https://example.com/x");
        assert_eq!(err.reason(), "status");
        assert_eq!(err.url(), "https://example.com/x");

        let err = FetchError::Timeout {
            url: "u".to_string(),
            timeout_ms: 50,
        };
        assert_eq!(err.reason(), "timeout");
        assert!(err.to_string().contains("50ms"));
    }
}
