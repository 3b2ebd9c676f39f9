//! Backtest orchestration

use super::{
    resolve_latest_window, run_pool_paced, BacktestError, BacktestInput, BacktestOptions,
    BacktestParams, BacktestReport, Clock, LatestWindow, SystemClock,
};
use crate::config::Config;
use crate::fetch::{ReqwestTransport, ResilientFetcher};
use crate::market::{sequence, ClobClient, GammaClient, RoundId};
use crate::notify::{DiscordNotifier, NoopNotifier, Notifier};
use crate::resolver::{OutcomeResolver, ResolvedRound, RoundError, Stage};
use crate::signal::{compute_signals, latest_next_prediction, summarize, StreakRange};
use crate::telemetry::{self, GaugeMetric, LatencyMetric};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Resolves rounds and scores the streak-reversal rule
#[derive(Clone)]
pub struct Backtester {
    gamma: GammaClient,
    resolver: OutcomeResolver,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl Backtester {
    pub fn new(gamma: GammaClient, resolver: OutcomeResolver) -> Self {
        Self {
            gamma,
            resolver,
            notifier: Arc::new(NoopNotifier),
            clock: Arc::new(SystemClock),
        }
    }

    /// Build against the real upstream APIs described by `config`
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let upstream = &config.upstream;
        let transport = Arc::new(ReqwestTransport::new(&upstream.user_agent)?);
        let fetcher = ResilientFetcher::new(transport, upstream.fetch_policy());

        let gamma = GammaClient::new(fetcher.clone(), &upstream.gamma_url)?;
        let clob = ClobClient::new(fetcher, &upstream.clob_url)?;
        let mut backtester = Self::new(gamma, OutcomeResolver::new(clob));

        if let Some(url) = config.notify.discord_webhook_url.as_deref() {
            info!("Discord notifications enabled");
            let discord = DiscordNotifier::new(url.to_string(), config.notify.timeout())?;
            backtester = backtester.with_notifier(Arc::new(discord));
        }

        Ok(backtester)
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Round boundaries of a series at the current time
    pub fn latest_window(&self, prefix: &str, round_seconds: i64) -> LatestWindow {
        resolve_latest_window(prefix, round_seconds, self.clock.now())
    }

    /// Run a full backtest
    ///
    /// Fails only when no base round can be determined; every per-round
    /// failure is recorded in the report instead.
    pub async fn run(&self, options: &BacktestOptions) -> Result<BacktestReport, BacktestError> {
        let started = Instant::now();
        let params = options.params();
        let base = self.base_round(options, &params)?;

        let ids = sequence(&base, params.count, params.offset, params.round_seconds);
        info!(
            base = %base,
            rounds = ids.len(),
            concurrency = params.concurrency,
            "Starting backtest"
        );

        let pace = Duration::from_millis(params.pace_ms);
        let mut rounds = run_pool_paced(&ids, params.concurrency, pace, |id| {
            self.resolve_round(id.clone())
        })
        .await;
        rounds.sort_by_key(|r| r.ts);

        let range = StreakRange::new(params.min_streak, params.max_streak);
        let signals = compute_signals(&rounds, range);
        let by_n = summarize(&signals, range);
        let next_prediction = latest_next_prediction(&rounds, range, params.round_seconds);

        let input = BacktestInput {
            base_slug: base.slug(),
            params,
        };
        let report = BacktestReport::new(input, rounds, &signals, by_n, next_prediction);

        telemetry::set_gauge(GaugeMetric::ResolvedRounds, report.totals.resolved_rounds as f64);
        telemetry::set_gauge(GaugeMetric::Signals, report.totals.signals as f64);
        telemetry::set_gauge(GaugeMetric::RoundErrors, report.diagnostics.total_errors as f64);
        telemetry::record_latency(LatencyMetric::Backtest, started.elapsed());

        info!(
            rounds = report.totals.rounds,
            resolved = report.totals.resolved_rounds,
            signals = report.totals.signals,
            errors = report.diagnostics.total_errors,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Backtest complete"
        );

        self.notifier.batch_complete(&report).await;
        Ok(report)
    }

    /// Explicit base slug, else the latest resolved window of the series
    fn base_round(
        &self,
        options: &BacktestOptions,
        params: &BacktestParams,
    ) -> Result<RoundId, BacktestError> {
        let explicit = options
            .base_slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match explicit {
            Some(slug) if !options.use_latest => Ok(RoundId::parse(slug)?),
            _ => {
                if !params.series_prefix.ends_with('-') {
                    return Err(BacktestError::NoBaseRound(format!(
                        "series prefix {:?} must end with '-'",
                        params.series_prefix
                    )));
                }
                let window = self.latest_window(&params.series_prefix, params.round_seconds);
                debug!(base = %window.latest_resolved_slug, "Using latest resolved window");
                Ok(window.latest_resolved)
            }
        }
    }

    /// Resolve a single round named by its slug
    ///
    /// Only an unparsable slug is an error; upstream failures and
    /// unresolved outcomes are recorded in the returned round.
    pub async fn resolve_slug(&self, slug: &str) -> Result<ResolvedRound, RoundError> {
        let id = RoundId::parse(slug.trim())?;
        Ok(self.resolve_round(id).await)
    }

    /// Resolve one round; failures are encoded in the record
    async fn resolve_round(&self, id: RoundId) -> ResolvedRound {
        let started = Instant::now();
        let slug = id.slug();

        let round = match self.gamma.fetch_market(&slug).await {
            Ok(market) => match self.resolver.resolve(&market, id.timestamp).await {
                Ok(resolution) => ResolvedRound::from_resolution(&id, resolution),
                Err(e) => ResolvedRound::failed(&id, &e),
            },
            Err(source) => ResolvedRound::failed(
                &id,
                &RoundError::UpstreamUnavailable {
                    stage: Stage::MarketLookup,
                    source,
                },
            ),
        };

        telemetry::record_latency(LatencyMetric::RoundResolution, started.elapsed());
        telemetry::record_round(round_label(&round));
        debug!(
            slug = %round.slug,
            outcome = ?round.resolved_outcome,
            method = ?round.method,
            error = ?round.error,
            "Round finished"
        );

        self.notifier.round_resolved(&round).await;
        round
    }
}

/// Metrics label of a finished round
fn round_label(round: &ResolvedRound) -> &'static str {
    match (round.resolved_outcome, round.method, round.error_origin) {
        (Some(_), Some(method), _) => method.as_str(),
        (_, _, Some(_)) => "error",
        _ => "unresolved",
    }
}
