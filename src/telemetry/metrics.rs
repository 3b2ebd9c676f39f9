//! Prometheus metrics

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Single upstream HTTP attempt
    Fetch,
    /// Full resolution of one round, all tiers included
    RoundResolution,
    /// Whole backtest run
    Backtest,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Rounds with a resolved outcome in the last run
    ResolvedRounds,
    /// Signals emitted in the last run
    Signals,
    /// Per-round errors in the last run
    RoundErrors,
}

const FETCH_ATTEMPTS: &str = "polystreak_fetch_attempts_total";
const FETCH_FAILURES: &str = "polystreak_fetch_failures_total";
const ROUNDS: &str = "polystreak_rounds_total";

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::Fetch => "polystreak_fetch_latency_ms",
        LatencyMetric::RoundResolution => "polystreak_round_resolution_latency_ms",
        LatencyMetric::Backtest => "polystreak_backtest_latency_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::ResolvedRounds => "polystreak_resolved_rounds",
        GaugeMetric::Signals => "polystreak_signals",
        GaugeMetric::RoundErrors => "polystreak_round_errors",
    };

    metrics::gauge!(metric_name).set(value);
}

/// Count one upstream request attempt
pub fn record_fetch_attempt() {
    metrics::counter!(FETCH_ATTEMPTS).increment(1);
}

/// Count one failed upstream attempt by failure reason
pub fn record_fetch_failure(reason: &'static str) {
    metrics::counter!(FETCH_FAILURES, "reason" => reason).increment(1);
}

/// Count one finished round by the method that decided it
pub fn record_round(method: &'static str) {
    metrics::counter!(ROUNDS, "method" => method).increment(1);
}
