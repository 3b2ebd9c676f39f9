//! Backtesting module
//!
//! Resolves a receding window of rounds and scores the streak-reversal rule
//! against it.

mod analytics;
mod pool;
mod runner;
mod window;

pub use analytics::{BacktestInput, BacktestReport, Diagnostics, ErrorCount, RoundStrip, Totals};
pub use pool::{run_pool, run_pool_paced};
pub use runner::Backtester;
pub use window::{resolve_latest_window, Clock, LatestWindow, SystemClock};

use crate::market::SlugError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Series used when neither a base slug nor a prefix is given
pub const DEFAULT_SERIES_PREFIX: &str = "btc-updown-5m-";

/// Backtest-level failures; per-round failures never surface here
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BacktestError {
    #[error("invalid base slug: {0}")]
    InvalidBaseSlug(#[from] SlugError),
    #[error("could not determine a base round: {0}")]
    NoBaseRound(String),
}

/// Backtest options as given by the caller
///
/// Numbers are taken as floats so that fractional and non-finite inputs can
/// be normalized by [`BacktestOptions::params`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BacktestOptions {
    /// Round to count back from; ignored when `use_latest` is set
    pub base_slug: Option<String>,
    /// Count back from the latest resolved window of `series_prefix`
    pub use_latest: bool,
    pub series_prefix: Option<String>,
    pub count: Option<f64>,
    pub offset: Option<f64>,
    pub min_streak: Option<f64>,
    pub max_streak: Option<f64>,
    pub round_seconds: Option<f64>,
    pub concurrency: Option<f64>,
    pub strip_count: Option<f64>,
    pub signals_limit: Option<f64>,
    /// Pause each runner takes between rounds, in milliseconds
    pub pace_ms: Option<f64>,
}

/// Normalized backtest parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestParams {
    pub series_prefix: String,
    pub count: usize,
    pub offset: u32,
    pub min_streak: u32,
    pub max_streak: u32,
    pub round_seconds: i64,
    pub concurrency: usize,
    pub strip_count: usize,
    pub signals_limit: usize,
    pub pace_ms: u64,
}

impl BacktestOptions {
    /// Clamp every numeric option into its range
    ///
    /// Absent or non-finite values take the default, others are truncated
    /// toward zero and clamped. `max_streak` is clamped against the already
    /// normalized `min_streak`.
    pub fn params(&self) -> BacktestParams {
        let min_streak = clamp_int(self.min_streak, 1, 500, 3);
        let series_prefix = self
            .series_prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_SERIES_PREFIX)
            .to_string();

        BacktestParams {
            series_prefix,
            count: clamp_int(self.count, 2, 300, 100) as usize,
            offset: clamp_int(self.offset, 0, 120, 1) as u32,
            min_streak: min_streak as u32,
            max_streak: clamp_int(self.max_streak, min_streak, 500, 8) as u32,
            round_seconds: clamp_int(self.round_seconds, 60, 3600, 300),
            concurrency: clamp_int(self.concurrency, 1, 8, 4) as usize,
            strip_count: clamp_int(self.strip_count, 0, 100, 12) as usize,
            signals_limit: clamp_int(self.signals_limit, 0, 200, 25) as usize,
            pace_ms: clamp_int(self.pace_ms, 0, 5_000, 0) as u64,
        }
    }

    /// Overlay `other` on top of `self`, field by field
    pub fn merged(&self, other: &BacktestOptions) -> BacktestOptions {
        BacktestOptions {
            base_slug: other.base_slug.clone().or_else(|| self.base_slug.clone()),
            use_latest: other.use_latest || self.use_latest,
            series_prefix: other
                .series_prefix
                .clone()
                .or_else(|| self.series_prefix.clone()),
            count: other.count.or(self.count),
            offset: other.offset.or(self.offset),
            min_streak: other.min_streak.or(self.min_streak),
            max_streak: other.max_streak.or(self.max_streak),
            round_seconds: other.round_seconds.or(self.round_seconds),
            concurrency: other.concurrency.or(self.concurrency),
            strip_count: other.strip_count.or(self.strip_count),
            signals_limit: other.signals_limit.or(self.signals_limit),
            pace_ms: other.pace_ms.or(self.pace_ms),
        }
    }
}

/// Truncate and clamp to `[min, max]`, `fallback` when absent or non-finite
fn clamp_int(value: Option<f64>, min: i64, max: i64, fallback: i64) -> i64 {
    match value {
        Some(v) if v.is_finite() => (v.trunc() as i64).clamp(min, max.max(min)),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = BacktestOptions::default().params();
        assert_eq!(
            params,
            BacktestParams {
                series_prefix: DEFAULT_SERIES_PREFIX.to_string(),
                count: 100,
                offset: 1,
                min_streak: 3,
                max_streak: 8,
                round_seconds: 300,
                concurrency: 4,
                strip_count: 12,
                signals_limit: 25,
                pace_ms: 0,
            }
        );
    }

    #[test]
    fn test_clamping() {
        let options = BacktestOptions {
            count: Some(0.0),
            offset: Some(500.0),
            min_streak: Some(-3.0),
            max_streak: Some(9999.0),
            round_seconds: Some(30.0),
            concurrency: Some(64.0),
            strip_count: Some(-1.0),
            signals_limit: Some(1e9),
            pace_ms: Some(60_000.0),
            ..Default::default()
        };
        let params = options.params();
        assert_eq!(params.count, 2);
        assert_eq!(params.offset, 120);
        assert_eq!(params.min_streak, 1);
        assert_eq!(params.max_streak, 500);
        assert_eq!(params.round_seconds, 60);
        assert_eq!(params.concurrency, 8);
        assert_eq!(params.strip_count, 0);
        assert_eq!(params.signals_limit, 200);
        assert_eq!(params.pace_ms, 5_000);
    }

    #[test]
    fn test_non_finite_and_fractional() {
        let options = BacktestOptions {
            count: Some(f64::NAN),
            offset: Some(f64::INFINITY),
            min_streak: Some(4.9),
            round_seconds: Some(899.99),
            ..Default::default()
        };
        let params = options.params();
        assert_eq!(params.count, 100);
        assert_eq!(params.offset, 1);
        assert_eq!(params.min_streak, 4);
        assert_eq!(params.round_seconds, 899);
    }

    #[test]
    fn test_max_streak_never_below_min() {
        let options = BacktestOptions {
            min_streak: Some(12.0),
            max_streak: Some(5.0),
            ..Default::default()
        };
        let params = options.params();
        assert_eq!(params.min_streak, 12);
        assert_eq!(params.max_streak, 12);

        // The default max is clamped as well
        let options = BacktestOptions {
            min_streak: Some(20.0),
            ..Default::default()
        };
        assert_eq!(options.params().max_streak, 20);
    }

    #[test]
    fn test_blank_prefix_uses_default() {
        let options = BacktestOptions {
            series_prefix: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(options.params().series_prefix, DEFAULT_SERIES_PREFIX);
    }

    #[test]
    fn test_merged_prefers_overrides() {
        let base = BacktestOptions {
            series_prefix: Some("eth-updown-15m-".to_string()),
            count: Some(50.0),
            round_seconds: Some(900.0),
            ..Default::default()
        };
        let overrides = BacktestOptions {
            count: Some(20.0),
            use_latest: true,
            ..Default::default()
        };
        let merged = base.merged(&overrides);
        assert_eq!(merged.count, Some(20.0));
        assert_eq!(merged.round_seconds, Some(900.0));
        assert_eq!(merged.series_prefix.as_deref(), Some("eth-updown-15m-"));
        assert!(merged.use_latest);
    }
}
