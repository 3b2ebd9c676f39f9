//! Backtest notifications
//!
//! The runner reports progress through a [`Notifier`] at two points: after
//! each round resolves and after the batch completes. Both hooks default to
//! doing nothing.

mod discord;

pub use discord::DiscordNotifier;

use crate::backtest::BacktestReport;
use crate::resolver::ResolvedRound;
use async_trait::async_trait;

/// Receiver of backtest events
///
/// Implementations must not fail the run; delivery errors are logged.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn round_resolved(&self, _round: &ResolvedRound) {}

    async fn batch_complete(&self, _report: &BacktestReport) {}
}

/// Notifier that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {}
