//! Tiered resolver over a market snapshot and the CLOB

use super::thresholds::{HISTORY_LOOKAHEAD_SECS, HISTORY_LOOKBACK_SECS};
use super::tiers::{direct, map_tokens, price_ratio, TokenPair};
use super::{Resolution, ResolutionMethod, RoundError, Stage, Thresholds};
use crate::market::{ClobClient, MarketSnapshot};

/// Runs the tier chain for one round
#[derive(Clone)]
pub struct OutcomeResolver {
    clob: ClobClient,
    thresholds: Thresholds,
}

impl OutcomeResolver {
    pub fn new(clob: ClobClient) -> Self {
        Self {
            clob,
            thresholds: Thresholds::default(),
        }
    }

    /// Override the settlement thresholds
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Resolve the round starting at `ts` described by `market`
    ///
    /// Returns an unresolved [`Resolution`] when every tier ran without
    /// conclusive evidence. Errors are limited to a missing token mapping
    /// and an unreachable price history.
    pub async fn resolve(
        &self,
        market: &MarketSnapshot,
        ts: i64,
    ) -> Result<Resolution, RoundError> {
        if let Some(resolution) = direct(market) {
            return Ok(resolution);
        }
        if let Some(resolution) = price_ratio(market, self.thresholds.price_ratio_winner_min) {
            return Ok(resolution);
        }

        let tokens = map_tokens(market)?;

        if let Some(resolution) = self.last_trade(&tokens, ts).await {
            return Ok(resolution);
        }

        self.price_history(&tokens, ts).await
    }

    /// Last-trade tier; any failure falls through to the history tier
    async fn last_trade(&self, tokens: &TokenPair, ts: i64) -> Option<Resolution> {
        let (up, down) = tokio::join!(
            self.clob.last_trade_price(&tokens.up),
            self.clob.last_trade_price(&tokens.down),
        );

        match (up, down) {
            (Ok(Some(up)), Ok(Some(down))) => {
                match self.thresholds.last_trade.decide(up, down) {
                    Some(outcome) => Some(Resolution::settled(
                        outcome,
                        ResolutionMethod::LastTrade,
                        Some(up),
                        Some(down),
                    )),
                    None => {
                        tracing::debug!(ts, %up, %down, "Last trades inconclusive");
                        None
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!(ts, error = %e, "Last trade unavailable, using price history");
                None
            }
            _ => {
                tracing::debug!(ts, "Last trade missing for a token, using price history");
                None
            }
        }
    }

    async fn price_history(&self, tokens: &TokenPair, ts: i64) -> Result<Resolution, RoundError> {
        let start = ts.saturating_sub(HISTORY_LOOKBACK_SECS);
        let end = ts.saturating_add(HISTORY_LOOKAHEAD_SECS);

        let (up, down) = tokio::join!(
            self.clob.final_history_price(&tokens.up, start, end),
            self.clob.final_history_price(&tokens.down, start, end),
        );
        let unavailable = |source| RoundError::UpstreamUnavailable {
            stage: Stage::PriceHistory,
            source,
        };
        let up = up.map_err(unavailable)?;
        let down = down.map_err(unavailable)?;

        if let (Some(u), Some(d)) = (up, down) {
            if let Some(outcome) = self.thresholds.history.decide(u, d) {
                return Ok(Resolution::settled(
                    outcome,
                    ResolutionMethod::PriceHistory,
                    up,
                    down,
                ));
            }
        }

        Ok(Resolution::unresolved(
            ResolutionMethod::PriceHistory,
            up,
            down,
        ))
    }
}
