//! Outcome resolution
//!
//! Decides which side of a round won from the market snapshot and, when
//! the snapshot is inconclusive, from CLOB prices. Tiers run in order of
//! cost and authority:
//!
//! 1. direct winner field
//! 2. outcome prices on the market record
//! 3. last trade per token
//! 4. final sample of the per-token price history
//!
//! A round whose evidence never clears a threshold stays unresolved. A
//! direction is never guessed.

mod engine;
mod thresholds;
mod tiers;
mod types;

pub use engine::OutcomeResolver;
pub use thresholds::{
    Settlement, Thresholds, HISTORY_LOOKAHEAD_SECS, HISTORY_LOOKBACK_SECS, HISTORY_LOSER_MAX,
    HISTORY_WINNER_MIN, LAST_TRADE_WINNER_MIN, PRICE_RATIO_WINNER_MIN,
};
pub use tiers::{direct, map_tokens, price_ratio, TokenPair};
pub use types::{Direction, Resolution, ResolutionMethod, ResolvedRound, RoundError, Stage};
