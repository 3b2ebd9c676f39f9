//! Settlement thresholds
//!
//! These are the most heavily tuned parameters of the resolver. A settled
//! round trades at ~1.00/~0.00, but prices converge toward that well before
//! settlement is final. A 0.90 winner threshold on live prices produced
//! false positives on rounds that later flipped, so the tiers reading
//! recent prices require 0.99. The history tier reads the final sample of
//! an already-closed window, where 0.90/0.10 is conclusive in practice and
//! a tighter bound would leave old rounds unresolved.

use super::Direction;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Winner price the primary outcome-price tier must reach
pub const PRICE_RATIO_WINNER_MIN: Decimal = dec!(0.99);
/// Winner price the last-trade tier must reach
pub const LAST_TRADE_WINNER_MIN: Decimal = dec!(0.99);
/// Winner price the history tier must reach
pub const HISTORY_WINNER_MIN: Decimal = dec!(0.90);
/// Loser price the history tier must not exceed
pub const HISTORY_LOSER_MAX: Decimal = dec!(0.10);

/// History window start, relative to the round timestamp
pub const HISTORY_LOOKBACK_SECS: i64 = 30 * 60;
/// History window end, relative to the round timestamp
pub const HISTORY_LOOKAHEAD_SECS: i64 = 2 * 60 * 60;

/// Bounds an up/down price pair must satisfy to count as settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Minimum price of the winning side
    pub winner_min: Decimal,
    /// Maximum price of the losing side, unchecked when `None`
    pub loser_max: Option<Decimal>,
}

impl Settlement {
    /// Winning side if the pair is conclusive; ties are never conclusive
    pub fn decide(&self, up: Decimal, down: Decimal) -> Option<Direction> {
        if up == down {
            return None;
        }
        let (winner, hi, lo) = if up > down {
            (Direction::Up, up, down)
        } else {
            (Direction::Down, down, up)
        };

        if hi < self.winner_min {
            return None;
        }
        if let Some(max) = self.loser_max {
            if lo > max {
                return None;
            }
        }
        Some(winner)
    }
}

/// Thresholds for every price-based tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub price_ratio_winner_min: Decimal,
    pub last_trade: Settlement,
    pub history: Settlement,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            price_ratio_winner_min: PRICE_RATIO_WINNER_MIN,
            last_trade: Settlement {
                winner_min: LAST_TRADE_WINNER_MIN,
                loser_max: None,
            },
            history: Settlement {
                winner_min: HISTORY_WINNER_MIN,
                loser_max: Some(HISTORY_LOSER_MAX),
            },
        }
    }
}
