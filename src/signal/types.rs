//! Signal types

use crate::resolver::Direction;
use serde::Serialize;
use std::collections::BTreeMap;

/// Inclusive range of streak lengths to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakRange {
    pub min: u32,
    pub max: u32,
}

impl StreakRange {
    /// Range `[min, max]`; `min` is raised to 1 and `max` to `min`
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.min..=self.max
    }
}

/// Reversal prediction for one round after an `n`-round streak
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Streak length
    pub n: u32,
    pub ts: i64,
    pub slug: String,
    /// Direction shared by the `n` preceding rounds
    pub prev_dir: Direction,
    /// Always the opposite of `prev_dir`
    pub prediction: Direction,
    pub actual: Direction,
    pub correct: bool,
}

/// Win statistics for one streak length
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NSummary {
    pub signals: usize,
    pub wins: usize,
    /// `wins / signals`, absent when there are no signals
    pub win_rate: Option<f64>,
    pub up_streak_signals: usize,
    pub up_streak_wins: usize,
    pub up_streak_win_rate: Option<f64>,
    pub down_streak_signals: usize,
    pub down_streak_wins: usize,
    pub down_streak_win_rate: Option<f64>,
}

/// Streak length -> statistics, one entry per length in range
pub type SummaryByN = BTreeMap<u32, NSummary>;

/// Reversal suggestion for the round after the last resolved one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub n: u32,
    pub prev_dir: Direction,
    pub predict_next: Direction,
    pub next_ts: i64,
}

/// Forward prediction derived from the resolved tail of the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPrediction {
    pub last_resolved_slug: String,
    pub last_resolved_ts: i64,
    /// Empty when no tail length in range is unanimous
    pub suggestions: Vec<Suggestion>,
}
