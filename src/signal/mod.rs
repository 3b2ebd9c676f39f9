//! Streak signal engine
//!
//! Works on a timeline of resolved rounds sorted ascending by timestamp.
//! Everything here is synchronous and pure.

mod predict;
mod streak;
mod types;

pub use predict::latest_next_prediction;
pub use streak::{compute_signals, dedupe_longest, summarize};
pub use types::{NSummary, NextPrediction, Signal, StreakRange, Suggestion, SummaryByN};
