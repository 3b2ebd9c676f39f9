//! Backtest analytics and reporting

use super::BacktestParams;
use crate::resolver::{Direction, ResolvedRound};
use crate::signal::{dedupe_longest, NextPrediction, Signal, SummaryByN};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

/// Maximum number of error origins listed in diagnostics
const TOP_ERRORS: usize = 8;

/// Echo of the parameters a report was computed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestInput {
    pub base_slug: String,
    #[serde(flatten)]
    pub params: BacktestParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub rounds: usize,
    pub resolved_rounds: usize,
    pub signals: usize,
}

/// Count of failed rounds for one origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorCount {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub total_errors: usize,
    /// Most frequent origins, by descending count
    pub top_errors: Vec<ErrorCount>,
}

impl Diagnostics {
    /// Tally failed rounds by error origin
    ///
    /// Unresolved rounds are a terminal state, not a failure, and are not
    /// counted.
    pub fn from_rounds(rounds: &[ResolvedRound]) -> Self {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        for origin in rounds.iter().filter_map(|r| r.error_origin) {
            *counts.entry(origin).or_default() += 1;
        }

        let total_errors = counts.values().sum();
        let mut top_errors: Vec<ErrorCount> = counts
            .into_iter()
            .map(|(key, count)| ErrorCount {
                key: key.to_string(),
                count,
            })
            .collect();
        top_errors.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        top_errors.truncate(TOP_ERRORS);

        Self {
            total_errors,
            top_errors,
        }
    }
}

/// One cell of the recent-rounds strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundStrip {
    pub slug: String,
    pub ts: i64,
    pub outcome: Option<Direction>,
}

/// Complete backtest results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub input: BacktestInput,
    pub totals: Totals,
    pub by_n: SummaryByN,
    pub next_prediction: Option<NextPrediction>,
    pub diagnostics: Diagnostics,
    /// Last `strip_count` rounds, oldest first
    pub recent_rounds: Vec<RoundStrip>,
    /// Last `signals_limit` signals after one-per-round reduction
    pub recent_signals: Vec<Signal>,
    /// Full timeline, ascending by timestamp
    #[serde(skip)]
    pub rounds: Vec<ResolvedRound>,
}

impl BacktestReport {
    /// Assemble a report from a sorted timeline and its signals
    pub fn new(
        input: BacktestInput,
        rounds: Vec<ResolvedRound>,
        signals: &[Signal],
        by_n: SummaryByN,
        next_prediction: Option<NextPrediction>,
    ) -> Self {
        let totals = Totals {
            rounds: rounds.len(),
            resolved_rounds: rounds.iter().filter(|r| r.is_resolved()).count(),
            signals: signals.len(),
        };

        let recent_rounds = last_n(&rounds, input.params.strip_count)
            .iter()
            .map(|r| RoundStrip {
                slug: r.slug.clone(),
                ts: r.ts,
                outcome: r.resolved_outcome,
            })
            .collect();

        let deduped = dedupe_longest(signals);
        let recent_signals = last_n(&deduped, input.params.signals_limit).to_vec();

        Self {
            diagnostics: Diagnostics::from_rounds(&rounds),
            input,
            totals,
            by_n,
            next_prediction,
            recent_rounds,
            recent_signals,
            rounds,
        }
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        let rule = "═".repeat(62);
        let thin = "─".repeat(62);

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "               STREAK REVERSAL BACKTEST");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "Base: {}  ({} rounds x {}s, offset {})",
            self.input.base_slug,
            self.input.params.count,
            self.input.params.round_seconds,
            self.input.params.offset
        );
        let _ = writeln!(
            out,
            "Resolved: {}/{}   Signals: {}   Errors: {}",
            self.totals.resolved_rounds,
            self.totals.rounds,
            self.totals.signals,
            self.diagnostics.total_errors
        );

        let _ = writeln!(out, "\nWIN RATE BY STREAK LENGTH");
        let _ = writeln!(out, "{}", thin);
        let _ = writeln!(
            out,
            "{:>4} {:>8} {:>6} {:>8} {:>10} {:>10}",
            "n", "signals", "wins", "rate", "after Up", "after Down"
        );
        for (n, s) in &self.by_n {
            let _ = writeln!(
                out,
                "{:>4} {:>8} {:>6} {:>8} {:>10} {:>10}",
                n,
                s.signals,
                s.wins,
                pct(s.win_rate),
                pct(s.up_streak_win_rate),
                pct(s.down_streak_win_rate)
            );
        }

        let _ = writeln!(out, "\nNEXT ROUND");
        let _ = writeln!(out, "{}", thin);
        match &self.next_prediction {
            None => {
                let _ = writeln!(out, "No resolved rounds");
            }
            Some(next) if next.suggestions.is_empty() => {
                let _ = writeln!(
                    out,
                    "Last resolved {}: no streak in range",
                    next.last_resolved_slug
                );
            }
            Some(next) => {
                let _ = writeln!(out, "Last resolved {}", next.last_resolved_slug);
                for s in &next.suggestions {
                    let _ = writeln!(
                        out,
                        "  n={:<3} {} streak -> predict {} at {}",
                        s.n, s.prev_dir, s.predict_next, s.next_ts
                    );
                }
            }
        }

        if !self.recent_rounds.is_empty() {
            let strip: Vec<&str> = self
                .recent_rounds
                .iter()
                .map(|r| match r.outcome {
                    Some(Direction::Up) => "U",
                    Some(Direction::Down) => "D",
                    None => "?",
                })
                .collect();
            let _ = writeln!(out, "\nRecent: {}", strip.join(" "));
        }

        if !self.diagnostics.top_errors.is_empty() {
            let _ = writeln!(out, "\nERRORS");
            let _ = writeln!(out, "{}", thin);
            for e in &self.diagnostics.top_errors {
                let _ = writeln!(out, "{:<20} {}", e.key, e.count);
            }
        }
        let _ = writeln!(out, "{}", rule);

        out
    }
}

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn pct(rate: Option<f64>) -> String {
    rate.map_or_else(|| "-".to_string(), |r| format!("{:.1}%", r * 100.0))
}
