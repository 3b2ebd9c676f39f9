//! Streak detection and per-length statistics

use super::{NSummary, Signal, StreakRange, SummaryByN};
use crate::resolver::{Direction, ResolvedRound};
use std::collections::BTreeMap;

/// Emit a signal for every resolved round and every `n` in range whose `n`
/// immediately preceding rounds are resolved and unanimous
///
/// Signals come out ordered by round, then by ascending `n`.
pub fn compute_signals(rounds: &[ResolvedRound], range: StreakRange) -> Vec<Signal> {
    let mut signals = Vec::new();

    for (i, round) in rounds.iter().enumerate() {
        let Some(actual) = round.resolved_outcome else {
            continue;
        };
        let Some((prev_dir, run)) = preceding_run(&rounds[..i]) else {
            continue;
        };

        // A window longer than the run is broken by construction
        let longest = range.max.min(run);
        for n in range.min..=longest {
            let prediction = prev_dir.opposite();
            signals.push(Signal {
                n,
                ts: round.ts,
                slug: round.slug.clone(),
                prev_dir,
                prediction,
                actual,
                correct: prediction == actual,
            });
        }
    }

    signals
}

/// Direction and length of the unanimous resolved run ending the slice
fn preceding_run(before: &[ResolvedRound]) -> Option<(Direction, u32)> {
    let dir = before.last()?.resolved_outcome?;
    let run = before
        .iter()
        .rev()
        .take_while(|r| r.resolved_outcome == Some(dir))
        .count();
    Some((dir, u32::try_from(run).unwrap_or(u32::MAX)))
}

/// Reduce to one signal per round, keeping the longest streak
///
/// Output is ordered by timestamp.
pub fn dedupe_longest(signals: &[Signal]) -> Vec<Signal> {
    let mut longest: BTreeMap<i64, &Signal> = BTreeMap::new();
    for signal in signals {
        longest
            .entry(signal.ts)
            .and_modify(|kept| {
                if signal.n > kept.n {
                    *kept = signal;
                }
            })
            .or_insert(signal);
    }
    longest.into_values().cloned().collect()
}

/// Win statistics for every `n` in range, including lengths with no signals
///
/// Signals whose `n` falls outside the range are ignored.
pub fn summarize(signals: &[Signal], range: StreakRange) -> SummaryByN {
    let mut by_n: SummaryByN = range.iter().map(|n| (n, NSummary::default())).collect();

    for signal in signals {
        let Some(entry) = by_n.get_mut(&signal.n) else {
            continue;
        };
        let won = usize::from(signal.correct);
        entry.signals += 1;
        entry.wins += won;
        match signal.prev_dir {
            Direction::Up => {
                entry.up_streak_signals += 1;
                entry.up_streak_wins += won;
            }
            Direction::Down => {
                entry.down_streak_signals += 1;
                entry.down_streak_wins += won;
            }
        }
    }

    for entry in by_n.values_mut() {
        entry.win_rate = win_rate(entry.wins, entry.signals);
        entry.up_streak_win_rate = win_rate(entry.up_streak_wins, entry.up_streak_signals);
        entry.down_streak_win_rate = win_rate(entry.down_streak_wins, entry.down_streak_signals);
    }

    by_n
}

fn win_rate(wins: usize, signals: usize) -> Option<f64> {
    (signals > 0).then(|| wins as f64 / signals as f64)
}
