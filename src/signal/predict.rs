//! Forward prediction from the resolved tail

use super::{NextPrediction, StreakRange, Suggestion};
use crate::resolver::{Direction, ResolvedRound};

/// Suggest reversals for the round after the last resolved one
///
/// Unresolved rounds are dropped first, so the tail is made of the final
/// resolved outcomes even when gaps sit between them. Returns `None` when
/// nothing is resolved; otherwise the prediction is returned even if no
/// tail length in range is unanimous, with empty `suggestions`.
pub fn latest_next_prediction(
    rounds: &[ResolvedRound],
    range: StreakRange,
    round_seconds: i64,
) -> Option<NextPrediction> {
    let resolved: Vec<(&ResolvedRound, Direction)> = rounds
        .iter()
        .filter_map(|r| r.resolved_outcome.map(|dir| (r, dir)))
        .collect();
    let &(last, last_dir) = resolved.last()?;

    let run = resolved
        .iter()
        .rev()
        .take_while(|(_, dir)| *dir == last_dir)
        .count();
    let next_ts = last.ts.saturating_add(round_seconds);

    let suggestions = range
        .iter()
        .take_while(|&n| n as usize <= run)
        .map(|n| Suggestion {
            n,
            prev_dir: last_dir,
            predict_next: last_dir.opposite(),
            next_ts,
        })
        .collect();

    Some(NextPrediction {
        last_resolved_slug: last.slug.clone(),
        last_resolved_ts: last.ts,
        suggestions,
    })
}
