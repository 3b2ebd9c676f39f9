//! Latest-window computation

use crate::market::RoundId;
use serde::Serialize;

/// Source of the current unix time
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Round boundaries around `now`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestWindow {
    /// Round containing `now`, possibly still trading
    pub latest_existing_slug: String,
    /// Round before it, the most recent one that can have settled
    pub latest_resolved_slug: String,
    pub next_slug: String,
    #[serde(skip)]
    pub latest_resolved: RoundId,
}

/// Current, previous and next round of a series at `now`
///
/// The current round starts at `floor(now / round_seconds) * round_seconds`.
/// No upstream lookup is made.
pub fn resolve_latest_window(prefix: &str, round_seconds: i64, now: i64) -> LatestWindow {
    let round_seconds = round_seconds.max(1);
    let current = RoundId::current(prefix, now, round_seconds);
    let latest_resolved = current.shifted(-1, round_seconds);

    LatestWindow {
        latest_existing_slug: current.slug(),
        latest_resolved_slug: latest_resolved.slug(),
        next_slug: current.shifted(1, round_seconds).slug(),
        latest_resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_mid_round() {
        let window = resolve_latest_window("btc-updown-5m-", 300, 1_771_290_451);
        assert_eq!(window.latest_existing_slug, "btc-updown-5m-1771290300");
        assert_eq!(window.latest_resolved_slug, "btc-updown-5m-1771290000");
        assert_eq!(window.next_slug, "btc-updown-5m-1771290600");
        assert_eq!(window.latest_resolved.timestamp, 1_771_290_000);
    }

    #[test]
    fn test_window_on_boundary() {
        let window = resolve_latest_window("eth-updown-15m-", 900, 1_800);
        assert_eq!(window.latest_existing_slug, "eth-updown-15m-1800");
        assert_eq!(window.latest_resolved_slug, "eth-updown-15m-900");
        assert_eq!(window.next_slug, "eth-updown-15m-2700");
    }

    #[test]
    fn test_window_serializes_slugs_only() {
        let value = serde_json::to_value(resolve_latest_window("p-", 60, 125)).unwrap();
        assert_eq!(value["latestExistingSlug"], "p-120");
        assert_eq!(value["latestResolvedSlug"], "p-60");
        assert_eq!(value["nextSlug"], "p-180");
        assert!(value.get("latestResolved").is_none());
    }

    #[test]
    fn test_system_clock_is_recent() {
        assert!(SystemClock.now() > 1_700_000_000);
    }
}
