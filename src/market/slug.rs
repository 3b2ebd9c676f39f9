//! Round identifier codec
//!
//! A round slug is a series prefix followed by the round's unix start time,
//! e.g. `btc-updown-5m-1771290300`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Slug parsing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlugError {
    /// Last `-` segment is not an integer timestamp, or there is no prefix
    #[error("slug must end with a unix timestamp: {0}")]
    Malformed(String),
}

/// Identity of one round: series prefix plus start timestamp
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundId {
    /// Series prefix including the trailing `-`
    pub prefix: String,
    /// Round start, unix seconds
    pub timestamp: i64,
}

impl RoundId {
    pub fn new(prefix: impl Into<String>, timestamp: i64) -> Self {
        Self {
            prefix: prefix.into(),
            timestamp,
        }
    }

    /// Parse a slug into prefix and timestamp
    pub fn parse(slug: &str) -> Result<Self, SlugError> {
        let slug = slug.trim();
        let (head, last) = slug
            .rsplit_once('-')
            .ok_or_else(|| SlugError::Malformed(slug.to_string()))?;

        let timestamp = last
            .parse::<i64>()
            .map_err(|_| SlugError::Malformed(slug.to_string()))?;

        Ok(Self {
            prefix: format!("{}-", head),
            timestamp,
        })
    }

    /// The round containing `now` for rounds of `round_seconds`
    pub fn current(prefix: impl Into<String>, now: i64, round_seconds: i64) -> Self {
        let step = round_seconds.max(1);
        Self::new(prefix, now.div_euclid(step) * step)
    }

    /// Canonical textual form
    pub fn slug(&self) -> String {
        format_slug(&self.prefix, self.timestamp)
    }

    /// Same series, `rounds` rounds later (negative for earlier)
    ///
    /// Saturates at the ends of the timestamp range.
    pub fn shifted(&self, rounds: i64, round_seconds: i64) -> Self {
        let delta = rounds.saturating_mul(round_seconds);
        Self::new(self.prefix.clone(), self.timestamp.saturating_add(delta))
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.timestamp)
    }
}

impl FromStr for RoundId {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Build a slug from prefix and timestamp
pub fn format_slug(prefix: &str, timestamp: i64) -> String {
    format!("{}{}", prefix, timestamp)
}

/// `count` rounds receding from `base`, starting `offset` rounds back
///
/// Entry `i` has timestamp `base - (offset + i) * round_seconds`.
pub fn sequence(base: &RoundId, count: usize, offset: u32, round_seconds: i64) -> Vec<RoundId> {
    (0..count)
        .map(|i| base.shifted(-(i64::from(offset) + i as i64), round_seconds))
        .collect()
}
