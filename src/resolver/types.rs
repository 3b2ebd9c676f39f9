//! Resolver types

use crate::fetch::FetchError;
use crate::market::{RoundId, SlugError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Winning side of an up/down round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// The other side
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Normalize an outcome label
    ///
    /// Exact `up`/`down` (any case) first, then a whole-word match, so that
    /// "Bitcoin Up" is `Up` but "Upcoming" is nothing. Labels naming both
    /// sides are rejected.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        match lower.as_str() {
            "up" => return Some(Direction::Up),
            "down" => return Some(Direction::Down),
            _ => {}
        }

        let (mut up, mut down) = (false, false);
        for word in lower.split(|c: char| !c.is_alphanumeric()) {
            up |= word == "up";
            down |= word == "down";
        }

        match (up, down) {
            (true, false) => Some(Direction::Up),
            (false, true) => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolver tier that produced (or last examined) the evidence for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionMethod {
    #[serde(rename = "direct")]
    Direct,
    #[serde(rename = "price-ratio-primary")]
    PriceRatioPrimary,
    #[serde(rename = "last-trade")]
    LastTrade,
    #[serde(rename = "price-history")]
    PriceHistory,
}

impl ResolutionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionMethod::Direct => "direct",
            ResolutionMethod::PriceRatioPrimary => "price-ratio-primary",
            ResolutionMethod::LastTrade => "last-trade",
            ResolutionMethod::PriceHistory => "price-history",
        }
    }
}

impl fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream call a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    MarketLookup,
    PriceHistory,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::MarketLookup => "market_lookup",
            Stage::PriceHistory => "price_history",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-round failures; none of them aborts a batch
///
/// The last-trade tier has no variant: its failures fall through to the
/// price history.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoundError {
    /// Round identifier could not be parsed
    #[error("malformed slug: {0}")]
    MalformedSlug(#[from] SlugError),
    /// An upstream call failed after all retries
    #[error("{stage} unavailable: {source}")]
    UpstreamUnavailable { stage: Stage, source: FetchError },
    /// Outcome labels could not be matched to token ids
    #[error("missing token mapping: {0}")]
    MissingTokenMapping(String),
}

impl RoundError {
    /// Diagnostics key naming where the failure came from
    pub fn origin(&self) -> &'static str {
        match self {
            RoundError::MalformedSlug(_) => "malformed_slug",
            RoundError::UpstreamUnavailable { stage, .. } => stage.as_str(),
            RoundError::MissingTokenMapping(_) => "token_mapping",
        }
    }
}

/// Outcome of running the tier chain over one market
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: Option<Direction>,
    pub method: Option<ResolutionMethod>,
    pub settled: bool,
    pub up_price: Option<Decimal>,
    pub down_price: Option<Decimal>,
}

impl Resolution {
    /// Conclusive evidence
    pub fn settled(
        outcome: Direction,
        method: ResolutionMethod,
        up_price: Option<Decimal>,
        down_price: Option<Decimal>,
    ) -> Self {
        Self {
            outcome: Some(outcome),
            method: Some(method),
            settled: true,
            up_price,
            down_price,
        }
    }

    /// Evidence gathered but below the settlement threshold
    pub fn unresolved(
        method: ResolutionMethod,
        up_price: Option<Decimal>,
        down_price: Option<Decimal>,
    ) -> Self {
        Self {
            outcome: None,
            method: Some(method),
            settled: false,
            up_price,
            down_price,
        }
    }
}

/// One round of the backtest timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRound {
    pub slug: String,
    pub ts: i64,
    pub resolved_outcome: Option<Direction>,
    pub method: Option<ResolutionMethod>,
    pub settled: bool,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub up_final_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub down_final_price: Option<Decimal>,
    pub error: Option<String>,
    /// Diagnostics key when `error` stems from a failure
    #[serde(skip)]
    pub error_origin: Option<&'static str>,
}

impl ResolvedRound {
    /// Round record from a finished tier chain
    pub fn from_resolution(id: &RoundId, resolution: Resolution) -> Self {
        let error = match resolution.outcome {
            Some(_) => None,
            None => Some(format!(
                "unresolved: final prices up={} down={} did not clear the settlement threshold",
                fmt_price(resolution.up_price),
                fmt_price(resolution.down_price)
            )),
        };

        Self {
            slug: id.slug(),
            ts: id.timestamp,
            resolved_outcome: resolution.outcome,
            method: resolution.method,
            settled: resolution.settled,
            up_final_price: resolution.up_price,
            down_final_price: resolution.down_price,
            error,
            error_origin: None,
        }
    }

    /// Round record for a failed resolution
    pub fn failed(id: &RoundId, err: &RoundError) -> Self {
        Self {
            slug: id.slug(),
            ts: id.timestamp,
            resolved_outcome: None,
            method: None,
            settled: false,
            up_final_price: None,
            down_final_price: None,
            error: Some(err.to_string()),
            error_origin: Some(err.origin()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_outcome.is_some()
    }
}

fn fmt_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| "n/a".to_string(), |p| p.to_string())
}
