//! Normalization of raw Gamma market payloads
//!
//! Gamma objects are inconsistent: fields come under several aliases, may be
//! nested under `market`, and list fields may be native arrays, JSON-encoded
//! strings or bare comma-separated strings. Everything is resolved here once
//! so the resolver only ever sees a [`MarketSnapshot`].

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

const DIRECT_KEYS: &[&str] = &[
    "winningOutcome",
    "winning_outcome",
    "winner",
    "outcome",
    "result",
];
const OUTCOME_KEYS: &[&str] = &["outcomes"];
const PRICE_KEYS: &[&str] = &["outcomePrices", "outcome_prices"];
const TOKEN_KEYS: &[&str] = &["clobTokenIds", "clob_token_ids"];
const RESOLVED_KEYS: &[&str] = &["resolved", "isResolved"];
const CLOSED_KEYS: &[&str] = &["closed"];

/// Canonical view of a market record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    /// Direct winner/outcome field, verbatim
    pub direct: Option<String>,
    /// Outcome labels, e.g. `["Up", "Down"]`
    pub outcomes: Vec<String>,
    /// Outcome prices aligned with `outcomes`; unparsable entries are `None`
    pub outcome_prices: Vec<Option<Decimal>>,
    /// CLOB token ids aligned with `outcomes`
    pub token_ids: Vec<String>,
    /// Resolution flag, `None` when the payload omits it
    pub resolved: Option<bool>,
    /// Trading-closed flag, `None` when the payload omits it
    pub closed: Option<bool>,
}

impl MarketSnapshot {
    /// Normalize a single market object
    pub fn from_value(market: &Value) -> Self {
        let direct = lookup(market, DIRECT_KEYS).and_then(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        });

        let outcomes = lookup(market, OUTCOME_KEYS)
            .and_then(parse_list)
            .unwrap_or_default();

        let outcome_prices: Vec<Option<Decimal>> = lookup(market, PRICE_KEYS)
            .and_then(parse_list)
            .map(|prices| prices.iter().map(|p| parse_decimal(p)).collect())
            .unwrap_or_default();

        let token_ids = lookup(market, TOKEN_KEYS)
            .and_then(parse_list)
            .unwrap_or_default();

        Self {
            direct,
            outcomes,
            outcome_prices,
            token_ids,
            resolved: lookup(market, RESOLVED_KEYS).and_then(parse_flag),
            closed: lookup(market, CLOSED_KEYS).and_then(parse_flag),
        }
    }

    /// Normalize a lookup response
    ///
    /// Accepts a market object, a list of markets, or an object carrying a
    /// `markets` list; the first market wins. Returns `None` when the
    /// response holds no market.
    pub fn from_lookup(response: &Value) -> Option<Self> {
        match response {
            Value::Array(items) => items.first().map(Self::from_value),
            Value::Object(map) => match map.get("markets") {
                Some(Value::Array(items)) => items.first().map(Self::from_value),
                _ => Some(Self::from_value(response)),
            },
            _ => None,
        }
    }

    /// The payload explicitly says the market is still trading or awaiting
    /// resolution, so its outcome prices are not final
    pub fn is_unsettled(&self) -> bool {
        self.resolved == Some(false) || self.closed == Some(false)
    }

    /// Outcome labels paired with prices, when both are present and aligned
    pub fn priced_outcomes(&self) -> Option<Vec<(&str, Option<Decimal>)>> {
        if self.outcomes.is_empty() || self.outcomes.len() != self.outcome_prices.len() {
            return None;
        }
        Some(
            self.outcomes
                .iter()
                .map(String::as_str)
                .zip(self.outcome_prices.iter().copied())
                .collect(),
        )
    }
}

/// First non-null value under any of `keys`, top-level first, then under `market`
fn lookup<'a>(market: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let find = |obj: &'a Value| {
        keys.iter()
            .filter_map(|k| obj.get(k))
            .find(|v| !v.is_null())
    };
    find(market).or_else(|| market.get("market").and_then(find))
}

/// Parse a list that may be an array, a JSON-encoded array or CSV text
pub fn parse_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().map(scalar_to_string).collect()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.starts_with('[') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return Some(items.iter().map(scalar_to_string).collect());
                }
            }
            Some(
                trimmed
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .split(',')
                    .map(|part| {
                        part.trim()
                            .trim_matches(|c: char| c == '"' || c == '\'')
                            .to_string()
                    })
                    .filter(|part| !part.is_empty())
                    .collect(),
            )
        }
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Parse a price such as `"0.995"`, `"1"` or `"4.5e-3"`
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Price from a JSON number or numeric string
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
