//! Synchronous resolver tiers
//!
//! Tiers that need nothing beyond the market snapshot, plus the mapping of
//! outcome labels to CLOB tokens used by the price-based tiers.

use super::{Direction, Resolution, ResolutionMethod, RoundError};
use crate::market::MarketSnapshot;
use rust_decimal::Decimal;

/// CLOB token ids of the two sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub up: String,
    pub down: String,
}

/// Direct winner field, accepted as ground truth
pub fn direct(market: &MarketSnapshot) -> Option<Resolution> {
    let outcome = market.direct.as_deref().and_then(Direction::from_label)?;
    Some(Resolution {
        outcome: Some(outcome),
        method: Some(ResolutionMethod::Direct),
        settled: true,
        up_price: None,
        down_price: None,
    })
}

/// Highest outcome price, accepted once it reaches `winner_min`
///
/// Skipped when outcomes and prices are missing or misaligned, when the
/// market reports itself unsettled, when the top price is shared by more
/// than one outcome, or when the leading label is not an up/down label.
pub fn price_ratio(market: &MarketSnapshot, winner_min: Decimal) -> Option<Resolution> {
    if market.is_unsettled() {
        return None;
    }
    let priced = market.priced_outcomes()?;

    let mut best: Option<(&str, Decimal)> = None;
    for &(label, price) in &priced {
        if let Some(price) = price {
            if best.map_or(true, |(_, top)| price > top) {
                best = Some((label, price));
            }
        }
    }

    let (label, top) = best?;
    if top < winner_min {
        return None;
    }
    if priced.iter().filter(|pair| pair.1 == Some(top)).count() > 1 {
        return None;
    }
    let outcome = Direction::from_label(label)?;

    let side_price = |side: Direction| {
        priced
            .iter()
            .find(|pair| Direction::from_label(pair.0) == Some(side))
            .and_then(|pair| pair.1)
    };

    Some(Resolution::settled(
        outcome,
        ResolutionMethod::PriceRatioPrimary,
        side_price(Direction::Up),
        side_price(Direction::Down),
    ))
}

/// Match outcome labels to token ids
///
/// Labels are matched on the words "up"/"down"; binary markets labelled
/// `Yes`/`No` map Yes to Up.
pub fn map_tokens(market: &MarketSnapshot) -> Result<TokenPair, RoundError> {
    if market.outcomes.is_empty() || market.token_ids.is_empty() {
        return Err(RoundError::MissingTokenMapping(
            "market has no outcomes/clobTokenIds".to_string(),
        ));
    }
    if market.outcomes.len() != market.token_ids.len() {
        return Err(RoundError::MissingTokenMapping(format!(
            "{} outcomes but {} token ids",
            market.outcomes.len(),
            market.token_ids.len()
        )));
    }

    let pairs: Vec<(&str, &str)> = market
        .outcomes
        .iter()
        .map(String::as_str)
        .zip(market.token_ids.iter().map(String::as_str))
        .collect();

    let find = |pred: &dyn Fn(&str) -> bool| {
        pairs
            .iter()
            .find(|pair| pred(pair.0))
            .map(|pair| pair.1.to_string())
    };

    let up = find(&|l: &str| Direction::from_label(l) == Some(Direction::Up));
    let down = find(&|l: &str| Direction::from_label(l) == Some(Direction::Down));
    if let (Some(up), Some(down)) = (up, down) {
        return Ok(TokenPair { up, down });
    }

    let yes = find(&|l: &str| l.trim().eq_ignore_ascii_case("yes"));
    let no = find(&|l: &str| l.trim().eq_ignore_ascii_case("no"));
    if let (Some(up), Some(down)) = (yes, no) {
        tracing::debug!("Mapped Yes/No outcomes to Up/Down tokens");
        return Ok(TokenPair { up, down });
    }

    Err(RoundError::MissingTokenMapping(format!(
        "could not find Up/Down in outcomes {:?}",
        market.outcomes
    )))
}
