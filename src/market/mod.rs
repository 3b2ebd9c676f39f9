//! Market data module
//!
//! Round identifiers, normalization of raw Gamma payloads, and the upstream
//! clients for market lookup (Gamma) and token prices (CLOB).

mod clob;
mod gamma;
mod raw;
mod slug;

pub use clob::{last_price_from_history, ClobClient, CLOB_API_URL};
pub use gamma::{GammaClient, GAMMA_API_URL};
pub use raw::{decimal_from_value, parse_decimal, parse_list, MarketSnapshot};
pub use slug::{format_slug, sequence, RoundId, SlugError};

use reqwest::Url;
use thiserror::Error;

/// Endpoint construction errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Parse and validate an API base URL
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, EndpointError> {
    let url = Url::parse(raw.trim()).map_err(|e| EndpointError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(EndpointError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot carry a path".to_string(),
        });
    }

    Ok(url)
}

/// Append path segments to a base URL, percent-encoding each one
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
