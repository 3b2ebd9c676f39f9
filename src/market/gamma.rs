//! Gamma API client for market lookup
//!
//! Resolves a round slug to its market record. The canonical endpoint is
//! `/markets/slug/{slug}`; some deployments only answer the list form
//! `/markets?slug={slug}`, which is tried when the first one fails.

use super::{endpoint, parse_base_url, EndpointError, MarketSnapshot};
use crate::fetch::{FetchError, ResilientFetcher};
use reqwest::Url;

/// Gamma API base URL
pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Client for Polymarket's Gamma API
#[derive(Clone)]
pub struct GammaClient {
    fetcher: ResilientFetcher,
    base_url: Url,
}

impl GammaClient {
    /// Create a client against the given base URL
    pub fn new(fetcher: ResilientFetcher, base_url: &str) -> Result<Self, EndpointError> {
        Ok(Self {
            fetcher,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// URL of the by-slug lookup
    pub fn market_url(&self, slug: &str) -> Url {
        endpoint(&self.base_url, &["markets", "slug", slug])
    }

    /// URL of the list-form lookup
    pub fn market_search_url(&self, slug: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["markets"]);
        url.query_pairs_mut()
            .append_pair("slug", slug)
            .append_pair("limit", "1");
        url
    }

    /// Fetch and normalize the market for a round slug
    ///
    /// When both lookups fail, the error of the by-slug lookup is returned.
    pub async fn fetch_market(&self, slug: &str) -> Result<MarketSnapshot, FetchError> {
        let primary = self.market_url(slug);

        let primary_err = match self.fetcher.fetch_json(primary.as_str()).await {
            Ok(value) => match MarketSnapshot::from_lookup(&value) {
                Some(snapshot) => return Ok(snapshot),
                None => no_market(primary.as_str()),
            },
            Err(e) => e,
        };

        tracing::debug!(
            slug = %slug,
            error = %primary_err,
            "By-slug lookup failed, trying list lookup"
        );

        let fallback = self.market_search_url(slug);
        match self.fetcher.fetch_json(fallback.as_str()).await {
            Ok(value) => MarketSnapshot::from_lookup(&value).ok_or(primary_err),
            Err(_) => Err(primary_err),
        }
    }
}

fn no_market(url: &str) -> FetchError {
    FetchError::Decode {
        url: url.to_string(),
        message: "response holds no market".to_string(),
    }
}
