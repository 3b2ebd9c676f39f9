//! CLOB API client for token prices
//!
//! Two read-only endpoints are used: the most recent trade per token, and a
//! time-bounded price history per token. There is no batched variant of
//! either, so each token costs one request.

use super::{decimal_from_value, endpoint, parse_base_url, EndpointError};
use crate::fetch::{FetchError, ResilientFetcher};
use reqwest::Url;
use rust_decimal::Decimal;
use serde_json::Value;

/// CLOB API base URL
pub const CLOB_API_URL: &str = "https://clob.polymarket.com";

/// Client for Polymarket's CLOB price endpoints
#[derive(Clone)]
pub struct ClobClient {
    fetcher: ResilientFetcher,
    base_url: Url,
}

impl ClobClient {
    /// Create a client against the given base URL
    pub fn new(fetcher: ResilientFetcher, base_url: &str) -> Result<Self, EndpointError> {
        Ok(Self {
            fetcher,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// URL of the last-trade endpoint for a token
    pub fn last_trade_url(&self, token_id: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["last-trade-price"]);
        url.query_pairs_mut().append_pair("token_id", token_id);
        url
    }

    /// URL of the price-history endpoint for a token and window
    ///
    /// `token_param` is the query key naming the token; the API has used
    /// both `tokenId` and `token_id`.
    pub fn price_history_url(
        &self,
        token_param: &str,
        token_id: &str,
        start_ts: i64,
        end_ts: i64,
    ) -> Url {
        let mut url = endpoint(&self.base_url, &["prices-history"]);
        url.query_pairs_mut()
            .append_pair(token_param, token_id)
            .append_pair("startTs", &start_ts.to_string())
            .append_pair("endTs", &end_ts.to_string())
            .append_pair("fidelity", "1");
        url
    }

    /// Most recent traded price of a token, `None` if the response has none
    pub async fn last_trade_price(&self, token_id: &str) -> Result<Option<Decimal>, FetchError> {
        let url = self.last_trade_url(token_id);
        let value = self.fetcher.fetch_json(url.as_str()).await?;
        Ok(value.get("price").and_then(decimal_from_value))
    }

    /// Final sample of a token's price history over `[start_ts, end_ts]`
    pub async fn final_history_price(
        &self,
        token_id: &str,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<Option<Decimal>, FetchError> {
        let primary = self.price_history_url("tokenId", token_id, start_ts, end_ts);
        let value = match self.fetcher.fetch_json(primary.as_str()).await {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(
                    token_id = %token_id,
                    error = %e,
                    "Price history lookup failed, retrying with token_id parameter"
                );
                let fallback = self.price_history_url("token_id", token_id, start_ts, end_ts);
                self.fetcher.fetch_json(fallback.as_str()).await?
            }
        };

        Ok(last_price_from_history(&value))
    }
}

/// Last price in a price-history response
///
/// Understands `{history: [{t, p}, ...]}` and its `data`/`prices`/`priceHistory`
/// aliases, samples as `[t, p]` pairs or `{price}` objects, and the columnar
/// `{history: {p: [...]}}` form.
pub fn last_price_from_history(response: &Value) -> Option<Decimal> {
    let series = ["history", "data", "prices", "priceHistory"]
        .iter()
        .filter_map(|key| response.get(key))
        .find(|v| !v.is_null());

    match series? {
        Value::Array(samples) => {
            let last = samples.last()?;
            last.get("p")
                .or_else(|| last.get("price"))
                .or_else(|| last.get(1))
                .and_then(decimal_from_value)
        }
        Value::Object(columns) => match columns.get("p") {
            Some(Value::Array(prices)) => prices.last().and_then(decimal_from_value),
            _ => None,
        },
        _ => None,
    }
}
