//! Resolve command implementation

use crate::backtest::Backtester;
use crate::config::Config;
use clap::Args;
use serde_json::json;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Round slug, e.g. btc-updown-5m-1771290300
    pub slug: String,
}

impl ResolveArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let backtester = Backtester::from_config(config)?;
        match backtester.resolve_slug(&self.slug).await {
            Ok(round) => {
                println!("{}", serde_json::to_string_pretty(&round)?);
                Ok(())
            }
            Err(e) => {
                println!("{}", serde_json::to_string_pretty(&json!({ "error": e.to_string() }))?);
                Err(e.into())
            }
        }
    }
}
