//! Latest command implementation

use crate::backtest::{resolve_latest_window, BacktestOptions, Clock, SystemClock};
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct LatestArgs {
    /// Series prefix, e.g. btc-updown-5m-
    #[arg(long)]
    pub prefix: Option<String>,

    /// Round duration in seconds [60, 3600]
    #[arg(long)]
    pub round_seconds: Option<i64>,
}

impl LatestArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let overrides = BacktestOptions {
            series_prefix: self.prefix.clone(),
            round_seconds: self.round_seconds.map(|v| v as f64),
            ..Default::default()
        };
        let params = config.backtest.merged(&overrides).params();

        let window = resolve_latest_window(
            &params.series_prefix,
            params.round_seconds,
            SystemClock.now(),
        );
        println!("{}", serde_json::to_string_pretty(&window)?);
        Ok(())
    }
}
