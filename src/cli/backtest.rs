//! Backtest command implementation

use crate::backtest::{BacktestOptions, Backtester};
use crate::config::Config;
use clap::{Args, ValueEnum};
use serde_json::json;

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Round to count back from, e.g. btc-updown-5m-1771290300
    #[arg(long)]
    pub base_slug: Option<String>,

    /// Count back from the latest resolved round instead of --base-slug
    #[arg(long)]
    pub use_latest: bool,

    /// Series prefix used with --use-latest
    #[arg(long)]
    pub series_prefix: Option<String>,

    /// Number of rounds to resolve [2, 300]
    #[arg(long)]
    pub count: Option<i64>,

    /// Rounds to skip back from the base [0, 120]
    #[arg(long)]
    pub offset: Option<i64>,

    /// Shortest streak evaluated [1, 500]
    #[arg(long)]
    pub min_streak: Option<i64>,

    /// Longest streak evaluated [min-streak, 500]
    #[arg(long)]
    pub max_streak: Option<i64>,

    /// Round duration in seconds [60, 3600]
    #[arg(long)]
    pub round_seconds: Option<i64>,

    /// Rounds resolved concurrently [1, 8]
    #[arg(long)]
    pub concurrency: Option<i64>,

    /// Recent rounds listed in the report [0, 100]
    #[arg(long)]
    pub strip_count: Option<i64>,

    /// Recent signals listed in the report [0, 200]
    #[arg(long)]
    pub signals_limit: Option<i64>,

    /// Pause per runner between rounds, in milliseconds [0, 5000]
    #[arg(long)]
    pub pace_ms: Option<i64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl BacktestArgs {
    /// Options given on the command line; unset flags stay `None`
    pub fn options(&self) -> BacktestOptions {
        let num = |v: Option<i64>| v.map(|v| v as f64);
        BacktestOptions {
            base_slug: self.base_slug.clone(),
            use_latest: self.use_latest,
            series_prefix: self.series_prefix.clone(),
            count: num(self.count),
            offset: num(self.offset),
            min_streak: num(self.min_streak),
            max_streak: num(self.max_streak),
            round_seconds: num(self.round_seconds),
            concurrency: num(self.concurrency),
            strip_count: num(self.strip_count),
            signals_limit: num(self.signals_limit),
            pace_ms: num(self.pace_ms),
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let options = config.backtest.merged(&self.options());
        let backtester = Backtester::from_config(config)?;

        let report = match backtester.run(&options).await {
            Ok(report) => report,
            Err(e) => {
                println!("{}", serde_json::to_string_pretty(&json!({ "error": e.to_string() }))?);
                return Err(e.into());
            }
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Table => print!("{}", report.format_table()),
        }
        Ok(())
    }
}
