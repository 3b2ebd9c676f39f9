//! CLI interface for poly-streak
//!
//! Provides subcommands for:
//! - `backtest`: Score the streak-reversal rule over past rounds
//! - `latest`: Show the current round boundaries of a series
//! - `resolve`: Resolve a single round

mod backtest;
mod latest;
mod resolve;

pub use backtest::{BacktestArgs, OutputFormat};
pub use latest::LatestArgs;
pub use resolve::ResolveArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poly-streak")]
#[command(about = "Streak-reversal backtester for Polymarket up/down rounds")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a backtest and print the report
    Backtest(BacktestArgs),
    /// Print the latest, latest resolved and next round slugs
    Latest(LatestArgs),
    /// Resolve one round and print it
    Resolve(ResolveArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backtest() {
        let cli = Cli::try_parse_from([
            "poly-streak",
            "--config",
            "alt.toml",
            "backtest",
            "--base-slug",
            "btc-updown-5m-1771290300",
            "--count",
            "50",
            "--min-streak",
            "2",
            "--format",
            "table",
        ])
        .unwrap();

        assert_eq!(cli.config, "alt.toml");
        let Commands::Backtest(args) = cli.command else {
            panic!("expected backtest");
        };
        assert_eq!(args.base_slug.as_deref(), Some("btc-updown-5m-1771290300"));
        assert_eq!(args.format, OutputFormat::Table);

        let options = args.options();
        assert_eq!(options.count, Some(50.0));
        assert_eq!(options.min_streak, Some(2.0));
        assert!(options.max_streak.is_none());
        assert!(!options.use_latest);
    }

    #[test]
    fn test_parse_latest_defaults() {
        let cli = Cli::try_parse_from(["poly-streak", "latest"]).unwrap();
        assert_eq!(cli.config, "config.toml");
        let Commands::Latest(args) = cli.command else {
            panic!("expected latest");
        };
        assert!(args.prefix.is_none());
        assert!(args.round_seconds.is_none());
    }

    #[test]
    fn test_parse_resolve() {
        let cli =
            Cli::try_parse_from(["poly-streak", "resolve", "btc-updown-5m-1771290300"]).unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.slug, "btc-updown-5m-1771290300");

        assert!(Cli::try_parse_from(["poly-streak", "resolve"]).is_err());
    }

    #[test]
    fn test_negative_values_are_accepted_for_clamping() {
        let cli = Cli::try_parse_from(["poly-streak", "backtest", "--offset=-4"]).unwrap();
        let Commands::Backtest(args) = cli.command else {
            panic!("expected backtest");
        };
        assert_eq!(args.options().offset, Some(-4.0));
    }
}
