use clap::Parser;
use poly_streak::cli::{Cli, Commands};
use poly_streak::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {:#}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _telemetry = poly_streak::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Backtest(args) => {
            tracing::info!("Starting backtest");
            args.execute(&config).await?;
        }
        Commands::Latest(args) => {
            args.execute(&config)?;
        }
        Commands::Resolve(args) => {
            args.execute(&config).await?;
        }
    }

    Ok(())
}
