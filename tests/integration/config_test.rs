//! Configuration loading end to end

use poly_streak::config::Config;
use poly_streak::telemetry::LogFormat;
use std::io::Write;

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();

    assert_eq!(config.upstream.gamma_url, "https://gamma-api.polymarket.com");
    assert_eq!(config.upstream.retries, 2);
    assert_eq!(config.backtest.series_prefix.as_deref(), Some("btc-updown-5m-"));
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    assert!(config.telemetry.metrics_port.is_none());
    assert!(config.notify.discord_webhook_url.is_none());
    assert_eq!(config.notify.timeout_ms, 5_000);

    let params = config.backtest.params();
    assert_eq!(params.count, 100);
    assert_eq!(params.max_streak, 8);
}

#[test]
fn test_config_file_backtest_defaults_are_clamped() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[backtest]\ncount = 1000\nmin_streak = 0\nround_seconds = 900.5\n"
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    let params = config.backtest.params();
    assert_eq!(params.count, 300);
    assert_eq!(params.min_streak, 1);
    assert_eq!(params.round_seconds, 900);
}
