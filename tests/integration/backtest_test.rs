//! Full backtest against mocked Gamma and CLOB APIs

use poly_streak::backtest::{BacktestError, BacktestOptions, Backtester};
use poly_streak::config::Config;
use poly_streak::resolver::{Direction, ResolutionMethod};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.upstream.gamma_url = server.uri();
    config.upstream.clob_url = server.uri();
    config.upstream.retries = 0;
    config.upstream.backoff_ms = 0;
    config.upstream.timeout_ms = 2_000;
    config
}

async fn mount_market(server: &MockServer, slug: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/markets/slug/{}", slug)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_last_trade(server: &MockServer, token: &str, price: &str) {
    Mock::given(method("GET"))
        .and(path("/last-trade-price"))
        .and(query_param("token_id", token))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "price": price })))
        .mount(server)
        .await;
}

async fn mount_history(server: &MockServer, token: &str, final_price: f64) {
    Mock::given(method("GET"))
        .and(path("/prices-history"))
        .and(query_param("tokenId", token))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [{ "t": 1, "p": 0.5 }, { "t": 2, "p": final_price }]
        })))
        .mount(server)
        .await;
}

/// One round per resolver tier plus a missing market
async fn mount_series(server: &MockServer) {
    mount_market(server, "p-300", json!({ "winningOutcome": "Up" })).await;
    mount_market(
        server,
        "p-600",
        json!({
            "outcomes": "[\"Up\", \"Down\"]",
            "outcomePrices": "[\"0.001\", \"0.999\"]"
        }),
    )
    .await;
    mount_market(
        server,
        "p-900",
        json!({
            "outcomes": ["Up", "Down"],
            "outcomePrices": ["0.6", "0.4"],
            "clobTokenIds": ["u9", "d9"]
        }),
    )
    .await;
    mount_last_trade(server, "u9", "0.995").await;
    mount_last_trade(server, "d9", "0.005").await;
    mount_market(
        server,
        "p-1500",
        json!({
            "market": {
                "outcomes": "Up,Down",
                "clobTokenIds": "u15,d15"
            }
        }),
    )
    .await;
    mount_history(server, "u15", 0.97).await;
    mount_history(server, "d15", 0.02).await;
}

fn options() -> BacktestOptions {
    BacktestOptions {
        base_slug: Some("p-1800".to_string()),
        count: Some(5.0),
        min_streak: Some(1.0),
        max_streak: Some(2.0),
        concurrency: Some(2.0),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_backtest_resolves_through_every_tier() {
    let mock_server = MockServer::start().await;
    mount_series(&mock_server).await;

    let backtester = Backtester::from_config(&config(&mock_server)).unwrap();
    let report = backtester.run(&options()).await.unwrap();

    let outcomes: Vec<(i64, Option<Direction>, Option<ResolutionMethod>)> = report
        .rounds
        .iter()
        .map(|r| (r.ts, r.resolved_outcome, r.method))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            (300, Some(Direction::Up), Some(ResolutionMethod::Direct)),
            (600, Some(Direction::Down), Some(ResolutionMethod::PriceRatioPrimary)),
            (900, Some(Direction::Up), Some(ResolutionMethod::LastTrade)),
            (1200, None, None),
            (1500, Some(Direction::Up), Some(ResolutionMethod::PriceHistory)),
        ]
    );

    assert_eq!(report.totals.rounds, 5);
    assert_eq!(report.totals.resolved_rounds, 4);
    assert_eq!(report.diagnostics.total_errors, 1);
    assert_eq!(report.diagnostics.top_errors[0].key, "market_lookup");
    assert!(report.rounds[3]
        .error
        .as_deref()
        .unwrap()
        .starts_with("market_lookup unavailable"));

    // Up, Down, Up alternate: every n=1 signal is a win
    let one = &report.by_n[&1];
    assert_eq!(one.signals, 2);
    assert_eq!(one.wins, 2);
    assert_eq!(report.by_n[&2].signals, 0);

    let next = report.next_prediction.as_ref().unwrap();
    assert_eq!(next.last_resolved_slug, "p-1500");
    // Unresolved p-1200 is skipped, leaving an Up,Up tail
    assert_eq!(next.suggestions.len(), 2);
    assert!(next
        .suggestions
        .iter()
        .all(|s| s.predict_next == Direction::Down && s.next_ts == 1800));
}

#[tokio::test]
async fn test_backtest_report_json() {
    let mock_server = MockServer::start().await;
    mount_series(&mock_server).await;

    let backtester = Backtester::from_config(&config(&mock_server)).unwrap();
    let report = backtester.run(&options()).await.unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["input"]["baseSlug"], "p-1800");
    assert_eq!(value["input"]["count"], 5);
    assert_eq!(value["totals"]["resolvedRounds"], 4);
    assert_eq!(value["byN"]["1"]["winRate"], 1.0);
    assert_eq!(value["recentRounds"][3]["outcome"], serde_json::Value::Null);
    assert_eq!(value["recentSignals"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unreachable_upstream_never_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let options = BacktestOptions {
        base_slug: Some("p-30000".to_string()),
        count: Some(0.0),
        ..Default::default()
    };
    let backtester = Backtester::from_config(&config(&mock_server)).unwrap();
    let report = backtester.run(&options).await.unwrap();

    assert_eq!(report.totals.rounds, 2);
    assert_eq!(report.diagnostics.total_errors, report.rounds.len());
    assert!(report.rounds.iter().all(|r| r.resolved_outcome.is_none()));
}

#[tokio::test]
async fn test_malformed_base_slug() {
    let mock_server = MockServer::start().await;
    let options = BacktestOptions {
        base_slug: Some("no-timestamp-here".to_string()),
        ..Default::default()
    };

    let backtester = Backtester::from_config(&config(&mock_server)).unwrap();
    let err = backtester.run(&options).await.unwrap_err();
    assert!(matches!(err, BacktestError::InvalidBaseSlug(_)));
}

#[tokio::test]
async fn test_discord_summary_posted_once() {
    let mock_server = MockServer::start().await;
    mount_series(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_partial_json(json!({
            "embeds": [{ "title": "Streak backtest: p-1800" }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config(&mock_server);
    config.notify.discord_webhook_url = Some(format!("{}/hook", mock_server.uri()));

    let backtester = Backtester::from_config(&config).unwrap();
    backtester.run(&options()).await.unwrap();
}

#[tokio::test]
async fn test_stalled_webhook_does_not_hold_report() {
    let mock_server = MockServer::start().await;
    mount_series(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let mut config = config(&mock_server);
    config.notify.discord_webhook_url = Some(format!("{}/hook", mock_server.uri()));
    config.notify.timeout_ms = 200;

    let backtester = Backtester::from_config(&config).unwrap();
    let report = tokio::time::timeout(Duration::from_secs(10), backtester.run(&options()))
        .await
        .expect("backtest held by the webhook")
        .unwrap();
    assert_eq!(report.totals.rounds, 5);
}
