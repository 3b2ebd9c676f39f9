//! Discord webhook notifications for finished backtests

use super::Notifier;
use crate::backtest::BacktestReport;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

/// Posts a summary embed for every completed backtest
#[derive(Clone)]
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    /// Create a notifier whose webhook calls give up after `timeout`
    pub fn new(webhook_url: String, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Webhook body summarizing a report
    pub fn summary_payload(report: &BacktestReport) -> Value {
        let best = report
            .by_n
            .iter()
            .filter_map(|(n, s)| s.win_rate.map(|rate| (*n, rate, s.signals)))
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let best_field = match best {
            Some((n, rate, signals)) => {
                format!("n={} at **{:.1}%** over {} signals", n, rate * 100.0, signals)
            }
            None => "no signals".to_string(),
        };

        let next_field = match &report.next_prediction {
            Some(next) if !next.suggestions.is_empty() => next
                .suggestions
                .iter()
                .map(|s| format!("n={}: {} after {} streak", s.n, s.predict_next, s.prev_dir))
                .collect::<Vec<_>>()
                .join("\n"),
            Some(_) => "no streak in range".to_string(),
            None => "no resolved rounds".to_string(),
        };

        let color = if report.diagnostics.total_errors > 0 {
            0xFFA500 // Orange
        } else {
            0x00FF00 // Green
        };

        json!({
            "embeds": [{
                "title": format!("Streak backtest: {}", report.input.base_slug),
                "color": color,
                "fields": [
                    {
                        "name": "Rounds",
                        "value": format!(
                            "{}/{} resolved",
                            report.totals.resolved_rounds, report.totals.rounds
                        ),
                        "inline": true
                    },
                    {
                        "name": "Signals",
                        "value": report.totals.signals.to_string(),
                        "inline": true
                    },
                    {
                        "name": "Errors",
                        "value": report.diagnostics.total_errors.to_string(),
                        "inline": true
                    },
                    {
                        "name": "Best streak length",
                        "value": best_field,
                        "inline": false
                    },
                    {
                        "name": "Next round",
                        "value": next_field,
                        "inline": false
                    }
                ],
                "footer": {
                    "text": "poly-streak"
                },
                "timestamp": chrono::Utc::now().to_rfc3339()
            }]
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn batch_complete(&self, report: &BacktestReport) {
        let body = Self::summary_payload(report);

        match self.client.post(&self.webhook_url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                info!(base_slug = %report.input.base_slug, "Discord summary sent");
            }
            Ok(response) => {
                error!(status = %response.status(), "Discord webhook rejected summary");
            }
            Err(e) => {
                error!(error = %e, "Failed to send Discord webhook");
            }
        }
    }
}
