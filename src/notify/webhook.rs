//! Web push sink: POSTs each report as JSON (plus the shared api key) to
//! the configured endpoint, with bounded retries and exponential backoff.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{FeedLabels, Notifier};
use crate::pipeline::Report;

#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    api_key: String,
    labels: FeedLabels,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl WebhookNotifier {
    pub fn new(url: String, api_key: String, labels: FeedLabels) -> Self {
        Self {
            url,
            api_key,
            labels,
            client: Client::new(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    fn payload(&self, report: &Report) -> Value {
        json!({
            "symbol": self.labels.symbol,
            "timeframe": self.labels.timeframe,
            "game": self.labels.game,
            "issue": report.event.issue,
            "created_at": report.emitted_at.to_rfc3339(),
            "signal": {
                "decision": report.signal.decision_label(),
                "confidence": report.signal.confidence,
                "meta": {
                    "num": report.event.number,
                    "notes": report.signal.note,
                },
            },
            "api_key": self.api_key,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, report: &Report) -> Result<()> {
        let payload = self.payload(report);

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.url)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1)))
                                .await;
                            continue;
                        }
                        return Err(anyhow!("web push HTTP error: {e}"));
                    }
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(anyhow!("web push request failed: {e}"));
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use chrono::{DateTime, Utc};

    #[test]
    fn payload_matches_push_contract() {
        let mut p = Pipeline::new(5, 200);
        let raw = serde_json::json!({ "issue": "20240101-100", "number": 3 });
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let report = p.handle_at(&raw, now).unwrap();

        let n = WebhookNotifier::new(
            "https://example.test/push".into(),
            "k".into(),
            FeedLabels {
                symbol: "WinGo".into(),
                timeframe: "30s".into(),
                game: "WinGo_30S".into(),
            },
        );
        let v = n.payload(&report);

        assert_eq!(v["symbol"], "WinGo");
        assert_eq!(v["issue"], "20240101-100");
        assert_eq!(v["signal"]["decision"], "SMALL / ODD");
        assert_eq!(v["signal"]["confidence"], 60);
        assert_eq!(v["signal"]["meta"]["num"], 3);
        assert_eq!(v["api_key"], "k");
    }
}
