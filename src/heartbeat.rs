//! Periodic liveness ping to the status endpoint. Failures are logged at
//! debug and otherwise ignored; the task runs until the process exits.

use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinHandle;

pub fn spawn_heartbeat(url: String, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = Client::new();
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            ticker.tick().await;
            let body = serde_json::json!({
                "status": "online",
                "ts": chrono::Utc::now().timestamp(),
            });
            let res = client
                .post(&url)
                .timeout(Duration::from_secs(8))
                .json(&body)
                .send()
                .await;
            if let Err(e) = res {
                tracing::debug!(error = ?e, "heartbeat post failed");
            }
        }
    })
}
