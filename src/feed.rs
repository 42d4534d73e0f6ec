//! Feed client: a reconnecting NDJSON stream reader plus a one-shot
//! history backfill. Transport outages are invisible to the pipeline —
//! it simply receives no messages until the stream comes back.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub struct FeedClient {
    client: Client,
    stream_url: String,
    reconnect_delay: Duration,
}

impl FeedClient {
    pub fn new(stream_url: String, reconnect_delay: Duration) -> Self {
        Self {
            client: Client::new(),
            stream_url,
            reconnect_delay,
        }
    }

    /// Connect and reconnect forever, decoding each stream line and pushing
    /// it into `tx`. Returns only when the receiving side hangs up.
    pub async fn run(self, tx: mpsc::Sender<Value>) {
        loop {
            if let Err(e) = self.consume_stream(&tx).await {
                warn!(error = ?e, "feed stream error");
            }
            if tx.is_closed() {
                return;
            }
            info!(
                delay_secs = self.reconnect_delay.as_secs(),
                "feed disconnected; reconnecting"
            );
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    async fn consume_stream(&self, tx: &mpsc::Sender<Value>) -> Result<()> {
        let rsp = self
            .client
            .get(&self.stream_url)
            .send()
            .await
            .context("feed connect")?
            .error_for_status()
            .context("feed non-2xx")?;
        info!(url = %self.stream_url, "feed connected");

        let mut stream = rsp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("feed read")?;
            buf.extend_from_slice(&chunk);
            while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                // Non-JSON frames still go through the normalizer as text.
                let value = serde_json::from_str::<Value>(line)
                    .unwrap_or_else(|_| Value::String(line.to_string()));
                if tx.send(value).await.is_err() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// One-shot history fetch on startup so the pipeline starts from the
/// latest round instead of waiting for the next push.
pub async fn backfill_history(client: &Client, url: &str, tx: &mpsc::Sender<Value>) -> Result<()> {
    let sep = if url.contains('?') { '&' } else { '?' };
    let full = format!("{url}{sep}ts={}", chrono::Utc::now().timestamp_millis());
    let rsp = client
        .get(&full)
        .timeout(Duration::from_secs(8))
        .send()
        .await
        .context("history fetch")?;
    if rsp.status().is_success() {
        let body: Value = rsp.json().await.context("history decode")?;
        let _ = tx.send(body).await;
    }
    Ok(())
}
