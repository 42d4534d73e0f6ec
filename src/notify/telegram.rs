//! Telegram sink: Bot API `sendMessage` with an HTML-formatted summary.
//! Silently disabled when the token or chat id is missing, so the sink can
//! always be registered and configured purely through the environment.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{FeedLabels, Notifier};
use crate::pipeline::Report;

pub struct TelegramNotifier {
    token: Option<String>,
    chat_id: Option<String>,
    labels: FeedLabels,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(token: Option<String>, chat_id: Option<String>, labels: FeedLabels) -> Self {
        Self {
            token,
            chat_id,
            labels,
            client: Client::new(),
        }
    }

    pub fn from_env(labels: FeedLabels) -> Self {
        Self::new(
            std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            std::env::var("TELEGRAM_CHAT_ID").ok(),
            labels,
        )
    }

    fn message_text(&self, report: &Report) -> String {
        format!(
            "🎯 <b>{}</b> [{}] — <b>{}</b> ({}%)\nGame: {}\nIssue: {}\nNumber: <b>{}</b>\n{}",
            self.labels.symbol,
            self.labels.timeframe,
            report.signal.decision_label(),
            report.signal.confidence,
            self.labels.game,
            report.event.issue.as_deref().unwrap_or("-"),
            report.event.number,
            report.signal.note,
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, report: &Report) -> Result<()> {
        let (Some(token), Some(chat_id)) = (&self.token, &self.chat_id) else {
            tracing::debug!("Telegram disabled (no TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID)");
            return Ok(());
        };

        let url = format!("https://api.telegram.org/bot{token}/sendMessage");
        let text = self.message_text(report);
        let form = [
            ("chat_id", chat_id.as_str()),
            ("text", text.as_str()),
            ("parse_mode", "HTML"),
        ];

        self.client
            .post(&url)
            .timeout(Duration::from_secs(10))
            .form(&form)
            .send()
            .await
            .context("telegram post")?
            .error_for_status()
            .context("telegram non-2xx")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
