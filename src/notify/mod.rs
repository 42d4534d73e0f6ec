//! Outbound sinks. Each sink implements `Notifier`; the mux fans a report
//! out to all of them, best-effort — one sink failing is logged and never
//! blocks or retriggers the others.

pub mod telegram;
pub mod webhook;

use anyhow::Result;
use async_trait::async_trait;

use crate::pipeline::Report;

/// Display labels the sinks publish alongside each report.
#[derive(Debug, Clone)]
pub struct FeedLabels {
    pub symbol: String,
    pub timeframe: String,
    pub game: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, report: &Report) -> Result<()>;
    fn name(&self) -> &'static str;
}

#[derive(Default)]
pub struct NotifierMux {
    sinks: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn Notifier>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Deliver to every sink. Failures are logged per sink; a report is
    /// never reprocessed or re-entered into the pipeline.
    pub async fn dispatch(&self, report: &Report) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(report).await {
                tracing::warn!(sink = sink.name(), error = ?e, "sink delivery failed");
            }
        }
    }
}
