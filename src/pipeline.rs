//! Event pipeline: normalize → dedup → classify, producing at most one
//! `Report` per raw feed message.
//!
//! Both "nothing extractable" and "already reported" are ordinary `None`
//! outcomes, not errors — malformed and repeated input are routine for
//! this feed.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::dedup::{fallback_key, DedupWindow};
use crate::normalize::{normalize, CanonicalEvent};
use crate::signal::{classify, Signal};

/// One-time metrics registration (so series show up on whatever recorder
/// the embedder installs).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_messages_total", "Raw messages handed to the pipeline.");
        describe_counter!("events_reported_total", "Events that produced a report.");
        describe_counter!("events_dedup_total", "Events dropped as duplicates.");
        describe_counter!(
            "events_unparsed_total",
            "Messages with no extractable event."
        );
    });
}

/// Finished unit handed to the sinks: one per accepted event.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub event: CanonicalEvent,
    pub signal: Signal,
    pub emitted_at: DateTime<Utc>,
}

/// Owns the dedup window and the configured threshold; one instance per
/// feed consumer task.
#[derive(Debug)]
pub struct Pipeline {
    window: DedupWindow,
    threshold: u8,
}

impl Pipeline {
    pub fn new(threshold: u8, window_capacity: usize) -> Self {
        ensure_metrics_described();
        Self {
            window: DedupWindow::new(window_capacity),
            threshold,
        }
    }

    /// Process one raw feed message. `None` means nothing to report:
    /// either no extractable event or a duplicate round.
    pub fn handle(&mut self, raw: &Value) -> Option<Report> {
        self.handle_at(raw, Utc::now())
    }

    /// Like `handle` but with an explicit clock, for deterministic tests
    /// of the minute-bucket fallback key.
    pub fn handle_at(&mut self, raw: &Value, now: DateTime<Utc>) -> Option<Report> {
        counter!("feed_messages_total").increment(1);

        let Some(event) = normalize(raw) else {
            counter!("events_unparsed_total").increment(1);
            debug!("no extractable event in payload");
            return None;
        };

        let key = match &event.issue {
            Some(issue) => issue.clone(),
            None => fallback_key(event.number, now.timestamp()),
        };
        if !self.window.accept(&key) {
            counter!("events_dedup_total").increment(1);
            debug!(key = %key, "duplicate round dropped");
            return None;
        }

        let signal = classify(event.number, self.threshold);
        counter!("events_reported_total").increment(1);
        info!(
            issue = event.issue.as_deref().unwrap_or("-"),
            number = event.number,
            decision = %signal.decision_label(),
            confidence = signal.confidence,
            "signal"
        );

        Some(Report {
            event,
            signal,
            emitted_at: now,
        })
    }
}
