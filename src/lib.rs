// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod dedup;
pub mod feed;
pub mod heartbeat;
pub mod normalize;
pub mod notify;
pub mod pipeline;
pub mod signal;

// ---- Re-exports for stable public API ----
pub use crate::dedup::DedupWindow;
pub use crate::normalize::{normalize, CanonicalEvent};
pub use crate::notify::{FeedLabels, Notifier, NotifierMux};
pub use crate::pipeline::{Pipeline, Report};
pub use crate::signal::{classify, Parity, Signal, Size};
