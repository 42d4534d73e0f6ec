//! Signal classification: pure mapping from a draw number to a
//! BIG/SMALL + EVEN/ODD decision with a heuristic confidence score.
//!
//! No I/O, no state. The operative feed produces single digits, but the
//! contract covers the full `0..=99` range the normalizer admits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default boundary between SMALL and BIG outcomes.
pub const DEFAULT_BIG_THRESHOLD: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Size {
    Big,
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Parity {
    Even,
    Odd,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Big => write!(f, "BIG"),
            Size::Small => write!(f, "SMALL"),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "EVEN"),
            Parity::Odd => write!(f, "ODD"),
        }
    }
}

/// Classification result for one draw number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub size: Size,
    pub parity: Parity,
    /// Heuristic confidence as an integer percentage.
    pub confidence: u8,
    /// Human-readable summary embedding the number and both labels.
    pub note: String,
}

impl Signal {
    /// Combined label in the form the sinks publish, e.g. "BIG / ODD".
    pub fn decision_label(&self) -> String {
        format!("{} / {}", self.size, self.parity)
    }
}

/// Classify a draw number against the BIG threshold.
///
/// Confidence starts at 60, drops to 55 at the two values nearest the
/// size boundary (`threshold` and `threshold - 1`), and rises to 65 for
/// the extremal single-digit outcomes 0 and 9. The extremal check runs
/// last and overwrites the boundary adjustment when both apply.
pub fn classify(number: u8, threshold: u8) -> Signal {
    debug_assert!(number <= 99, "draw number out of domain: {number}");

    let size = if number >= threshold {
        Size::Big
    } else {
        Size::Small
    };
    let parity = if number % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    };

    let mut confidence = 60;
    if number == threshold || Some(number) == threshold.checked_sub(1) {
        confidence = 55;
    }
    if number == 0 || number == 9 {
        confidence = 65;
    }

    let note = format!("Num={number} -> {size} & {parity}");

    Signal {
        size,
        parity,
        confidence,
        note,
    }
}
