//! Directional metric comparison
//!
//! Each metric of a gateway is compared with the same metric of another gateway (or with 0
//! when there is nothing to compare against) and rendered for display.

pub mod card;
mod format;

pub use card::{CardSection, ComparisonCard, ComparisonPair, MetricRow};
pub use format::{format_value, FormatMode};

use serde::{Deserialize, Serialize};

/// How a value relates to its counterpart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Higher,
    Lower,
    Equal,
}

impl Direction {
    /// Arrow shown next to the value; equal values get none.
    pub fn arrow(&self) -> Option<&'static str> {
        match self {
            Direction::Higher => Some("↑"),
            Direction::Lower => Some("↓"),
            Direction::Equal => None,
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            Direction::Higher => "positive",
            Direction::Lower => "negative",
            Direction::Equal => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub direction: Direction,
    pub formatted: String,
}

/// Compares `value` against `other_value` and formats `value`.
///
/// With no counterpart, pass `0.0` as `other_value`.
pub fn compare(value: f64, other_value: f64, mode: FormatMode) -> Comparison {
    // Exact equality on purpose. Values that differ only by float noise (say a sum that came
    // out as 0.30000000000000004) compare as Higher/Lower, never Equal.
    let direction = if value == other_value {
        Direction::Equal
    } else if value > other_value {
        Direction::Higher
    } else {
        Direction::Lower
    };

    Comparison {
        direction,
        formatted: format_value(value, mode),
    }
}
