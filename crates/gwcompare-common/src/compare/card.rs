//! Side-by-side comparison card for a gateway
//!
//! A card lists every comparable metric of one gateway, grouped in sections, each compared with
//! the same metric of a counterpart gateway. Without a counterpart every metric is compared
//! with zero.

use serde::Serialize;

use super::{compare, Comparison, FormatMode};
use crate::types::{Gateway, GatewayStatus};

const TOKEN_UNIT: &str = " ARIO";
const PERCENT_UNIT: &str = "%";
const NORMALIZED_UNIT: &str = "normalized";
const NO_VERSION: &str = "-";

struct MetricSpec {
    label: &'static str,
    unit: &'static str,
    mode: FormatMode,
    value: fn(&Gateway) -> f64,
}

struct SectionSpec {
    title: &'static str,
    metrics: &'static [MetricSpec],
}

const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        title: "Stake Information",
        metrics: &[
            MetricSpec {
                label: "Operator Stake",
                unit: TOKEN_UNIT,
                mode: FormatMode::Stake,
                value: Gateway::operator_stake,
            },
            MetricSpec {
                label: "Total Delegated Stake",
                unit: TOKEN_UNIT,
                mode: FormatMode::Stake,
                value: Gateway::total_delegated_stake,
            },
            MetricSpec {
                label: "Total Stake",
                unit: TOKEN_UNIT,
                mode: FormatMode::Stake,
                value: Gateway::total_stake,
            },
            MetricSpec {
                label: "Reward Share Ratio",
                unit: PERCENT_UNIT,
                mode: FormatMode::Plain,
                value: Gateway::reward_share_ratio,
            },
            MetricSpec {
                label: "Delegate EAY",
                unit: PERCENT_UNIT,
                mode: FormatMode::Plain,
                value: Gateway::delegate_eay,
            },
        ],
    },
    SectionSpec {
        title: "Performance Metrics",
        metrics: &[
            MetricSpec {
                label: "Performance",
                unit: PERCENT_UNIT,
                mode: FormatMode::Plain,
                value: Gateway::performance,
            },
            MetricSpec {
                label: "Gateway Perf. Ratio",
                unit: PERCENT_UNIT,
                mode: FormatMode::Plain,
                value: |g| g.weights().map_or(0.0, |w| w.gateway_performance_ratio) * 100.0,
            },
            MetricSpec {
                label: "Observer Perf. Ratio",
                unit: PERCENT_UNIT,
                mode: FormatMode::Plain,
                value: |g| g.weights().map_or(0.0, |w| w.observer_performance_ratio) * 100.0,
            },
            MetricSpec {
                label: "Tenure Weight",
                unit: "",
                mode: FormatMode::Plain,
                value: |g| g.weights().map_or(0.0, |w| w.tenure_weight),
            },
            MetricSpec {
                label: "Streak",
                unit: "",
                mode: FormatMode::Plain,
                value: |g| g.streak() as f64,
            },
        ],
    },
    SectionSpec {
        title: "Observer Metrics",
        metrics: &[
            MetricSpec {
                label: "Observation Chance",
                unit: PERCENT_UNIT,
                mode: FormatMode::Plain,
                value: |g| g.observer().map_or(0.0, |o| o.observation_chance),
            },
            MetricSpec {
                label: "Observer Performance",
                unit: PERCENT_UNIT,
                mode: FormatMode::Plain,
                value: |g| g.observer().map_or(0.0, |o| o.performance),
            },
        ],
    },
    SectionSpec {
        title: "Additional Weights",
        metrics: &[
            MetricSpec {
                label: "Stake Weight",
                unit: "",
                mode: FormatMode::Plain,
                value: |g| g.weights().map_or(0.0, |w| w.stake_weight),
            },
            MetricSpec {
                label: "Composite Weight",
                unit: "",
                mode: FormatMode::Plain,
                value: |g| g.weights().map_or(0.0, |w| w.composite_weight),
            },
            MetricSpec {
                label: "Normalized Weight",
                unit: NORMALIZED_UNIT,
                mode: FormatMode::Ratio,
                value: |g| g.weights().map_or(0.0, |w| w.normalized_composite_weight),
            },
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub label: &'static str,
    pub unit: &'static str,
    pub mode: FormatMode,
    pub value: f64,
    pub comparison: Comparison,
}

impl MetricRow {
    /// Formatted value followed by its unit, e.g. `"1,250.0 ARIO"`.
    pub fn display(&self) -> String {
        format!("{}{}", self.comparison.formatted, self.unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSection {
    pub title: &'static str,
    pub rows: Vec<MetricRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonCard {
    pub title: String,
    pub address: String,
    pub status: GatewayStatus,
    /// Badge text for `status`, e.g. `"Online"`.
    pub status_text: &'static str,
    /// Tooltip sentence for `status`.
    pub status_description: &'static str,
    pub version: String,
    pub sections: Vec<CardSection>,
}

impl ComparisonCard {
    /// Builds the card for `gateway`, comparing against `compared` or against zero.
    pub fn build(gateway: &Gateway, compared: Option<&Gateway>) -> Self {
        let sections = SECTIONS
            .iter()
            .map(|section| CardSection {
                title: section.title,
                rows: section
                    .metrics
                    .iter()
                    .map(|metric| {
                        let value = (metric.value)(gateway);
                        let other_value = compared.map_or(0.0, metric.value);
                        MetricRow {
                            label: metric.label,
                            unit: metric.unit,
                            mode: metric.mode,
                            value,
                            comparison: compare(value, other_value, metric.mode),
                        }
                    })
                    .collect(),
            })
            .collect();

        let status = gateway.status_kind();
        Self {
            title: gateway.card_title().to_string(),
            address: gateway.address().to_string(),
            status,
            status_text: status.text(),
            status_description: status.description(),
            version: gateway.version().unwrap_or(NO_VERSION).to_string(),
            sections,
        }
    }

    pub fn row(&self, label: &str) -> Option<&MetricRow> {
        self.sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .find(|row| row.label == label)
    }
}

/// Two cards compared against each other; either side may be unselected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPair {
    pub first: Option<ComparisonCard>,
    pub second: Option<ComparisonCard>,
}

impl ComparisonPair {
    pub fn build(first: Option<&Gateway>, second: Option<&Gateway>) -> Self {
        Self {
            first: first.map(|gateway| ComparisonCard::build(gateway, second)),
            second: second.map(|gateway| ComparisonCard::build(gateway, first)),
        }
    }
}
