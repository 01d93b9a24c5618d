//! Canonical gateway value
//!
//! A `Gateway` is only ever produced by the normalizer. Its fields are private so that the
//! derived values (total stake, percentages) cannot drift away from their sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized gateway with comparable metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    pub(crate) address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) fqdn: Option<String>,
    pub(crate) status: String,
    pub(crate) operator_stake: f64,
    pub(crate) total_delegated_stake: f64,
    pub(crate) total_stake: f64,
    pub(crate) delegate_stake: f64,
    pub(crate) performance: f64,
    pub(crate) streak: u64,
    pub(crate) reward_share_ratio: f64,
    #[serde(rename = "delegateEAY")]
    pub(crate) delegate_eay: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) observer: Option<Observer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) weights: Option<Weights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<String>,
}

impl Gateway {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn fqdn(&self) -> Option<&str> {
        self.fqdn.as_deref()
    }

    /// Status exactly as the registry reported it.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Status folded into the known set; anything unrecognized is `Unknown`.
    pub fn status_kind(&self) -> GatewayStatus {
        GatewayStatus::parse(&self.status)
    }

    /// Operator stake in tokens.
    pub fn operator_stake(&self) -> f64 {
        self.operator_stake
    }

    /// Delegated stake in tokens.
    pub fn total_delegated_stake(&self) -> f64 {
        self.total_delegated_stake
    }

    /// Always `operator_stake + total_delegated_stake`.
    pub fn total_stake(&self) -> f64 {
        self.total_stake
    }

    /// Older name for `total_delegated_stake`.
    pub fn delegate_stake(&self) -> f64 {
        self.delegate_stake
    }

    /// Gateway performance ratio as a percentage.
    pub fn performance(&self) -> f64 {
        self.performance
    }

    pub fn streak(&self) -> u64 {
        self.streak
    }

    /// Delegate reward share ratio as supplied, not scaled.
    pub fn reward_share_ratio(&self) -> f64 {
        self.reward_share_ratio
    }

    /// Normalized composite weight as a percentage.
    pub fn delegate_eay(&self) -> f64 {
        self.delegate_eay
    }

    pub fn observer(&self) -> Option<&Observer> {
        self.observer.as_ref()
    }

    pub fn weights(&self) -> Option<&Weights> {
        self.weights.as_ref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Name shown in gateway pickers: label, then domain, then address.
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .or(self.fqdn.as_deref())
            .unwrap_or(&self.address)
    }

    /// Heading of a comparison card: label, then domain, then a placeholder.
    pub fn card_title(&self) -> &str {
        self.label
            .as_deref()
            .or(self.fqdn.as_deref())
            .unwrap_or("Unnamed Gateway")
    }

    /// Case-insensitive substring match over address and domain.
    ///
    /// `needle` must already be lower-cased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.address.to_lowercase().contains(needle)
            || self
                .fqdn
                .as_deref()
                .is_some_and(|fqdn| fqdn.to_lowercase().contains(needle))
    }
}

/// Observer role metrics; present only when the registry supplies them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observer {
    pub address: String,
    pub observation_chance: f64,
    pub performance: f64,
    pub current_report_status: String,
    pub failed_gateways: Vec<String>,
}

/// Reward weights, all raw ratios.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub stake_weight: f64,
    pub tenure_weight: f64,
    pub gateway_performance_ratio: f64,
    pub observer_performance_ratio: f64,
    pub composite_weight: f64,
    pub normalized_composite_weight: f64,
}

/// Known gateway states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Online,
    Offline,
    Unknown,
    Joining,
    Leaving,
}

impl GatewayStatus {
    /// Lenient parse used for display. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "online" => GatewayStatus::Online,
            "offline" => GatewayStatus::Offline,
            "joining" => GatewayStatus::Joining,
            "leaving" => GatewayStatus::Leaving,
            _ => GatewayStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayStatus::Online => "online",
            GatewayStatus::Offline => "offline",
            GatewayStatus::Unknown => "unknown",
            GatewayStatus::Joining => "joining",
            GatewayStatus::Leaving => "leaving",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            GatewayStatus::Online => "Online",
            GatewayStatus::Offline => "Offline",
            GatewayStatus::Unknown => "Unknown",
            GatewayStatus::Joining => "Joining",
            GatewayStatus::Leaving => "Leaving",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GatewayStatus::Online => "Gateway is operational",
            GatewayStatus::Offline => "Gateway is not responding",
            GatewayStatus::Unknown => "Gateway status cannot be determined",
            GatewayStatus::Joining => "Gateway is joining the network",
            GatewayStatus::Leaving => "Gateway is leaving the network",
        }
    }
}

impl fmt::Display for GatewayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::{RawGateway, RawSettings, RawWeights};

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!(GatewayStatus::parse("online"), GatewayStatus::Online);
        assert_eq!(GatewayStatus::parse("Leaving"), GatewayStatus::Leaving);
        assert_eq!(GatewayStatus::parse(" JOINING "), GatewayStatus::Joining);
        assert_eq!(GatewayStatus::parse("banana"), GatewayStatus::Unknown);
        assert_eq!(GatewayStatus::parse(""), GatewayStatus::Unknown);
        assert_eq!(GatewayStatus::Offline.text(), "Offline");
    }

    #[test]
    fn test_display_name_and_card_title_fallbacks() {
        let bare = normalize(&RawGateway::with_address("addr-1")).unwrap();
        assert_eq!(bare.display_name(), "addr-1");
        assert_eq!(bare.card_title(), "Unnamed Gateway");

        let mut raw = RawGateway::with_address("addr-2");
        raw.settings = Some(RawSettings {
            fqdn: Some("gate.example".to_string()),
            ..Default::default()
        });
        let with_fqdn = normalize(&raw).unwrap();
        assert_eq!(with_fqdn.display_name(), "gate.example");
        assert_eq!(with_fqdn.card_title(), "gate.example");

        raw.settings.as_mut().unwrap().label = Some("Gate".to_string());
        let labelled = normalize(&raw).unwrap();
        assert_eq!(labelled.display_name(), "Gate");
        assert_eq!(labelled.card_title(), "Gate");
    }

    #[test]
    fn test_serialized_field_names() {
        let mut raw = RawGateway::with_address("abc");
        raw.weights = Some(RawWeights {
            normalized_composite_weight: Some(0.02.into()),
            ..Default::default()
        });
        let gateway = normalize(&raw).unwrap();

        let json = serde_json::to_value(&gateway).unwrap();
        assert_eq!(json["address"], "abc");
        assert_eq!(json["status"], "unknown");
        assert_eq!(json["delegateEAY"], 2.0);
        assert!(json.get("delegateStake").is_some());
        assert!(json.get("totalDelegatedStake").is_some());
        assert!(json["weights"].get("normalizedCompositeWeight").is_some());
        assert!(json.get("label").is_none());
        assert!(json.get("observer").is_none());
        assert!(json.get("version").is_none());
    }
}
