//! Gateway records as the registry hands them out
//!
//! Everything is optional at the type level. Deciding what a missing field means is the
//! normalizer's job, not the deserializer's.

use serde::{Deserialize, Deserializer, Serialize};

/// Raw stake amount in the registry's smallest unit.
///
/// The registry is not consistent about whether amounts are JSON strings or numbers, so both
/// are accepted and kept as text until conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StakeUnits(String);

impl StakeUnits {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StakeUnits {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for StakeUnits {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<u64> for StakeUnits {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for StakeUnits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_text(deserializer).map(Self)
    }
}

/// Any other numeric field of a record, kept as text until the normalizer reads it.
///
/// Same leniency as [`StakeUnits`]: a value of the wrong JSON type never fails the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawNumber(String);

impl RawNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawNumber {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<f64> for RawNumber {
    fn from(raw: f64) -> Self {
        Self(raw.to_string())
    }
}

impl From<u64> for RawNumber {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_text(deserializer).map(Self)
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        // kept as text so the converter reports it instead of failing the whole record
        other => other.to_string(),
    })
}

/// One gateway record from the registry's "list gateways" call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGateway {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<RawSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_stake: Option<StakeUnits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_delegated_stake: Option<StakeUnits>,
    /// Ignored by the normalizer, the total is always re-derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_stake: Option<StakeUnits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<RawStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<RawWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer: Option<RawObserver>,
}

impl RawGateway {
    /// Minimal record carrying only an address, handy as a starting point.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            gateway_address: Some(address.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate_reward_share_ratio: Option<RawNumber>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_consecutive_epochs: Option<RawNumber>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWeights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stake_weight: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure_weight: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_performance_ratio: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer_performance_ratio: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_weight: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_composite_weight: Option<RawNumber>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObserver {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_chance: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_report_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_gateways: Option<Vec<String>>,
}
