//! Raw registry record → canonical `Gateway`
//!
//! Normalization never touches the network or shared state; the same record always produces
//! the same gateway. Recoverable data problems (bad stake amounts, non-numeric ratios or counts)
//! are logged and replaced by zero, a record without an address is rejected on its own without failing its batch.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::convert::{parse_count, parse_number, ratio_to_percent, stake_units_to_decimal};
use crate::errors::{Error, Result};
use crate::types::{
    Gateway, Observer, RawGateway, RawNumber, RawObserver, RawWeights, StakeUnits, Weights,
};

const UNKNOWN: &str = "unknown";

/// Outcome counters of a batch normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub received: usize,
    pub normalized: usize,
    pub malformed: usize,
    pub duplicates: usize,
}

/// Gateways that survived normalization together with what was dropped on the way.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub gateways: Vec<Gateway>,
    pub report: BatchReport,
}

/// Builds the canonical gateway for one registry record.
pub fn normalize(raw: &RawGateway) -> Result<Gateway> {
    let address = raw
        .gateway_address
        .as_deref()
        .filter(|address| !address.trim().is_empty())
        .ok_or_else(|| Error::MalformedRecord("record has no gateway address".to_string()))?;

    let (label, fqdn, reward_share_ratio) = match &raw.settings {
        Some(settings) => (
            settings.label.clone(),
            settings.fqdn.clone(),
            // copied as supplied, never scaled to a percentage like performance and delegate EAY
            number(
                address,
                "delegateRewardShareRatio",
                settings.delegate_reward_share_ratio.as_ref(),
            )
            .unwrap_or(0.0),
        ),
        None => (None, None, 0.0),
    };

    let operator_stake = stake_tokens(address, "operatorStake", raw.operator_stake.as_ref());
    let total_delegated_stake =
        stake_tokens(address, "totalDelegatedStake", raw.total_delegated_stake.as_ref());
    // Any total the registry sends is ignored.
    let total_stake = operator_stake + total_delegated_stake;

    let raw_weights = raw.weights.as_ref();
    let weights = raw_weights.map(|weights| weights_from(address, weights));
    let performance =
        ratio_to_percent(weights.as_ref().map(|weights| weights.gateway_performance_ratio));
    let delegate_eay =
        ratio_to_percent(weights.as_ref().map(|weights| weights.normalized_composite_weight));

    let streak = count(
        address,
        "passedConsecutiveEpochs",
        raw.stats
            .as_ref()
            .and_then(|stats| stats.passed_consecutive_epochs.as_ref()),
    );

    Ok(Gateway {
        address: address.to_string(),
        label,
        fqdn,
        status: non_empty_or_unknown(raw.status.as_deref()),
        operator_stake,
        total_delegated_stake,
        total_stake,
        delegate_stake: total_delegated_stake,
        performance,
        streak,
        reward_share_ratio,
        delegate_eay,
        observer: raw
            .observer
            .as_ref()
            .map(|observer| observer_from(address, observer)),
        weights,
        version: raw.version.clone(),
    })
}

/// Normalizes a whole listing, skipping records that cannot be normalized.
pub fn normalize_batch(raws: &[RawGateway]) -> Result<Vec<Gateway>> {
    normalize_batch_with_report(raws).map(|batch| batch.gateways)
}

/// Like [`normalize_batch`], also reporting how many records were dropped and why.
///
/// Malformed records and repeated addresses are skipped (the first occurrence of an address
/// wins). The batch only fails when it is non-empty and no record at all is usable.
pub fn normalize_batch_with_report(raws: &[RawGateway]) -> Result<NormalizedBatch> {
    normalize_entries(raws.iter().map(Ok))
}

/// Same as [`normalize_batch_with_report`] for a registry listing in which some entries could
/// not even be decoded. Those count as malformed records.
pub fn normalize_listing_with_report(entries: &[Result<RawGateway>]) -> Result<NormalizedBatch> {
    normalize_entries(entries.iter().map(|entry| entry.as_ref()))
}

fn normalize_entries<'a, I>(entries: I) -> Result<NormalizedBatch>
where
    I: ExactSizeIterator<Item = std::result::Result<&'a RawGateway, &'a Error>>,
{
    let mut report = BatchReport {
        received: entries.len(),
        ..Default::default()
    };
    let mut seen = HashSet::with_capacity(report.received);
    let mut gateways = Vec::with_capacity(report.received);

    for (index, entry) in entries.enumerate() {
        let normalized = match entry {
            Ok(raw) => normalize(raw),
            Err(e) => {
                warn!("Skipping undecodable gateway record at position {}: {}", index, e);
                report.malformed += 1;
                continue;
            }
        };
        match normalized {
            Ok(gateway) => {
                if !seen.insert(gateway.address.clone()) {
                    warn!("Skipping duplicate gateway {} at position {}", gateway.address, index);
                    report.duplicates += 1;
                    continue;
                }
                gateways.push(gateway);
            }
            Err(e) => {
                warn!("Skipping gateway record at position {}: {}", index, e);
                report.malformed += 1;
            }
        }
    }

    report.normalized = gateways.len();
    if report.received > 0 && report.malformed == report.received {
        return Err(Error::MalformedRecord(format!(
            "all {} records in batch are malformed",
            report.received
        )));
    }

    debug!(
        "Normalized {} of {} gateway records ({} malformed, {} duplicates)",
        report.normalized, report.received, report.malformed, report.duplicates
    );
    Ok(NormalizedBatch { gateways, report })
}

/// Converts one stake field, falling back to zero on anything unusable.
fn stake_tokens(address: &str, field: &str, raw: Option<&StakeUnits>) -> f64 {
    let Some(raw) = raw else {
        warn!("Gateway {} has no {}, using 0", address, field);
        return 0.0;
    };

    match stake_units_to_decimal(raw.as_str()) {
        Ok(tokens) if tokens < 0.0 => {
            warn!("Gateway {} has negative {} ({}), using 0", address, field, raw.as_str());
            0.0
        }
        // folds -0.0 into 0.0
        Ok(tokens) if tokens == 0.0 => 0.0,
        Ok(tokens) => tokens,
        Err(e) => {
            warn!("Gateway {} {}: {}, using 0", address, field, e);
            0.0
        }
    }
}

/// Reads a numeric field; `None` when absent, zero (with a warning) when not a number.
fn number(address: &str, field: &str, raw: Option<&RawNumber>) -> Option<f64> {
    let raw = raw?;
    match parse_number(raw.as_str()) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Gateway {} {}: {}, using 0", address, field, e);
            Some(0.0)
        }
    }
}

fn count(address: &str, field: &str, raw: Option<&RawNumber>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    parse_count(raw.as_str()).unwrap_or_else(|e| {
        warn!("Gateway {} {}: {}, using 0", address, field, e);
        0
    })
}

fn observer_from(address: &str, raw: &RawObserver) -> Observer {
    let field = |name, value: &Option<RawNumber>| {
        number(address, name, value.as_ref()).unwrap_or(0.0)
    };
    Observer {
        address: raw.wallet_address.clone().unwrap_or_default(),
        observation_chance: field("observer.observationChance", &raw.observation_chance),
        performance: field("observer.performance", &raw.performance),
        current_report_status: non_empty_or_unknown(raw.current_report_status.as_deref()),
        failed_gateways: raw.failed_gateways.clone().unwrap_or_default(),
    }
}

fn weights_from(address: &str, raw: &RawWeights) -> Weights {
    let field = |name, value: &Option<RawNumber>| {
        number(address, name, value.as_ref()).unwrap_or(0.0)
    };
    Weights {
        stake_weight: field("weights.stakeWeight", &raw.stake_weight),
        tenure_weight: field("weights.tenureWeight", &raw.tenure_weight),
        gateway_performance_ratio: field(
            "weights.gatewayPerformanceRatio",
            &raw.gateway_performance_ratio,
        ),
        observer_performance_ratio: field(
            "weights.observerPerformanceRatio",
            &raw.observer_performance_ratio,
        ),
        composite_weight: field("weights.compositeWeight", &raw.composite_weight),
        normalized_composite_weight: field(
            "weights.normalizedCompositeWeight",
            &raw.normalized_composite_weight,
        ),
    }
}

fn non_empty_or_unknown(value: Option<&str>) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
