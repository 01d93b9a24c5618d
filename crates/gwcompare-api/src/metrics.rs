use std::collections::HashMap;
use tokio::sync::RwLock;
use serde_json::Value;

use gwcompare_common::BatchReport;

pub const GATEWAY_FETCHES: &str = "gateway_fetches";
pub const GATEWAY_FETCH_FAILURES: &str = "gateway_fetch_failures";
pub const GATEWAYS_RECEIVED: &str = "gateways_received";
pub const MALFORMED_RECORDS: &str = "malformed_records";
pub const DUPLICATE_RECORDS: &str = "duplicate_records";

/// Metrics service for collecting and retrieving metrics
#[derive(Debug)]
pub struct MetricsService {
    /// Stored metrics
    metrics: RwLock<HashMap<String, Value>>,
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsService {
    /// Create a new metrics service with every gateway counter at zero
    pub fn new() -> Self {
        let counters = [
            GATEWAY_FETCHES,
            GATEWAY_FETCH_FAILURES,
            GATEWAYS_RECEIVED,
            MALFORMED_RECORDS,
            DUPLICATE_RECORDS,
        ];
        Self {
            metrics: RwLock::new(
                counters
                    .into_iter()
                    .map(|key| (key.to_string(), Value::from(0u64)))
                    .collect(),
            ),
        }
    }

    /// Set a metric value
    pub async fn set_metric(&self, key: &str, value: Value) {
        self.metrics.write().await.insert(key.to_string(), value);
    }

    /// Get a specific metric value
    pub async fn get_metric(&self, key: &str) -> Option<Value> {
        self.metrics.read().await.get(key).cloned()
    }

    /// Add `by` to a counter; a missing or non-numeric metric restarts at zero
    pub async fn increment(&self, key: &str, by: u64) {
        let mut metrics = self.metrics.write().await;
        let current = metrics.get(key).and_then(Value::as_u64).unwrap_or(0);
        metrics.insert(key.to_string(), Value::from(current.saturating_add(by)));
    }

    /// Count one successful registry fetch and what normalization dropped from it
    pub async fn record_fetch(&self, report: &BatchReport) {
        self.increment(GATEWAY_FETCHES, 1).await;
        self.increment(GATEWAYS_RECEIVED, report.received as u64).await;
        self.increment(MALFORMED_RECORDS, report.malformed as u64).await;
        self.increment(DUPLICATE_RECORDS, report.duplicates as u64).await;
    }

    pub async fn record_fetch_failure(&self) {
        self.increment(GATEWAY_FETCHES, 1).await;
        self.increment(GATEWAY_FETCH_FAILURES, 1).await;
    }

    /// Get all metrics
    pub async fn get_metrics(&self) -> Value {
        let metrics = self.metrics.read().await;
        serde_json::to_value(&*metrics).unwrap_or(Value::Object(serde_json::Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters_start_at_zero() {
        let metrics = MetricsService::new();
        assert_eq!(metrics.get_metric(GATEWAY_FETCHES).await, Some(Value::from(0u64)));
        assert_eq!(metrics.get_metric("unknown").await, None);
    }

    #[tokio::test]
    async fn test_record_fetch() {
        let metrics = MetricsService::new();
        let report = BatchReport {
            received: 5,
            normalized: 3,
            malformed: 1,
            duplicates: 1,
        };
        metrics.record_fetch(&report).await;
        metrics.record_fetch(&report).await;
        metrics.record_fetch_failure().await;

        let all = metrics.get_metrics().await;
        assert_eq!(all[GATEWAY_FETCHES], 3);
        assert_eq!(all[GATEWAY_FETCH_FAILURES], 1);
        assert_eq!(all[GATEWAYS_RECEIVED], 10);
        assert_eq!(all[MALFORMED_RECORDS], 2);
        assert_eq!(all[DUPLICATE_RECORDS], 2);
    }

    #[tokio::test]
    async fn test_increment_overwrites_non_numeric() {
        let metrics = MetricsService::new();
        metrics.set_metric("custom", Value::from("text")).await;
        metrics.increment("custom", 2).await;
        assert_eq!(metrics.get_metric("custom").await, Some(Value::from(2u64)));
    }
}
