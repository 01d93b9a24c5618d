//! Gateway listing on top of a registry
//!
//! The registry does the sorting and limiting; this layer normalizes what comes back and applies
//! the local text filter. One registry request per call, no retries, no caching.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::QueryDefaults;
use crate::errors::{Error, Result};
use crate::normalize::{normalize_listing_with_report, NormalizedBatch};
use crate::types::{Gateway, GatewayQuery, ListGatewaysParams, RawGateway};

/// Source of raw gateway records.
#[async_trait]
pub trait GatewayRegistry: Send + Sync {
    /// Returns up to `params.limit` records, ordered by the registry.
    ///
    /// The outer error fails the whole listing. An inner error stands for one entry that could
    /// not be decoded; the rest of the listing is still usable.
    async fn list_gateways(
        &self,
        params: &ListGatewaysParams,
    ) -> Result<Vec<Result<RawGateway>>>;

    fn name(&self) -> &str {
        "registry"
    }
}

#[derive(Clone)]
pub struct GatewayQueryService {
    registry: Arc<dyn GatewayRegistry>,
    defaults: QueryDefaults,
}

impl GatewayQueryService {
    pub fn new(registry: Arc<dyn GatewayRegistry>, defaults: QueryDefaults) -> Self {
        Self { registry, defaults }
    }

    pub fn registry_name(&self) -> &str {
        self.registry.name()
    }

    pub fn defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    /// A query carrying this service's defaults and no search text.
    pub fn default_query(&self) -> GatewayQuery {
        GatewayQuery::from_defaults(&self.defaults)
    }

    pub async fn query(&self, query: &GatewayQuery) -> Result<Vec<Gateway>> {
        self.query_with_report(query).await.map(|batch| batch.gateways)
    }

    /// Runs `query`; the report counts records before the search filter.
    pub async fn query_with_report(&self, query: &GatewayQuery) -> Result<NormalizedBatch> {
        let params = query.list_params();
        debug!(
            "Listing gateways from {} (limit={}, sortBy={}, sortOrder={})",
            self.registry.name(),
            params.limit,
            params.sort_by,
            params.sort_order
        );

        let entries = self.registry.list_gateways(&params).await.map_err(|e| {
            error!("Failed to list gateways from {}: {}", self.registry.name(), e);
            match e {
                Error::FetchFailed(_) => e,
                other => Error::FetchFailed(other.to_string()),
            }
        })?;

        let mut batch = normalize_listing_with_report(&entries)?;
        batch.gateways = filter_gateways(batch.gateways, &query.search);
        Ok(batch)
    }

    /// Looks up one gateway by exact address within the default listing.
    pub async fn find(&self, address: &str) -> Result<Option<Gateway>> {
        let gateways = self.query(&self.default_query()).await?;
        Ok(gateways.into_iter().find(|gateway| gateway.address() == address))
    }
}

/// Keeps gateways whose address or domain contains `search`, ignoring case.
///
/// An empty search keeps everything. The text is used as given, so surrounding whitespace is
/// part of what must match. Order is preserved.
pub fn filter_gateways(gateways: Vec<Gateway>, search: &str) -> Vec<Gateway> {
    if search.is_empty() {
        return gateways;
    }
    let needle = search.to_lowercase();
    gateways
        .into_iter()
        .filter(|gateway| gateway.matches_lowercase(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawSettings, SortBy, SortOrder};
    use std::sync::Mutex;

    struct FakeRegistry {
        records: Vec<RawGateway>,
        calls: Mutex<Vec<ListGatewaysParams>>,
    }

    impl FakeRegistry {
        fn new(records: Vec<RawGateway>) -> Arc<Self> {
            Arc::new(Self {
                records,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GatewayRegistry for FakeRegistry {
        async fn list_gateways(
            &self,
            params: &ListGatewaysParams,
        ) -> Result<Vec<Result<RawGateway>>> {
            self.calls.lock().unwrap().push(*params);
            Ok(self
                .records
                .iter()
                .take(params.limit.get() as usize)
                .cloned()
                .map(Ok)
                .collect())
        }
    }

    struct FailingRegistry(fn() -> Error);

    #[async_trait]
    impl GatewayRegistry for FailingRegistry {
        async fn list_gateways(
            &self,
            _params: &ListGatewaysParams,
        ) -> Result<Vec<Result<RawGateway>>> {
            Err((self.0)())
        }
    }

    struct ListingRegistry(fn() -> Vec<Result<RawGateway>>);

    #[async_trait]
    impl GatewayRegistry for ListingRegistry {
        async fn list_gateways(
            &self,
            _params: &ListGatewaysParams,
        ) -> Result<Vec<Result<RawGateway>>> {
            Ok((self.0)())
        }
    }

    fn undecodable(position: usize) -> Error {
        Error::MalformedRecord(format!("undecodable record at position {}", position))
    }

    fn with_fqdn(address: &str, fqdn: &str) -> RawGateway {
        RawGateway {
            settings: Some(RawSettings {
                fqdn: Some(fqdn.to_string()),
                ..Default::default()
            }),
            ..RawGateway::with_address(address)
        }
    }

    fn service(registry: Arc<dyn GatewayRegistry>) -> GatewayQueryService {
        GatewayQueryService::new(registry, QueryDefaults::default())
    }

    #[tokio::test]
    async fn test_search_filters_by_address() {
        let registry = FakeRegistry::new(vec![
            RawGateway::with_address("abc123"),
            RawGateway::with_address("xyz"),
        ]);
        let service = service(registry);

        let query = service.default_query().with_search("abc");
        let gateways = service.query(&query).await.unwrap();
        let addresses: Vec<_> = gateways.iter().map(|g| g.address()).collect();
        assert_eq!(addresses, vec!["abc123"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_fqdn() {
        let registry = FakeRegistry::new(vec![
            with_fqdn("g1", "Alpha.Example"),
            with_fqdn("g2", "beta.example"),
            RawGateway::with_address("ALPHA-node"),
        ]);
        let service = service(registry);

        let gateways = service
            .query(&service.default_query().with_search("ALPHA"))
            .await
            .unwrap();
        let addresses: Vec<_> = gateways.iter().map(|g| g.address()).collect();
        assert_eq!(addresses, vec!["g1", "ALPHA-node"]);

        let everything = service
            .query(&service.default_query().with_search(""))
            .await
            .unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn test_search_whitespace_is_matched_literally() {
        let registry = FakeRegistry::new(vec![
            with_fqdn("g1", "alpha.example"),
            RawGateway::with_address("g2"),
        ]);
        let service = service(registry);

        let blank = service
            .query(&service.default_query().with_search("  "))
            .await
            .unwrap();
        assert!(blank.is_empty());

        let padded = service
            .query(&service.default_query().with_search(" alpha"))
            .await
            .unwrap();
        assert!(padded.is_empty());
    }

    #[tokio::test]
    async fn test_query_forwards_params_once() {
        let registry = FakeRegistry::new(vec![RawGateway::with_address("a")]);
        let service = service(registry.clone());

        let query = GatewayQuery {
            sort_by: SortBy::Streak,
            sort_order: SortOrder::Asc,
            search: "nothing-matches".to_string(),
            limit: std::num::NonZeroU32::new(5).unwrap(),
        };
        let gateways = service.query(&query).await.unwrap();
        assert!(gateways.is_empty());

        let calls = registry.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].sort_by, SortBy::Streak);
        assert_eq!(calls[0].sort_order, SortOrder::Asc);
        assert_eq!(calls[0].limit.get(), 5);
    }

    #[tokio::test]
    async fn test_defaults_are_used() {
        let registry = FakeRegistry::new(vec![]);
        let service = service(registry.clone());
        service.query(&service.default_query()).await.unwrap();

        let calls = registry.calls.lock().unwrap();
        assert_eq!(calls[0].limit.get(), 100);
        assert_eq!(calls[0].sort_by, SortBy::OperatorStake);
        assert_eq!(calls[0].sort_order, SortOrder::Desc);
    }

    #[tokio::test]
    async fn test_fetch_errors_become_fetch_failed() {
        let refused = service(Arc::new(FailingRegistry(|| {
            Error::FetchFailed("connection refused".to_string())
        })));
        let result = refused.query(&refused.default_query()).await;
        assert!(matches!(result, Err(Error::FetchFailed(msg)) if msg == "connection refused"));

        let undecodable = service(Arc::new(FailingRegistry(|| {
            Error::Json(serde_json::from_str::<u32>("{").unwrap_err())
        })));
        let result = undecodable.find("abc").await;
        assert!(matches!(result, Err(Error::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_report_counts_before_filtering() {
        let registry = FakeRegistry::new(vec![
            RawGateway::with_address("abc123"),
            RawGateway::default(),
            RawGateway::with_address("xyz"),
        ]);
        let service = service(registry);

        let batch = service
            .query_with_report(&service.default_query().with_search("abc"))
            .await
            .unwrap();
        assert_eq!(batch.gateways.len(), 1);
        assert_eq!(batch.report.received, 3);
        assert_eq!(batch.report.normalized, 2);
        assert_eq!(batch.report.malformed, 1);
    }

    #[tokio::test]
    async fn test_undecodable_entries_are_reported_as_malformed() {
        let service = service(Arc::new(ListingRegistry(|| {
            vec![
                Ok(RawGateway::with_address("a")),
                Err(undecodable(1)),
                Ok(RawGateway::with_address("b")),
            ]
        })));

        let batch = service
            .query_with_report(&service.default_query())
            .await
            .unwrap();
        assert_eq!(batch.gateways.len(), 2);
        assert_eq!(batch.report.received, 3);
        assert_eq!(batch.report.malformed, 1);
    }

    #[tokio::test]
    async fn test_all_undecodable_listing_is_an_error() {
        let service = service(Arc::new(ListingRegistry(|| {
            vec![Err(undecodable(0)), Err(undecodable(1))]
        })));

        let result = service.query(&service.default_query()).await;
        assert!(matches!(result, Err(Error::MalformedRecord(_))));
    }

    #[tokio::test]
    async fn test_find_matches_exact_address() {
        let registry = FakeRegistry::new(vec![
            RawGateway::with_address("abc123"),
            RawGateway::with_address("abc"),
        ]);
        let service = service(registry);

        let found = service.find("abc").await.unwrap().unwrap();
        assert_eq!(found.address(), "abc");
        assert!(service.find("ABC").await.unwrap().is_none());
    }
}
