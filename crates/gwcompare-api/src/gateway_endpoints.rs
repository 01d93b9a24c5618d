use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::num::NonZeroU32;
use tracing::{debug, error};

use gwcompare_common::{ComparisonPair, Gateway, GatewayQuery, SortBy, SortOrder};

use crate::rest::AppState;
use crate::types::ApiError;

/// Body message of every failed gateway fetch
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch gateway data";

// Query parameters for the gateway listing; absent values fall back to the service defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayListParams {
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

impl GatewayListParams {
    fn into_query(self, mut query: GatewayQuery) -> Result<GatewayQuery, ApiError> {
        if let Some(limit) = self.limit {
            query.limit = limit
                .trim()
                .parse::<NonZeroU32>()
                .map_err(|_| ApiError::BadRequest(format!("invalid limit: {}", limit)))?;
        }
        if let Some(sort_by) = self.sort_by {
            query.sort_by = sort_by
                .parse::<SortBy>()
                .map_err(|_| ApiError::BadRequest(format!("invalid sortBy: {}", sort_by)))?;
        }
        if let Some(sort_order) = self.sort_order {
            query.sort_order = SortOrder::parse_lenient(&sort_order);
        }
        if let Some(search) = self.search {
            query.search = search;
        }
        Ok(query)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    pub first: Option<String>,
    pub second: Option<String>,
}

// One registry round trip, counted in the metrics either way
async fn fetch_gateways(state: &AppState, query: &GatewayQuery) -> Result<Vec<Gateway>, ApiError> {
    match state.query.query_with_report(query).await {
        Ok(batch) => {
            state.metrics.record_fetch(&batch.report).await;
            Ok(batch.gateways)
        }
        Err(e) => {
            error!("Failed to fetch gateways: {}", e);
            state.metrics.record_fetch_failure().await;
            Err(ApiError::Internal(FETCH_FAILED_MESSAGE.to_string()))
        }
    }
}

fn take_gateway(gateways: &[Gateway], address: &str) -> Result<Gateway, ApiError> {
    gateways
        .iter()
        .find(|gateway| gateway.address() == address)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Gateway not found: {}", address)))
}

// List gateways
pub async fn list_gateways(
    State(state): State<AppState>,
    Query(params): Query<GatewayListParams>,
) -> Result<Json<Vec<Gateway>>, ApiError> {
    let query = params.into_query(state.query.default_query())?;
    let gateways = fetch_gateways(&state, &query).await?;
    Ok(Json(gateways))
}

// Get one gateway by address
pub async fn get_gateway(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Gateway>, ApiError> {
    let gateways = fetch_gateways(&state, &state.query.default_query()).await?;
    take_gateway(&gateways, &address).map(Json)
}

// Compare two gateways side by side; both are looked up in a single listing
pub async fn compare_gateways(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Result<Json<ComparisonPair>, ApiError> {
    let first = params.first.filter(|address| !address.is_empty());
    let second = params.second.filter(|address| !address.is_empty());
    if first.is_none() && second.is_none() {
        return Ok(Json(ComparisonPair::build(None, None)));
    }

    let gateways = fetch_gateways(&state, &state.query.default_query()).await?;
    let first = first
        .map(|address| take_gateway(&gateways, &address))
        .transpose()?;
    let second = second
        .map(|address| take_gateway(&gateways, &address))
        .transpose()?;
    debug!(
        "Comparing {} with {}",
        first.as_ref().map_or("nothing", |gateway| gateway.display_name()),
        second.as_ref().map_or("nothing", |gateway| gateway.display_name())
    );

    Ok(Json(ComparisonPair::build(first.as_ref(), second.as_ref())))
}

pub fn create_gateway_router() -> Router<AppState> {
    Router::new()
        .route("/gateways", get(list_gateways))
        .route("/gateways/compare", get(compare_gateways))
        .route("/gateways/:address", get(get_gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwcompare_common::QueryDefaults;

    fn params(limit: Option<&str>, sort_by: Option<&str>, sort_order: Option<&str>) -> GatewayListParams {
        GatewayListParams {
            limit: limit.map(str::to_string),
            sort_by: sort_by.map(str::to_string),
            sort_order: sort_order.map(str::to_string),
            search: None,
        }
    }

    fn defaults() -> GatewayQuery {
        GatewayQuery::from_defaults(&QueryDefaults::default())
    }

    #[test]
    fn test_absent_params_keep_defaults() {
        let query = GatewayListParams::default().into_query(defaults()).unwrap();
        assert_eq!(query, defaults());
    }

    #[test]
    fn test_params_override_defaults() {
        let query = params(Some("25"), Some("delegateEAY"), Some("asc"))
            .into_query(defaults())
            .unwrap();
        assert_eq!(query.limit.get(), 25);
        assert_eq!(query.sort_by, SortBy::DelegateEay);
        assert_eq!(query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_sort_order_is_lenient() {
        let query = params(None, None, Some("sideways"))
            .into_query(defaults())
            .unwrap();
        assert_eq!(query.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_bad_limit_and_sort_key_are_rejected() {
        for bad in [params(Some("0"), None, None), params(Some("ten"), None, None)] {
            assert!(matches!(bad.into_query(defaults()), Err(ApiError::BadRequest(_))));
        }
        assert!(matches!(
            params(None, Some("height"), None).into_query(defaults()),
            Err(ApiError::BadRequest(_))
        ));
    }
}
