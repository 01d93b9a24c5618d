use axum::{
    extract::State,
    http::{header, Method},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use gwcompare_common::{GatewayQueryService, ServiceConfig};

use crate::gateway_endpoints::create_gateway_router;
use crate::health::HealthService;
use crate::metrics::MetricsService;
use crate::types::{ApiResponse, HealthResponse, StatusResponse};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Gateway listing and lookup
    pub query: Arc<GatewayQueryService>,
    /// Health check service
    pub health: Arc<HealthService>,
    /// Metrics service
    pub metrics: Arc<MetricsService>,
    /// Application start time
    pub start_time: Instant,
    /// Service name
    pub service_name: String,
    /// Service version
    pub version: String,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Service name
    pub service_name: String,
    /// Service version
    pub version: String,
    /// Expose the metrics endpoint
    pub enable_metrics: bool,
    /// API path prefix (optional)
    pub path_prefix: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            service_name: "gwcompare-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enable_metrics: true,
            path_prefix: Some("/api".to_string()),
        }
    }
}

impl ApiConfig {
    pub fn from_service_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        let bind_addr = config
            .bind_address
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("invalid bind address {}: {}", config.bind_address, e))?;

        Ok(Self {
            bind_addr,
            service_name: config.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enable_metrics: config.enable_metrics,
            path_prefix: config.path_prefix.clone(),
        })
    }
}

/// API server
pub struct ApiServer {
    /// Server configuration
    config: ApiConfig,
    /// Application state
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiConfig, query: GatewayQueryService) -> Self {
        let state = AppState {
            query: Arc::new(query),
            health: Arc::new(HealthService::new()),
            metrics: Arc::new(MetricsService::new()),
            start_time: Instant::now(),
            service_name: config.service_name.clone(),
            version: config.version.clone(),
        };

        Self { config, state }
    }

    /// Get a reference to the health service
    pub fn health(&self) -> Arc<HealthService> {
        self.state.health.clone()
    }

    /// Get a reference to the metrics service
    pub fn metrics(&self) -> Arc<MetricsService> {
        self.state.metrics.clone()
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Start the API server
    pub async fn start(&self) -> anyhow::Result<()> {
        tracing::info!(
            "Starting {} API server on {}",
            self.config.service_name,
            self.config.bind_addr
        );

        let router = self.router();

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Build the API router
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_origin(Any);

        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/status", get(status_handler))
            .merge(create_gateway_router());

        if self.config.enable_metrics {
            router = router.route("/metrics", get(metrics_handler));
        }

        // a bare "/" prefix means no nesting
        if let Some(prefix) = self
            .config
            .path_prefix
            .as_deref()
            .map(|prefix| prefix.trim_end_matches('/'))
            .filter(|prefix| !prefix.is_empty())
        {
            router = Router::new().nest(prefix, router);
        }

        router
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> axum::Json<HealthResponse> {
    axum::Json(state.health.check_all().await)
}

/// Status handler
async fn status_handler(State(state): State<AppState>) -> axum::Json<ApiResponse<StatusResponse>> {
    let defaults = state.query.defaults();
    let status = StatusResponse {
        name: state.service_name.clone(),
        version: state.version.clone(),
        uptime: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        additional: HashMap::from([
            (
                "registry".to_string(),
                serde_json::Value::from(state.query.registry_name()),
            ),
            (
                "defaultQuery".to_string(),
                serde_json::json!({
                    "limit": defaults.limit.get(),
                    "sortBy": defaults.sort_by,
                    "sortOrder": defaults.sort_order,
                }),
            ),
        ]),
    };

    axum::Json(ApiResponse::success(status))
}

/// Metrics handler
async fn metrics_handler(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(state.metrics.get_metrics().await)
}
