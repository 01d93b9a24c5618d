//! gwcompare-api - HTTP API over the gateway registry
//!
//! Lists normalized gateways, looks single gateways up and builds side-by-side comparison
//! cards. Health, status and metrics endpoints sit next to the gateway routes.

pub mod gateway_endpoints;
pub mod health;
pub mod metrics;
pub mod registry;
pub mod rest;
pub mod server;
pub mod types;

pub use health::HealthService;
pub use metrics::MetricsService;
pub use registry::HttpRegistryClient;
pub use rest::{ApiConfig, ApiServer, AppState};
pub use server::{build_api_server, run_api_server};
pub use types::{ApiError, ApiResponse, HealthCheckResult, HealthResponse, HealthStatus, StatusResponse};
