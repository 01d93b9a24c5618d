use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use gwcompare_common::{GatewayQueryService, ServiceConfig};

use crate::health::url_health_check;
use crate::registry::HttpRegistryClient;
use crate::rest::{ApiConfig, ApiServer};

/// Wire the registry client, query service and health checks for `config`
pub async fn build_api_server(config: &ServiceConfig) -> Result<ApiServer> {
    config.validate().context("invalid service configuration")?;

    let registry = HttpRegistryClient::new(&config.registry)
        .context("failed to create registry client")?;
    let registry_url = registry.gateways_url();
    let query = GatewayQueryService::new(Arc::new(registry), config.query.clone());

    let api_config = ApiConfig::from_service_config(config)?;
    let server = ApiServer::new(api_config, query);

    let health = server.health();
    health.register("api", Arc::new(|| true)).await;
    health
        .register_async(
            "registry",
            url_health_check(registry_url, config.registry.timeout_ms, "registry"),
        )
        .await;

    Ok(server)
}

/// Run a standalone API server until it fails
pub async fn run_api_server(config: ServiceConfig) -> Result<()> {
    info!(
        "Starting API server for {} v{} (registry {})",
        config.service_name,
        env!("CARGO_PKG_VERSION"),
        config.registry.url
    );

    let server = build_api_server(&config).await?;
    server.start().await
}
