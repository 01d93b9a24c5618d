use anyhow::{Context, Result};
use tracing::info;

use gwcompare_api::run_api_server;
use gwcompare_common::ServiceConfig;

/// CLI arguments for the API server
#[cfg(feature = "cli")]
#[derive(clap::Parser, Debug)]
#[clap(author, version, about = "HTTP API for listing and comparing network gateways")]
struct Args {
    /// JSON configuration file
    #[clap(long)]
    config: Option<String>,

    /// Address to bind, e.g. 0.0.0.0:3001
    #[clap(long)]
    bind: Option<String>,
}

fn load_config(path: Option<String>) -> Result<ServiceConfig> {
    let mut config = match path.or_else(|| std::env::var("CONFIG_PATH").ok()) {
        Some(path) => ServiceConfig::from_file(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => ServiceConfig::default(),
    };

    if let Ok(port) = std::env::var("API_PORT") {
        let port = port
            .parse::<u16>()
            .with_context(|| format!("invalid API_PORT: {}", port))?;
        config.bind_address = format!("0.0.0.0:{}", port);
    }
    if let Ok(bind_addr) = std::env::var("BIND_ADDR") {
        config.bind_address = bind_addr;
    }
    if let Ok(url) = std::env::var("REGISTRY_URL") {
        config.registry.url = url;
    }
    if let Ok(service_name) = std::env::var("SERVICE_NAME") {
        config.service_name = service_name;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(feature = "cli")]
    let config = {
        use clap::Parser;

        dotenv::dotenv().ok();
        let args = Args::parse();
        let mut config = load_config(args.config)?;
        if let Some(bind) = args.bind {
            config.bind_address = bind;
        }
        config
    };
    #[cfg(not(feature = "cli"))]
    let config = load_config(None)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        )
        .init();

    info!("Loaded configuration for {}", config.service_name);
    run_api_server(config).await
}
