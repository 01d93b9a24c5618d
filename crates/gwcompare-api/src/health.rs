use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::types::{HealthCheckResult, HealthResponse, HealthStatus};

pub type HealthCheckFn = Arc<dyn Fn() -> bool + Send + Sync>;
pub type AsyncHealthCheckFn =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = HealthCheckResult> + Send>> + Send + Sync>;

/// Aggregates named health checks into one response.
///
/// Overall status is `healthy` when every check passes, `degraded` when at least one check is
/// healthy or degraded, `unhealthy` otherwise. No checks at all counts as healthy.
pub struct HealthService {
    checks: RwLock<HashMap<String, HealthCheckFn>>,
    async_checks: RwLock<HashMap<String, AsyncHealthCheckFn>>,
    start_time: Instant,
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            checks: RwLock::new(HashMap::new()),
            async_checks: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    pub async fn register(&self, name: &str, check: HealthCheckFn) {
        self.checks.write().await.insert(name.to_string(), check);
    }

    pub async fn register_async(&self, name: &str, check: AsyncHealthCheckFn) {
        self.async_checks.write().await.insert(name.to_string(), check);
    }

    pub async fn unregister(&self, name: &str) {
        self.checks.write().await.remove(name);
        self.async_checks.write().await.remove(name);
    }

    pub fn uptime(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub async fn check_all(&self) -> HealthResponse {
        // clone the checks out so none of them runs under the lock
        let checks: Vec<_> = self
            .checks
            .read()
            .await
            .iter()
            .map(|(name, check)| (name.clone(), check.clone()))
            .collect();
        let async_checks: Vec<_> = self
            .async_checks
            .read()
            .await
            .iter()
            .map(|(name, check)| (name.clone(), check.clone()))
            .collect();

        let mut results = HashMap::with_capacity(checks.len() + async_checks.len());
        for (name, check) in checks {
            let result = if check() {
                HealthCheckResult::healthy("Check passed")
            } else {
                HealthCheckResult::unhealthy("Check failed")
            };
            results.insert(name, result);
        }
        for (name, check) in async_checks {
            results.insert(name, check().await);
        }

        HealthResponse {
            status: overall_status(results.values().map(|result| result.status)),
            checks: results,
            uptime: self.uptime(),
        }
    }
}

fn overall_status(statuses: impl Iterator<Item = HealthStatus>) -> HealthStatus {
    let mut all_healthy = true;
    let mut any_alive = false;
    let mut any = false;
    for status in statuses {
        any = true;
        match status {
            HealthStatus::Healthy => any_alive = true,
            HealthStatus::Degraded => {
                all_healthy = false;
                any_alive = true;
            }
            HealthStatus::Unhealthy => all_healthy = false,
        }
    }

    if all_healthy || !any {
        HealthStatus::Healthy
    } else if any_alive {
        HealthStatus::Degraded
    } else {
        HealthStatus::Unhealthy
    }
}

/// A check that GETs `url` and reports how the endpoint answered.
///
/// 2xx is healthy, any other status degraded, no answer within `timeout_ms` unhealthy.
pub fn url_health_check(url: String, timeout_ms: u64, name: &str) -> AsyncHealthCheckFn {
    let name = name.to_string();
    let client = reqwest::Client::new();

    Arc::new(move || {
        let url = url.clone();
        let name = name.clone();
        let client = client.clone();
        let timeout = Duration::from_millis(timeout_ms);

        Box::pin(async move {
            tracing::debug!("Checking health of {} at {}", name, url);
            let timer = Instant::now();

            match tokio::time::timeout(timeout, client.get(&url).send()).await {
                Ok(Ok(response)) => {
                    let elapsed = timer.elapsed().as_millis() as u64;
                    let status = if response.status().is_success() {
                        HealthStatus::Healthy
                    } else {
                        HealthStatus::Degraded
                    };
                    let details = if status == HealthStatus::Healthy {
                        format!("{} is reachable", name)
                    } else {
                        format!("{} returned error status: {}", name, response.status())
                    };
                    HealthCheckResult {
                        status,
                        details: Some(details),
                        metrics: Some(HashMap::from([(
                            "response_time_ms".to_string(),
                            serde_json::Value::from(elapsed),
                        )])),
                    }
                }
                Ok(Err(e)) => {
                    HealthCheckResult::unhealthy(format!("Failed to connect to {}: {}", name, e))
                }
                Err(_) => HealthCheckResult::unhealthy(format!(
                    "{} health check timed out after {}ms",
                    name, timeout_ms
                )),
            }
        })
    })
}
