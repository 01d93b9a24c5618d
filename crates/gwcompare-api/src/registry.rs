use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use gwcompare_common::{
    Error, GatewayRegistry, ListGatewaysParams, RawGateway, RegistryConfig, Result,
};

/// HTTP client for the gateway registry's listing endpoint
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    /// Base URL, without trailing slash
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Listing bodies come either bare or wrapped in a page
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Bare(Vec<Value>),
    Page { items: Vec<Value> },
}

impl HttpRegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| Error::Config(format!("failed to build registry client: {}", e)))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn gateways_url(&self) -> String {
        format!("{}/gateways", self.base_url)
    }

    async fn fetch_listing(&self, params: &ListGatewaysParams) -> Result<ListingBody> {
        let response = self
            .client
            .get(self.gateways_url())
            .query(params)
            .send()
            .await
            .map_err(|e| Error::FetchFailed(format!("registry request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchFailed(format!(
                "registry answered with status {}",
                status
            )));
        }

        response
            .json::<ListingBody>()
            .await
            .map_err(|e| Error::FetchFailed(format!("undecodable registry response: {}", e)))
    }
}

#[async_trait]
impl GatewayRegistry for HttpRegistryClient {
    async fn list_gateways(
        &self,
        params: &ListGatewaysParams,
    ) -> Result<Vec<Result<RawGateway>>> {
        let items = match self.fetch_listing(params).await? {
            ListingBody::Bare(items) => items,
            ListingBody::Page { items } => items,
        };
        tracing::debug!("Registry returned {} gateway records", items.len());

        // one entry per item so undecodable records still reach the batch report
        Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<RawGateway>(item).map_err(|e| {
                    Error::MalformedRecord(format!(
                        "undecodable record at position {}: {}",
                        index, e
                    ))
                })
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
