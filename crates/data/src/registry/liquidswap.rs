//! HTTP client for the Liquidswap pool registry.

use super::{LiquidityRegistry, PoolRecord, RegistryError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::value::RawValue;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default public registry endpoint.
pub const DEFAULT_REGISTRY_URL: &str = "https://api.liquidswap.com";

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL, without the `/pools/registered` path.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Registry client backed by `GET <base>/pools/registered`.
#[derive(Debug, Clone)]
pub struct LiquidswapRegistry {
    client: Client,
    base_url: String,
}

impl LiquidswapRegistry {
    /// Creates a client with its own connection pool.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.base_url))
    }

    /// Creates a client sharing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn pools_url(&self) -> String {
        format!("{}/pools/registered", self.base_url)
    }
}

#[async_trait]
impl LiquidityRegistry for LiquidswapRegistry {
    async fn registered_pools(&self) -> Result<Vec<PoolRecord>, RegistryError> {
        let url = self.pools_url();
        debug!(url = %url, "Fetching registered pools");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let raw: Vec<Box<RawValue>> =
            serde_json::from_slice(&body).map_err(|e| RegistryError::Decode(e.to_string()))?;

        let pools: Vec<PoolRecord> = raw
            .iter()
            .filter_map(|record| match serde_json::from_str(record.get()) {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!(error = %e, record = %record.get(), "Skipping malformed pool record");
                    None
                }
            })
            .collect();

        info!(
            count = pools.len(),
            skipped = raw.len() - pools.len(),
            "Fetched registered pools"
        );
        Ok(pools)
    }
}
