// ledger-gateway/src/config.rs

use crate::retry::BackoffConfig;
use serde::{Deserialize, Serialize};

/// Gateway connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Ledger API endpoint
    pub endpoint: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Backoff policy for transient read-query failures
    pub backoff: BackoffConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "wss://localhost:6006".into(),
            request_timeout_ms: 10_000,
            backoff: BackoffConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
