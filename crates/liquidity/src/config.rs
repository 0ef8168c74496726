// liquidity/src/config.rs

use crate::accounting::DEFAULT_NATIVE_DUST_DROPS;
use ledger_gateway::BackoffConfig;
use serde::{Deserialize, Serialize};

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many ledger sequences ahead of current to set the instruction's
    /// expiry, bounding the worst-case submit-and-wait
    pub expiry_window: u32,
    /// Minimum native movement, in drops, reported as an asset delta
    pub dust_threshold_drops: u64,
    /// Backoff policy for the engine's read queries
    pub backoff: BackoffConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expiry_window: 20,
            dust_threshold_drops: DEFAULT_NATIVE_DUST_DROPS,
            backoff: BackoffConfig::default(),
        }
    }
}

impl EngineConfig {
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
