// ledger-gateway/src/lib.rs

//! External-collaborator boundary to the ledger.
//!
//! This crate defines:
//! - The [`LedgerApi`] trait covering the read queries and the blocking
//!   submit-and-wait call the settlement engine needs
//! - Retry-with-backoff machinery for the read queries
//! - Gateway configuration
//!
//! Connectivity, session management, signing and custody live behind the
//! trait; implementations adapt whatever transport the deployment uses.

pub mod client;
pub mod config;
pub mod retry;

pub use client::{AccountInfo, LedgerApi, ReserveParameters, TrustLineInfo};
pub use config::GatewayConfig;
pub use retry::{retry_with_backoff, BackoffConfig};

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur at the ledger boundary
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    InvalidResponse(String),

    #[error("Submission rejected before settlement: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Transient failures are safe to retry with backoff
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Network(_) | GatewayError::Timeout(_) | GatewayError::RateLimited(_)
        )
    }
}
