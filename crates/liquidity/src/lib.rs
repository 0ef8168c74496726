// liquidity/src/lib.rs

//! Liquidity Settlement Engine
//!
//! This crate implements the settlement pipeline for AMM liquidity
//! operations:
//! - Pre-flight affordability checks against reserve rules
//! - Instruction construction for the deposit/withdraw modes
//! - Ledger-diff accounting: reconstructing actual asset and share-token
//!   movement from the affected-entry changes returned after settlement
//! - Result-code and transport-failure classification

pub mod accounting;
pub mod builder;
pub mod classify;
pub mod config;
pub mod engine;
pub mod report;
pub mod reserve;

pub use accounting::{extract_settlement, SettlementDelta};
pub use builder::{build_instruction, LiquidityOperation, OperationDirection};
pub use classify::{classify_gateway_error, classify_result_code, ClassifiedFailure, FailureKind};
pub use config::EngineConfig;
pub use engine::SettlementEngine;
pub use report::{OperationOutcome, ReconciliationReport, SettlementReceipt};
pub use reserve::BalanceValidator;

use ledger_core::CoreError;
use ledger_gateway::GatewayError;

/// Result type for liquidity operations
pub type LiquidityResult<T> = Result<T, LiquidityError>;

/// Errors that can occur in liquidity operations
#[derive(Debug, thiserror::Error)]
pub enum LiquidityError {
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{mode} is not a valid {direction} mode")]
    UnsupportedMode {
        mode: &'static str,
        direction: builder::OperationDirection,
    },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: String, available: String },

    #[error("Could not extract the share-token movement from the settlement diff")]
    ShareTokenExtractionFailed,

    #[error("Could not extract any asset movement from the settlement diff")]
    AssetExtractionFailed,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Core data error: {0}")]
    Core(#[from] CoreError),
}
