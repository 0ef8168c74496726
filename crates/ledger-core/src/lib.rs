// ledger-core/src/lib.rs

//! Core data model for the liquidity settlement engine
//!
//! This crate provides:
//! - Asset amounts and their two protocol representations
//! - Account and transaction identifiers
//! - Ledger-entry change records (the settlement diff)
//! - AMM pool snapshots
//! - The liquidity instruction wire shape and its mode flags

pub mod amount;
pub mod entry;
pub mod instruction;
pub mod outcome;
pub mod pool;
pub mod types;

pub use amount::{AssetAmount, ProtocolAmount, DROPS_PER_NATIVE_UNIT, NATIVE_CURRENCY};
pub use entry::{AffectedEntry, EntryData, EntryFields, EntryKind, LimitField};
pub use instruction::{deposit_flags, withdraw_flags, AssetRef, InstructionType, LiquidityInstruction};
pub use outcome::{TransactionOutcome, SUCCESS_CODE};
pub use pool::{AuctionSlot, PoolSnapshot, VoteSlot};
pub use types::{AccountId, BasisPoints, LedgerSequence, TxHash};

/// Result type for core data operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while handling core ledger data
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid drop count: {0}")]
    InvalidDrops(String),

    #[error("Missing issuer for issued currency: {0}")]
    MissingIssuer(String),
}
