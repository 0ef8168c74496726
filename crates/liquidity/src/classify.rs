// liquidity/src/classify.rs

//! Failure classification.
//!
//! A pure mapping from protocol result codes and transport failures into a
//! typed taxonomy with retry eligibility. Retrying a validation or
//! insufficient-funds failure without changing inputs cannot succeed, so
//! only infrastructure-level kinds are retryable.

use ledger_core::InstructionType;
use ledger_gateway::GatewayError;
use serde::{Deserialize, Serialize};

/// Failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Network,
    Timeout,
    RateLimit,
    InsufficientFunds,
    Validation,
    /// Pool-specific business rule violation
    Amm,
    /// Generic non-success result code
    Transaction,
    Pathfinding,
    Unknown,
}

impl FailureKind {
    /// Whether retrying with unchanged inputs can possibly succeed
    pub fn retryable(self) -> bool {
        matches!(
            self,
            FailureKind::Network
                | FailureKind::Timeout
                | FailureKind::RateLimit
                | FailureKind::Pathfinding
                | FailureKind::Unknown
        )
    }
}

/// A classified failure, ready to surface to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedFailure {
    pub kind: FailureKind,
    pub message: String,
    pub retryable: bool,
}

impl ClassifiedFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: kind.retryable(),
        }
    }
}

impl std::fmt::Display for ClassifiedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Classify a transport-level failure
pub fn classify_gateway_error(error: &GatewayError) -> ClassifiedFailure {
    let kind = match error {
        GatewayError::Network(_) => FailureKind::Network,
        GatewayError::Timeout(_) => FailureKind::Timeout,
        GatewayError::RateLimited(_) => FailureKind::RateLimit,
        GatewayError::NotFound(_) => FailureKind::Validation,
        GatewayError::InvalidResponse(_) => FailureKind::Unknown,
        GatewayError::Rejected(_) => FailureKind::Transaction,
    };
    ClassifiedFailure::new(kind, error.to_string())
}

/// Classify a non-success protocol result code
pub fn classify_result_code(instruction_type: InstructionType, code: &str) -> ClassifiedFailure {
    let message = refined_message(instruction_type, code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{instruction_type} failed with code: {code}"));
    ClassifiedFailure::new(result_code_kind(code), message)
}

/// Category of a result code from the protocol's fixed vocabulary
fn result_code_kind(code: &str) -> FailureKind {
    if code.starts_with("tecAMM_") {
        FailureKind::Amm
    } else if code.starts_with("tecPATH_") {
        FailureKind::Pathfinding
    } else if code.contains("UNFUNDED") || code.starts_with("tecINSUF") {
        FailureKind::InsufficientFunds
    } else if code.starts_with("tem") {
        FailureKind::Validation
    } else if code.starts_with("tec") || code.starts_with("ter") || code.starts_with("tel") {
        FailureKind::Transaction
    } else {
        FailureKind::Unknown
    }
}

/// Human-readable refinements for known `(instruction type, result code)`
/// pairs; unmatched pairs fall back to the generic message
fn refined_message(instruction_type: InstructionType, code: &str) -> Option<&'static str> {
    use InstructionType::*;
    Some(match (instruction_type, code) {
        (LiquidityDeposit, "tecUNFUNDED_AMM") => {
            "Deposit failed: the funding account cannot cover the requested contribution"
        }
        (LiquidityDeposit, "tecAMM_FAILED") => {
            "Deposit failed: the pool rejected the deposit terms"
        }
        (LiquidityDeposit, "tecAMM_INVALID_TOKENS") => {
            "Deposit failed: the requested share-token amount cannot be issued at the current pool composition"
        }
        (LiquidityDeposit, "tecFROZEN") => {
            "Deposit failed: one of the pool assets is frozen for this account"
        }
        (LiquidityWithdraw, "tecAMM_BALANCE") => {
            "Withdraw failed: the requested amount exceeds the pool's available balance"
        }
        (LiquidityWithdraw, "tecAMM_FAILED") => {
            "Withdraw failed: the pool rejected the withdrawal terms"
        }
        (LiquidityWithdraw, "tecAMM_INVALID_TOKENS") => {
            "Withdraw failed: the share-token amount is invalid or exceeds the held balance"
        }
        (LiquidityWithdraw, "tecFROZEN") => {
            "Withdraw failed: one of the pool assets is frozen for this account"
        }
        (_, "terNO_AMM") => "The addressed pool does not exist",
        (_, "terNO_ACCOUNT") => "The initiating account does not exist on the ledger",
        _ => return None,
    })
}
