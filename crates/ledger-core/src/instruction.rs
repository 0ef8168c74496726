// ledger-core/src/instruction.rs

//! The liquidity instruction wire shape and its mode flags.
//!
//! Each of the nine deposit/withdraw modes is selected by exactly one set
//! bit in the instruction's 32-bit flag field. Deposit and withdraw carry
//! separate flag namespaces; bits are mutually exclusive within one
//! instruction type and are never combined.

use crate::amount::{AssetAmount, ProtocolAmount};
use crate::types::{AccountId, LedgerSequence};
use serde::{Deserialize, Serialize};

/// Mode flags valid on a deposit instruction
pub mod deposit_flags {
    /// Deposit both assets in explicit amounts
    pub const TWO_ASSET: u32 = 0x0010_0000;
    /// Deposit both assets to obtain an exact share-token amount
    pub const SHARE_TOKEN_OUT: u32 = 0x0001_0000;
    /// Deposit a single asset in an explicit amount
    pub const SINGLE_ASSET: u32 = 0x0008_0000;
    /// Deposit a single asset to obtain an exact share-token amount
    pub const SINGLE_ASSET_FOR_SHARE_TOKEN: u32 = 0x0020_0000;
}

/// Mode flags valid on a withdraw instruction
pub mod withdraw_flags {
    /// Withdraw both assets in explicit amounts
    pub const TWO_ASSET: u32 = 0x0010_0000;
    /// Surrender an exact share-token amount for both assets
    pub const SHARE_TOKEN_IN: u32 = 0x0001_0000;
    /// Withdraw a single asset in an explicit amount
    pub const SINGLE_ASSET: u32 = 0x0008_0000;
    /// Surrender the entire share-token position
    pub const WITHDRAW_ALL: u32 = 0x0002_0000;
    /// Surrender the entire position, paid out in one asset
    pub const WITHDRAW_ALL_SINGLE_ASSET: u32 = 0x0004_0000;
    /// Surrender an exact share-token amount, paid out in one asset
    pub const SINGLE_ASSET_WITH_SHARE_TOKEN_IN: u32 = 0x0020_0000;
}

/// Instruction type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionType {
    LiquidityDeposit,
    LiquidityWithdraw,
}

impl std::fmt::Display for InstructionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstructionType::LiquidityDeposit => write!(f, "LiquidityDeposit"),
            InstructionType::LiquidityWithdraw => write!(f, "LiquidityWithdraw"),
        }
    }
}

/// Reference to one of the pool's assets: currency and issuer, no value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<AccountId>,
}

impl From<&AssetAmount> for AssetRef {
    fn from(amount: &AssetAmount) -> Self {
        Self {
            currency: amount.currency.clone(),
            issuer: amount.issuer.clone(),
        }
    }
}

/// A fully-built liquidity instruction, ready for autofill/sign/submit.
///
/// `Account`, `Asset` and `Asset2` are always present; `Asset`/`Asset2`
/// always carry the pool's two underlying assets in the pool's canonical
/// order. The remaining fields are populated per mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityInstruction {
    #[serde(rename = "TransactionType")]
    pub instruction_type: InstructionType,
    #[serde(rename = "Account")]
    pub account: AccountId,
    #[serde(rename = "Asset")]
    pub asset: AssetRef,
    #[serde(rename = "Asset2")]
    pub asset2: AssetRef,
    #[serde(rename = "Amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<ProtocolAmount>,
    #[serde(rename = "Amount2", skip_serializing_if = "Option::is_none")]
    pub amount2: Option<ProtocolAmount>,
    #[serde(rename = "ShareTokenOut", skip_serializing_if = "Option::is_none")]
    pub share_token_out: Option<ProtocolAmount>,
    #[serde(rename = "ShareTokenIn", skip_serializing_if = "Option::is_none")]
    pub share_token_in: Option<ProtocolAmount>,
    #[serde(rename = "Flags")]
    pub flags: u32,
    /// Expiry bound: the instruction fails once the ledger passes this
    /// sequence, capping the worst-case wait for finalization
    #[serde(rename = "LastLedgerSequence", skip_serializing_if = "Option::is_none")]
    pub last_ledger_sequence: Option<LedgerSequence>,
}

impl LiquidityInstruction {
    /// True when exactly one mode flag bit is set
    pub fn has_single_mode_flag(&self) -> bool {
        self.flags.count_ones() == 1
    }
}
