// ledger-gateway/src/client.rs

use crate::GatewayResult;
use async_trait::async_trait;
use ledger_core::{AccountId, LedgerSequence, LiquidityInstruction, PoolSnapshot, TransactionOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account-root state needed for reserve arithmetic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Native-asset balance in drops
    pub balance_drops: u64,
    /// Number of ledger objects the account owns
    pub owner_count: u32,
    /// Next sequence number for the account
    pub sequence: LedgerSequence,
}

/// One bilateral balance between an account and a counterparty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustLineInfo {
    /// Currency code of the line
    pub currency: String,
    /// Balance from the queried account's perspective
    pub balance: Decimal,
    /// Limit the queried account extends to the counterparty
    pub limit: Decimal,
}

/// Network reserve rule parameters, in drops
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReserveParameters {
    /// Base reserve every account must hold
    pub base_reserve_drops: u64,
    /// Additional reserve per owned ledger object
    pub owner_reserve_drops: u64,
}

impl ReserveParameters {
    /// Required reserve for an account owning `owner_count` objects
    pub fn required_drops(&self, owner_count: u32) -> u64 {
        self.base_reserve_drops + self.owner_reserve_drops * owner_count as u64
    }
}

/// The ledger operations the settlement engine consumes.
///
/// Read queries are side-effect free. `submit_and_wait` is the single
/// blocking step: it autofills sequence and fee, signs, submits, and waits
/// until the ledger validates the transaction or its expiry sequence
/// passes, returning the result code and the affected-entry diff.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Account root lookup: balance, owner count, sequence
    async fn account_info(&self, account: &AccountId) -> GatewayResult<AccountInfo>;

    /// Bilateral-balance lookup by account, counterparty and currency.
    /// A missing line is `Ok(None)`, not an error.
    async fn trust_line(
        &self,
        account: &AccountId,
        counterparty: &AccountId,
        currency: &str,
    ) -> GatewayResult<Option<TrustLineInfo>>;

    /// Live pool composition by pool account
    async fn pool_by_account(&self, pool_account: &AccountId) -> GatewayResult<PoolSnapshot>;

    /// Current reserve rule parameters
    async fn reserve_parameters(&self) -> GatewayResult<ReserveParameters>;

    /// Sequence number of the most recently validated ledger
    async fn current_ledger_sequence(&self) -> GatewayResult<LedgerSequence>;

    /// Autofill, sign, submit, and block until the transaction settles or
    /// expires. Never auto-retried by callers: a retry could double-submit.
    async fn submit_and_wait(
        &self,
        instruction: &LiquidityInstruction,
    ) -> GatewayResult<TransactionOutcome>;
}
