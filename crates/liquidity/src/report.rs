// liquidity/src/report.rs

//! Operation outcomes and the human-readable settlement summary.

use crate::builder::OperationDirection;
use crate::classify::ClassifiedFailure;
use ledger_core::{AssetAmount, PoolSnapshot, TxHash};
use serde::{Deserialize, Serialize};

/// Final outcome of one liquidity operation.
///
/// `NeedsReconciliation` is deliberately distinct from both success and
/// failure: the on-ledger transaction settled and funds moved, but the
/// amounts could not be reconstructed from the diff. Treating it as a
/// failure would misreport moved funds; treating it as a success would
/// fabricate amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OperationOutcome {
    /// Transaction settled and the exchanged amounts were reconstructed
    Settled(SettlementReceipt),
    /// Transaction settled but extraction failed; manual reconciliation
    /// against the ledger is required
    NeedsReconciliation(ReconciliationReport),
    /// Transaction did not settle
    Failed(ClassifiedFailure),
}

impl OperationOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, OperationOutcome::Settled(_))
    }
}

/// What one settled liquidity operation actually exchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// Hash of the settled transaction
    pub tx_hash: TxHash,
    /// Reported operation direction
    pub direction: OperationDirection,
    /// Share tokens received (deposit) or surrendered (withdraw)
    pub share_token_delta: AssetAmount,
    /// Underlying assets moved, sorted by currency code
    pub asset_deltas: Vec<AssetAmount>,
    /// Network fee paid, in drops
    pub fee_drops: u64,
    /// Pool composition re-read after settlement, when available
    pub pool_after: Option<PoolSnapshot>,
}

impl SettlementReceipt {
    /// Multi-line display summary of the settlement
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("{} settled: {}", self.direction, self.tx_hash));

        let share_verb = match self.direction {
            OperationDirection::Deposit => "received",
            OperationDirection::Withdraw => "surrendered",
        };
        lines.push(format!(
            "share tokens {share_verb}: {}",
            self.share_token_delta
        ));

        let asset_verb = match self.direction {
            OperationDirection::Deposit => "deposited",
            OperationDirection::Withdraw => "withdrawn",
        };
        lines.push(format!("assets {asset_verb}:"));
        for delta in &self.asset_deltas {
            lines.push(format!("  {delta}"));
        }

        lines.push(format!("fee paid: {} drops", self.fee_drops));

        if let Some(pool) = &self.pool_after {
            lines.push(format!(
                "pool now holds {} / {} (trading fee {} bp)",
                pool.asset1, pool.asset2, pool.trading_fee_bp
            ));
        }

        lines.join("\n")
    }
}

/// Record of a settled transaction whose amounts could not be extracted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Hash of the settled transaction
    pub tx_hash: TxHash,
    /// The protocol's (successful) result code
    pub result_code: String,
    /// Reported operation direction
    pub direction: OperationDirection,
    /// Why extraction failed
    pub reason: String,
    /// Network fee paid, in drops
    pub fee_drops: u64,
}
