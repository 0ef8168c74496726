// ledger-core/src/outcome.rs

use crate::entry::AffectedEntry;
use crate::types::{LedgerSequence, TxHash};
use serde::{Deserialize, Serialize};

/// Result code of a transaction that settled successfully
pub const SUCCESS_CODE: &str = "tesSUCCESS";

/// What submit-and-wait returns once a transaction settles or finalizes.
///
/// `result_code` reports the protocol's verdict; `affected_entries` is the
/// before/after diff over ledger entries, the sole source of truth for
/// what was actually exchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOutcome {
    /// Protocol result code, e.g. `tesSUCCESS`
    pub result_code: String,
    /// Hash of the settled transaction
    pub tx_hash: TxHash,
    /// Network fee actually charged, in drops
    pub fee_drops: u64,
    /// Ledger sequence the transaction settled in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_sequence: Option<LedgerSequence>,
    /// Before/after changes over affected ledger entries
    pub affected_entries: Vec<AffectedEntry>,
}

impl TransactionOutcome {
    /// Did the transaction settle successfully
    pub fn succeeded(&self) -> bool {
        self.result_code == SUCCESS_CODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_detection() {
        let outcome = TransactionOutcome {
            result_code: SUCCESS_CODE.into(),
            tx_hash: TxHash::new("ABC123"),
            fee_drops: 12,
            ledger_sequence: Some(100),
            affected_entries: vec![],
        };
        assert!(outcome.succeeded());

        let failed = TransactionOutcome {
            result_code: "tecAMM_FAILED".into(),
            ..outcome
        };
        assert!(!failed.succeeded());
    }
}
