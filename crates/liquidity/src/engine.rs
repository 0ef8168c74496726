// liquidity/src/engine.rs

//! The settlement pipeline.
//!
//! One sequential pipeline per call: snapshot the pool, check
//! affordability, build the instruction, submit and wait, reconstruct the
//! settlement from the diff, re-read the pool. The pool snapshot read
//! up front may be stale by the time the transaction settles; correctness
//! is recovered afterwards from the diff, not enforced beforehand, so no
//! locking is involved anywhere.

use crate::accounting::extract_settlement;
use crate::builder::{build_instruction, LiquidityOperation, OperationDirection};
use crate::classify::{classify_gateway_error, classify_result_code, ClassifiedFailure, FailureKind};
use crate::config::EngineConfig;
use crate::report::{OperationOutcome, ReconciliationReport, SettlementReceipt};
use crate::reserve::BalanceValidator;
use crate::LiquidityError;
use ledger_core::{AccountId, AssetAmount, PoolSnapshot};
use ledger_gateway::{retry_with_backoff, LedgerApi};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Executes liquidity operations end to end.
///
/// Stateless aside from the read-only ledger client; calls are independent
/// and may run concurrently.
pub struct SettlementEngine<C: LedgerApi> {
    client: Arc<C>,
    config: EngineConfig,
}

impl<C: LedgerApi> SettlementEngine<C> {
    pub fn new(client: Arc<C>, config: EngineConfig) -> Self {
        Self { client, config }
    }

    /// Run one liquidity operation to completion.
    ///
    /// Every failure path is classified; the only non-failure non-success
    /// outcome is `NeedsReconciliation`, returned when the transaction
    /// settled but the diff yielded no extractable amounts.
    pub async fn execute(
        &self,
        account: &AccountId,
        pool_account: &AccountId,
        direction: OperationDirection,
        operation: &LiquidityOperation,
    ) -> OperationOutcome {
        tracing::info!(%account, %pool_account, %direction, mode = operation.mode_name(), "starting liquidity operation");

        let pool = match self.fetch_pool(pool_account).await {
            Ok(pool) => pool,
            Err(err) => return OperationOutcome::Failed(classify_gateway_error(&err)),
        };

        if let Some(outcome) = self
            .check_affordability(account, &pool, direction, operation)
            .await
        {
            return outcome;
        }

        let expiry = match retry_with_backoff(&self.config.backoff, "current_ledger_sequence", || {
            self.client.current_ledger_sequence()
        })
        .await
        {
            Ok(sequence) => Some(sequence + self.config.expiry_window),
            Err(err) => return OperationOutcome::Failed(classify_gateway_error(&err)),
        };

        let instruction = match build_instruction(direction, operation, &pool, account, expiry) {
            Ok(instruction) => instruction,
            Err(err) => return OperationOutcome::Failed(classify_local(&err)),
        };
        tracing::debug!(flags = instruction.flags, "instruction built");

        // The single blocking step. Never auto-retried: a second submit of
        // the same economic intent could settle twice.
        let outcome = match self.client.submit_and_wait(&instruction).await {
            Ok(outcome) => outcome,
            Err(err) => return OperationOutcome::Failed(classify_gateway_error(&err)),
        };
        tracing::info!(tx_hash = %outcome.tx_hash, code = %outcome.result_code, "transaction finalized");

        if !outcome.succeeded() {
            return OperationOutcome::Failed(classify_result_code(
                instruction.instruction_type,
                &outcome.result_code,
            ));
        }

        let settlement = extract_settlement(
            &outcome.affected_entries,
            account,
            pool_account,
            direction,
            outcome.fee_drops,
            self.config.dust_threshold_drops,
        )
        .and_then(|settlement| {
            // Every mode guarantees asset movement; an empty delta list
            // means the evidence could not be found, not that nothing moved.
            if settlement.asset_deltas.is_empty() {
                Err(LiquidityError::AssetExtractionFailed)
            } else {
                Ok(settlement)
            }
        });

        let settlement = match settlement {
            Ok(settlement) => settlement,
            Err(err) => {
                tracing::warn!(tx_hash = %outcome.tx_hash, error = %err, "settled transaction needs manual reconciliation");
                return OperationOutcome::NeedsReconciliation(ReconciliationReport {
                    tx_hash: outcome.tx_hash,
                    result_code: outcome.result_code,
                    direction,
                    reason: err.to_string(),
                    fee_drops: outcome.fee_drops,
                });
            }
        };

        // Reporting only; a refresh failure never fails the operation
        let pool_after = match self.fetch_pool(pool_account).await {
            Ok(pool) => Some(pool),
            Err(err) => {
                tracing::warn!(error = %err, "pool refresh after settlement failed");
                None
            }
        };

        OperationOutcome::Settled(SettlementReceipt {
            tx_hash: outcome.tx_hash,
            direction,
            share_token_delta: settlement.share_token_delta,
            asset_deltas: settlement.asset_deltas,
            fee_drops: outcome.fee_drops,
            pool_after,
        })
    }

    async fn fetch_pool(
        &self,
        pool_account: &AccountId,
    ) -> Result<PoolSnapshot, ledger_gateway::GatewayError> {
        retry_with_backoff(&self.config.backoff, "pool_by_account", || {
            self.client.pool_by_account(pool_account)
        })
        .await
    }

    /// Pre-flight affordability. Deposits check each explicitly requested
    /// asset amount; share-token-in withdrawals check the share-token
    /// position; withdraw-all modes have nothing to pre-check.
    async fn check_affordability(
        &self,
        account: &AccountId,
        pool: &PoolSnapshot,
        direction: OperationDirection,
        operation: &LiquidityOperation,
    ) -> Option<OperationOutcome> {
        let validator = BalanceValidator::new(self.client.as_ref(), &self.config.backoff);

        let mut required: Vec<AssetAmount> = Vec::new();
        match (direction, operation) {
            (OperationDirection::Deposit, LiquidityOperation::TwoAsset { amount_a, amount_b }) => {
                required.push(amount_a.clone());
                required.push(amount_b.clone());
            }
            (OperationDirection::Deposit, LiquidityOperation::SingleAsset { amount })
            | (
                OperationDirection::Deposit,
                LiquidityOperation::SingleAssetForShareToken { amount, .. },
            ) => {
                required.push(amount.clone());
            }
            (
                OperationDirection::Withdraw,
                LiquidityOperation::TwoAssetForShareToken { share_tokens },
            )
            | (
                OperationDirection::Withdraw,
                LiquidityOperation::SingleAssetWithShareTokenIn { share_tokens, .. },
            ) => {
                required.push(AssetAmount::issued(
                    pool.share_token.currency.clone(),
                    pool.account.clone(),
                    *share_tokens,
                ));
            }
            _ => {}
        }

        for amount in &required {
            if amount.value <= Decimal::ZERO {
                // The builder reports non-positive amounts with a precise
                // message; skip the ledger round trip here.
                continue;
            }
            match validator.sufficient_balance(account, amount).await {
                Ok(true) => {}
                Ok(false) => {
                    return Some(OperationOutcome::Failed(ClassifiedFailure::new(
                        FailureKind::InsufficientFunds,
                        format!("insufficient balance to cover {amount}"),
                    )));
                }
                Err(LiquidityError::Gateway(err)) => {
                    return Some(OperationOutcome::Failed(classify_gateway_error(&err)));
                }
                Err(err) => {
                    return Some(OperationOutcome::Failed(classify_local(&err)));
                }
            }
        }

        None
    }
}

/// Classify an engine-local error (builder validation, data shape)
fn classify_local(error: &LiquidityError) -> ClassifiedFailure {
    let kind = match error {
        LiquidityError::InsufficientBalance { .. } => FailureKind::InsufficientFunds,
        LiquidityError::Gateway(_) => FailureKind::Network,
        _ => FailureKind::Validation,
    };
    ClassifiedFailure::new(kind, error.to_string())
}
