// liquidity/src/accounting.rs

//! Ledger-diff accounting.
//!
//! The protocol reports only *requested* amounts in the instruction; the
//! amounts actually exchanged surface solely as before/after changes over
//! ledger entries. This module reconstructs the share-token quantity
//! received or surrendered and the underlying asset amounts actually moved
//! from that diff.
//!
//! Malformed or unrelated individual entries are skipped, never fatal: one
//! stray fee-only account-root touch must not abort reconstruction of an
//! otherwise valid result. The only failures are the two "no matching
//! evidence at all" cases, which callers must keep distinct from a zero
//! result.

use crate::builder::OperationDirection;
use crate::{LiquidityError, LiquidityResult};
use ledger_core::amount::{drops_to_units, is_share_token_code};
use ledger_core::{AccountId, AffectedEntry, AssetAmount, EntryKind};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Default minimum native movement, in drops, below which an account-root
/// delta is treated as fee-rounding noise rather than an asset movement
pub const DEFAULT_NATIVE_DUST_DROPS: u64 = 10;

/// What a settled liquidity transaction actually exchanged
#[derive(Debug, Clone)]
pub struct SettlementDelta {
    /// Share tokens received (deposit) or surrendered (withdraw)
    pub share_token_delta: AssetAmount,
    /// Underlying assets moved, sorted by currency code. May be empty;
    /// callers must treat empty as an error for modes that guarantee
    /// asset movement.
    pub asset_deltas: Vec<AssetAmount>,
}

/// Reconstruct the settlement from the affected-entry diff.
///
/// `fee_drops` is the network fee charged to the initiating account; it is
/// deducted from the account root regardless of the operation and must be
/// subtracted before the remaining native movement is interpreted.
pub fn extract_settlement(
    entries: &[AffectedEntry],
    initiating: &AccountId,
    pool_account: &AccountId,
    direction: OperationDirection,
    fee_drops: u64,
    native_dust_drops: u64,
) -> LiquidityResult<SettlementDelta> {
    let share_token_delta = extract_share_token_delta(entries, initiating, pool_account, direction)
        .ok_or(LiquidityError::ShareTokenExtractionFailed)?;

    let asset_deltas = extract_asset_deltas(entries, initiating, direction, fee_drops, native_dust_drops);

    Ok(SettlementDelta {
        share_token_delta,
        asset_deltas,
    })
}

/// Share tokens received or surrendered by the initiating account.
///
/// Scans modified bilateral balances first; a first-time deposit creates
/// the share-token line instead, so created entries are the fallback, with
/// an implicit previous balance of zero. There is at most one share-token
/// bilateral record per pool per account, so the first unambiguous match
/// wins.
pub fn extract_share_token_delta(
    entries: &[AffectedEntry],
    initiating: &AccountId,
    pool_account: &AccountId,
    direction: OperationDirection,
) -> Option<AssetAmount> {
    for entry in entries {
        let AffectedEntry::Modified(data) = entry else {
            continue;
        };
        let Some(delta) = share_token_candidate(data, initiating, pool_account, |d| {
            d.delta_from_perspective_of(initiating)
        }) else {
            continue;
        };
        if let Some(amount) = directed_magnitude(delta, direction) {
            let code = data.balance_currency().unwrap_or_default().to_string();
            return Some(AssetAmount::issued(code, pool_account.clone(), amount));
        }
    }

    for entry in entries {
        let AffectedEntry::Created(data) = entry else {
            continue;
        };
        let Some(balance) = share_token_candidate(data, initiating, pool_account, |d| {
            d.new_balance_from_perspective_of(initiating)
        }) else {
            continue;
        };
        if let Some(amount) = directed_magnitude(balance, direction) {
            let code = data.balance_currency().unwrap_or_default().to_string();
            return Some(AssetAmount::issued(code, pool_account.clone(), amount));
        }
    }

    None
}

/// Underlying assets the initiating account actually paid in or received.
///
/// Bilateral entries yield issued-asset deltas with the counterpart side
/// as issuer, de-duplicated per `(currency, issuer)` pair; share-token
/// codes are excluded so the pool-share movement is never double-reported.
/// Account-root entries yield the native delta after fee subtraction and
/// dust filtering.
pub fn extract_asset_deltas(
    entries: &[AffectedEntry],
    initiating: &AccountId,
    direction: OperationDirection,
    fee_drops: u64,
    native_dust_drops: u64,
) -> Vec<AssetAmount> {
    let mut seen: HashSet<(String, AccountId)> = HashSet::new();
    let mut native_seen = false;
    let mut deltas: Vec<AssetAmount> = Vec::new();

    for entry in entries {
        let AffectedEntry::Modified(data) = entry else {
            continue;
        };

        match data.kind {
            EntryKind::BilateralBalance => {
                let Some(currency) = data.balance_currency() else {
                    continue;
                };
                if is_share_token_code(currency) {
                    continue;
                }
                let Some(counterpart) = data.bilateral_counterpart(initiating) else {
                    continue;
                };
                let key = (currency.to_string(), counterpart.clone());
                if seen.contains(&key) {
                    continue;
                }
                let Some(delta) = data.delta_from_perspective_of(initiating) else {
                    continue;
                };
                // Deposited assets leave the initiating account, withdrawn
                // assets arrive; the sign convention follows the reported
                // operation, it is not a property of the entry itself.
                let Some(amount) = directed_magnitude(-delta, direction) else {
                    continue;
                };
                let (currency, counterpart) = key.clone();
                seen.insert(key);
                deltas.push(AssetAmount::issued(currency, counterpart, amount));
            }

            EntryKind::NativeAccount => {
                if native_seen {
                    continue;
                }
                let Some(moved) = native_drops_moved(data, initiating, fee_drops) else {
                    continue;
                };
                if moved.unsigned_abs() < native_dust_drops as u128 {
                    continue;
                }
                // Positive `moved` means drops left the account beyond the
                // fee; the reported operation decides which way counts.
                let drops = match direction {
                    OperationDirection::Deposit => moved,
                    OperationDirection::Withdraw => -moved,
                };
                if drops <= 0 {
                    continue;
                }
                if let Ok(drops) = u64::try_from(drops) {
                    native_seen = true;
                    deltas.push(AssetAmount::native(drops_to_units(drops)));
                }
            }

            _ => {}
        }
    }

    deltas.sort_by(|a, b| a.currency.cmp(&b.currency));
    deltas
}

/// A bilateral share-token record between the initiating account and the
/// pool, reduced to its perspective-corrected value by `extract`
fn share_token_candidate<F>(
    data: &ledger_core::EntryData,
    initiating: &AccountId,
    pool_account: &AccountId,
    extract: F,
) -> Option<Decimal>
where
    F: Fn(&ledger_core::EntryData) -> Option<Decimal>,
{
    if !data.is_bilateral() {
        return None;
    }
    let currency = data.balance_currency()?;
    if !is_share_token_code(currency) {
        return None;
    }

    let fields = data.resolved_fields()?;
    let low = &fields.low_limit.as_ref()?.issuer;
    let high = &fields.high_limit.as_ref()?.issuer;
    let involves_both = (low == initiating && high == pool_account)
        || (low == pool_account && high == initiating);
    if !involves_both {
        return None;
    }

    extract(data)
}

/// Positive magnitude when the delta points the way the reported
/// operation moves share tokens / assets; `None` otherwise.
/// Deposits are reported through positive deltas, withdrawals through
/// negative ones.
fn directed_magnitude(delta: Decimal, direction: OperationDirection) -> Option<Decimal> {
    let signed = match direction {
        OperationDirection::Deposit => delta,
        OperationDirection::Withdraw => -delta,
    };
    if signed > Decimal::ZERO {
        Some(signed)
    } else {
        None
    }
}

/// Drops moved by the initiating account's root entry, net of the network
/// fee: `previous − final − fee`. Positive means drops left the account
/// beyond the fee; negative means drops arrived.
fn native_drops_moved(
    data: &ledger_core::EntryData,
    initiating: &AccountId,
    fee_drops: u64,
) -> Option<i128> {
    let final_fields = data.final_fields.as_ref()?;
    if final_fields.account.as_ref() != Some(initiating) {
        return None;
    }
    let previous = data.previous_fields.as_ref()?.balance.as_ref()?.drops()?;
    let final_ = final_fields.balance.as_ref()?.drops()?;

    Some(previous as i128 - final_ as i128 - fee_drops as i128)
}
