// liquidity/src/builder.rs

//! Maps a liquidity operation onto the protocol instruction shape.
//!
//! One builder serves all nine instruction forms. Every instruction
//! carries `Account`, `Asset` and `Asset2` (the pool's two underlying
//! assets in canonical order); the mode decides which amount fields are
//! populated and which single flag bit is set.

use crate::{LiquidityError, LiquidityResult};
use ledger_core::{
    deposit_flags, withdraw_flags, AccountId, AssetAmount, AssetRef, InstructionType,
    LedgerSequence, LiquidityInstruction, PoolSnapshot,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether liquidity is being added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationDirection {
    Deposit,
    Withdraw,
}

impl OperationDirection {
    /// The instruction type this direction maps to
    pub fn instruction_type(self) -> InstructionType {
        match self {
            OperationDirection::Deposit => InstructionType::LiquidityDeposit,
            OperationDirection::Withdraw => InstructionType::LiquidityWithdraw,
        }
    }
}

impl std::fmt::Display for OperationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationDirection::Deposit => write!(f, "deposit"),
            OperationDirection::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// One liquidity operation, carrying only the fields valid for its mode.
///
/// Combined with an [`OperationDirection`], the seven variants produce the
/// nine instruction forms the protocol accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LiquidityOperation {
    /// Move both assets in explicit amounts
    TwoAsset {
        amount_a: AssetAmount,
        amount_b: AssetAmount,
    },
    /// Move both assets for an exact share-token amount
    TwoAssetForShareToken { share_tokens: Decimal },
    /// Move a single asset in an explicit amount
    SingleAsset { amount: AssetAmount },
    /// Deposit a single asset for an exact share-token amount
    SingleAssetForShareToken {
        amount: AssetAmount,
        share_tokens: Decimal,
    },
    /// Surrender the entire share-token position
    WithdrawAll,
    /// Surrender the entire position, paid out in one asset
    WithdrawAllSingleAsset { currency: String },
    /// Surrender an exact share-token amount, paid out in one asset
    SingleAssetWithShareTokenIn {
        currency: String,
        share_tokens: Decimal,
    },
}

impl LiquidityOperation {
    /// Short mode name for diagnostics
    pub fn mode_name(&self) -> &'static str {
        match self {
            LiquidityOperation::TwoAsset { .. } => "TwoAsset",
            LiquidityOperation::TwoAssetForShareToken { .. } => "TwoAssetForShareToken",
            LiquidityOperation::SingleAsset { .. } => "SingleAsset",
            LiquidityOperation::SingleAssetForShareToken { .. } => "SingleAssetForShareToken",
            LiquidityOperation::WithdrawAll => "WithdrawAll",
            LiquidityOperation::WithdrawAllSingleAsset { .. } => "WithdrawAllSingleAsset",
            LiquidityOperation::SingleAssetWithShareTokenIn { .. } => "SingleAssetWithShareTokenIn",
        }
    }
}

/// Build the instruction for one operation against one pool.
///
/// The caller's pool snapshot is never mutated. Fails with
/// `InvalidCurrency` when a named currency is not one of the pool's two
/// assets, `InvalidAmount` for non-positive amounts, and
/// `UnsupportedMode` when the variant has no instruction form in the
/// requested direction.
pub fn build_instruction(
    direction: OperationDirection,
    operation: &LiquidityOperation,
    pool: &PoolSnapshot,
    account: &AccountId,
    last_ledger_sequence: Option<LedgerSequence>,
) -> LiquidityResult<LiquidityInstruction> {
    let mut instruction = LiquidityInstruction {
        instruction_type: direction.instruction_type(),
        account: account.clone(),
        asset: AssetRef::from(&pool.asset1),
        asset2: AssetRef::from(&pool.asset2),
        amount: None,
        amount2: None,
        share_token_out: None,
        share_token_in: None,
        flags: 0,
        last_ledger_sequence,
    };

    use LiquidityOperation::*;
    use OperationDirection::*;

    match (direction, operation) {
        (_, TwoAsset { amount_a, amount_b }) => {
            require_positive(amount_a)?;
            require_positive(amount_b)?;
            let (first, second) = align_to_pool_order(pool, amount_a, amount_b)?;
            instruction.amount = Some(first.to_protocol()?);
            instruction.amount2 = Some(second.to_protocol()?);
            instruction.flags = match direction {
                Deposit => deposit_flags::TWO_ASSET,
                Withdraw => withdraw_flags::TWO_ASSET,
            };
        }

        (Deposit, TwoAssetForShareToken { share_tokens }) => {
            let out = share_token_amount(pool, *share_tokens)?;
            instruction.share_token_out = Some(out.to_protocol()?);
            instruction.flags = deposit_flags::SHARE_TOKEN_OUT;
        }

        (Withdraw, TwoAssetForShareToken { share_tokens }) => {
            let tokens = share_token_amount(pool, *share_tokens)?;
            instruction.share_token_in = Some(tokens.to_protocol()?);
            instruction.flags = withdraw_flags::SHARE_TOKEN_IN;
        }

        (_, SingleAsset { amount }) => {
            require_positive(amount)?;
            require_pool_asset(pool, &amount.currency)?;
            instruction.amount = Some(amount.to_protocol()?);
            instruction.flags = match direction {
                Deposit => deposit_flags::SINGLE_ASSET,
                Withdraw => withdraw_flags::SINGLE_ASSET,
            };
        }

        (
            Deposit,
            SingleAssetForShareToken {
                amount,
                share_tokens,
            },
        ) => {
            require_positive(amount)?;
            require_pool_asset(pool, &amount.currency)?;
            let out = share_token_amount(pool, *share_tokens)?;
            instruction.amount = Some(amount.to_protocol()?);
            instruction.share_token_out = Some(out.to_protocol()?);
            instruction.flags = deposit_flags::SINGLE_ASSET_FOR_SHARE_TOKEN;
        }

        (Withdraw, WithdrawAll) => {
            instruction.flags = withdraw_flags::WITHDRAW_ALL;
        }

        (Withdraw, WithdrawAllSingleAsset { currency }) => {
            let payout = require_pool_asset(pool, currency)?;
            instruction.amount = Some(zero_amount_of(payout).to_protocol()?);
            instruction.flags = withdraw_flags::WITHDRAW_ALL_SINGLE_ASSET;
        }

        (
            Withdraw,
            SingleAssetWithShareTokenIn {
                currency,
                share_tokens,
            },
        ) => {
            let payout = require_pool_asset(pool, currency)?;
            let tokens = share_token_amount(pool, *share_tokens)?;
            instruction.amount = Some(zero_amount_of(payout).to_protocol()?);
            instruction.share_token_in = Some(tokens.to_protocol()?);
            instruction.flags = withdraw_flags::SINGLE_ASSET_WITH_SHARE_TOKEN_IN;
        }

        (direction, operation) => {
            return Err(LiquidityError::UnsupportedMode {
                mode: operation.mode_name(),
                direction,
            });
        }
    }

    debug_assert!(instruction.has_single_mode_flag());
    Ok(instruction)
}

fn require_positive(amount: &AssetAmount) -> LiquidityResult<()> {
    if amount.value <= Decimal::ZERO {
        return Err(LiquidityError::InvalidAmount(format!(
            "requested amount must be positive, got {} {}",
            amount.value, amount.currency
        )));
    }
    Ok(())
}

/// The pool asset matching `currency`, or `InvalidCurrency`
fn require_pool_asset<'a>(
    pool: &'a PoolSnapshot,
    currency: &str,
) -> LiquidityResult<&'a AssetAmount> {
    pool.matching_asset(currency)
        .ok_or_else(|| LiquidityError::InvalidCurrency(format!("{currency} is not a pool asset")))
}

/// Map caller-supplied amounts for both assets onto the pool's canonical
/// `(Amount, Amount2)` order, whichever order the caller passed them in
fn align_to_pool_order<'a>(
    pool: &PoolSnapshot,
    amount_a: &'a AssetAmount,
    amount_b: &'a AssetAmount,
) -> LiquidityResult<(&'a AssetAmount, &'a AssetAmount)> {
    require_pool_asset(pool, &amount_a.currency)?;
    require_pool_asset(pool, &amount_b.currency)?;
    if amount_a.currency == amount_b.currency {
        return Err(LiquidityError::InvalidCurrency(format!(
            "both amounts name the same currency {}",
            amount_a.currency
        )));
    }

    if amount_a.currency == pool.asset1.currency {
        Ok((amount_a, amount_b))
    } else {
        Ok((amount_b, amount_a))
    }
}

/// Share-token amount issued by the pool account
fn share_token_amount(pool: &PoolSnapshot, value: Decimal) -> LiquidityResult<AssetAmount> {
    if value <= Decimal::ZERO {
        return Err(LiquidityError::InvalidAmount(format!(
            "share-token amount must be positive, got {value}"
        )));
    }
    Ok(AssetAmount::issued(
        pool.share_token.currency.clone(),
        pool.account.clone(),
        value,
    ))
}

/// Zero-valued amount of a pool asset, used by the modes that name a
/// payout asset without requesting an explicit quantity
fn zero_amount_of(asset: &AssetAmount) -> AssetAmount {
    AssetAmount {
        currency: asset.currency.clone(),
        issuer: asset.issuer.clone(),
        value: Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{ProtocolAmount, NATIVE_CURRENCY};
    use rust_decimal_macros::dec;

    const SHARE_CODE: &str = "03AB6A1C1D2E3F40516273849506172839405162";

    fn pool() -> PoolSnapshot {
        PoolSnapshot::new(
            AccountId::new("rPool"),
            AssetAmount::native(dec!(1000)),
            AssetAmount::issued("USD", AccountId::new("rIssuer"), dec!(5000)),
            AssetAmount::issued(SHARE_CODE, AccountId::new("rPool"), dec!(2000)),
            30,
        )
    }

    fn account() -> AccountId {
        AccountId::new("rAlice")
    }

    fn usd(value: Decimal) -> AssetAmount {
        AssetAmount::issued("USD", AccountId::new("rIssuer"), value)
    }

    struct Expectation {
        flags: u32,
        amount: bool,
        amount2: bool,
        share_token_out: bool,
        share_token_in: bool,
    }

    fn check(direction: OperationDirection, op: LiquidityOperation, expect: Expectation) {
        let ix = build_instruction(direction, &op, &pool(), &account(), Some(500)).unwrap();

        assert_eq!(ix.flags, expect.flags, "{} {:?}", direction, op.mode_name());
        assert!(ix.has_single_mode_flag());
        assert_eq!(ix.amount.is_some(), expect.amount);
        assert_eq!(ix.amount2.is_some(), expect.amount2);
        assert_eq!(ix.share_token_out.is_some(), expect.share_token_out);
        assert_eq!(ix.share_token_in.is_some(), expect.share_token_in);

        // Asset/Asset2 always carry the pool assets in canonical order
        assert_eq!(ix.asset.currency, "USD");
        assert_eq!(ix.asset2.currency, NATIVE_CURRENCY);
        assert_eq!(ix.last_ledger_sequence, Some(500));
        assert_eq!(ix.instruction_type, direction.instruction_type());
    }

    #[test]
    fn test_all_nine_modes_produce_exact_fields() {
        use LiquidityOperation::*;
        use OperationDirection::*;

        let two_asset = || TwoAsset {
            amount_a: AssetAmount::native(dec!(10)),
            amount_b: usd(dec!(50)),
        };

        check(
            Deposit,
            two_asset(),
            Expectation {
                flags: deposit_flags::TWO_ASSET,
                amount: true,
                amount2: true,
                share_token_out: false,
                share_token_in: false,
            },
        );
        check(
            Withdraw,
            two_asset(),
            Expectation {
                flags: withdraw_flags::TWO_ASSET,
                amount: true,
                amount2: true,
                share_token_out: false,
                share_token_in: false,
            },
        );
        check(
            Deposit,
            TwoAssetForShareToken {
                share_tokens: dec!(25),
            },
            Expectation {
                flags: deposit_flags::SHARE_TOKEN_OUT,
                amount: false,
                amount2: false,
                share_token_out: true,
                share_token_in: false,
            },
        );
        check(
            Withdraw,
            TwoAssetForShareToken {
                share_tokens: dec!(25),
            },
            Expectation {
                flags: withdraw_flags::SHARE_TOKEN_IN,
                amount: false,
                amount2: false,
                share_token_out: false,
                share_token_in: true,
            },
        );
        check(
            Deposit,
            SingleAsset { amount: usd(dec!(50)) },
            Expectation {
                flags: deposit_flags::SINGLE_ASSET,
                amount: true,
                amount2: false,
                share_token_out: false,
                share_token_in: false,
            },
        );
        check(
            Withdraw,
            SingleAsset { amount: usd(dec!(50)) },
            Expectation {
                flags: withdraw_flags::SINGLE_ASSET,
                amount: true,
                amount2: false,
                share_token_out: false,
                share_token_in: false,
            },
        );
        check(
            Deposit,
            SingleAssetForShareToken {
                amount: usd(dec!(50)),
                share_tokens: dec!(10),
            },
            Expectation {
                flags: deposit_flags::SINGLE_ASSET_FOR_SHARE_TOKEN,
                amount: true,
                amount2: false,
                share_token_out: true,
                share_token_in: false,
            },
        );
        check(
            Withdraw,
            WithdrawAll,
            Expectation {
                flags: withdraw_flags::WITHDRAW_ALL,
                amount: false,
                amount2: false,
                share_token_out: false,
                share_token_in: false,
            },
        );
        check(
            Withdraw,
            WithdrawAllSingleAsset {
                currency: "USD".into(),
            },
            Expectation {
                flags: withdraw_flags::WITHDRAW_ALL_SINGLE_ASSET,
                amount: true,
                amount2: false,
                share_token_out: false,
                share_token_in: false,
            },
        );
        check(
            Withdraw,
            SingleAssetWithShareTokenIn {
                currency: "USD".into(),
                share_tokens: dec!(10),
            },
            Expectation {
                flags: withdraw_flags::SINGLE_ASSET_WITH_SHARE_TOKEN_IN,
                amount: true,
                amount2: false,
                share_token_out: false,
                share_token_in: true,
            },
        );
    }

    #[test]
    fn test_two_asset_amounts_align_to_canonical_order() {
        // Caller passes native first; USD sorts first in the pool
        let ix = build_instruction(
            OperationDirection::Deposit,
            &LiquidityOperation::TwoAsset {
                amount_a: AssetAmount::native(dec!(10)),
                amount_b: usd(dec!(50)),
            },
            &pool(),
            &account(),
            None,
        )
        .unwrap();

        assert_eq!(ix.amount.unwrap().currency(), "USD");
        assert_eq!(ix.amount2.unwrap().currency(), NATIVE_CURRENCY);
    }

    #[test]
    fn test_zero_amount_modes_emit_zero() {
        let ix = build_instruction(
            OperationDirection::Withdraw,
            &LiquidityOperation::WithdrawAllSingleAsset {
                currency: NATIVE_CURRENCY.into(),
            },
            &pool(),
            &account(),
            None,
        )
        .unwrap();

        assert_eq!(ix.amount, Some(ProtocolAmount::Drops("0".into())));
    }

    #[test]
    fn test_unknown_currency_rejected() {
        let result = build_instruction(
            OperationDirection::Deposit,
            &LiquidityOperation::SingleAsset {
                amount: AssetAmount::issued("EUR", AccountId::new("rIssuer"), dec!(5)),
            },
            &pool(),
            &account(),
            None,
        );
        assert!(matches!(result, Err(LiquidityError::InvalidCurrency(_))));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let result = build_instruction(
            OperationDirection::Deposit,
            &LiquidityOperation::SingleAsset {
                amount: usd(dec!(0)),
            },
            &pool(),
            &account(),
            None,
        );
        assert!(matches!(result, Err(LiquidityError::InvalidAmount(_))));

        let result = build_instruction(
            OperationDirection::Withdraw,
            &LiquidityOperation::TwoAssetForShareToken {
                share_tokens: dec!(-1),
            },
            &pool(),
            &account(),
            None,
        );
        assert!(matches!(result, Err(LiquidityError::InvalidAmount(_))));
    }

    #[test]
    fn test_direction_mode_mismatch_rejected() {
        let deposit_only = LiquidityOperation::SingleAssetForShareToken {
            amount: usd(dec!(5)),
            share_tokens: dec!(1),
        };
        let result = build_instruction(
            OperationDirection::Withdraw,
            &deposit_only,
            &pool(),
            &account(),
            None,
        );
        assert!(matches!(result, Err(LiquidityError::UnsupportedMode { .. })));

        let withdraw_only = LiquidityOperation::WithdrawAll;
        let result = build_instruction(
            OperationDirection::Deposit,
            &withdraw_only,
            &pool(),
            &account(),
            None,
        );
        assert!(matches!(result, Err(LiquidityError::UnsupportedMode { .. })));
    }

    #[test]
    fn test_pool_snapshot_not_mutated() {
        let pool = pool();
        let before = serde_json::to_value(&pool).unwrap();
        let _ = build_instruction(
            OperationDirection::Deposit,
            &LiquidityOperation::SingleAsset {
                amount: usd(dec!(50)),
            },
            &pool,
            &account(),
            None,
        )
        .unwrap();
        assert_eq!(serde_json::to_value(&pool).unwrap(), before);
    }
}
