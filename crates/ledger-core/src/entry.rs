// ledger-core/src/entry.rs

//! Ledger-entry change records.
//!
//! After a transaction settles, the ledger reports its effects as a list of
//! before/after entry changes. This is the sole source of truth for what
//! actually happened; the accounting engine only ever reads it.
//!
//! Bilateral-balance entries store their balance from the *low* account's
//! perspective. The sign flip required when reasoning from the high side is
//! isolated in [`EntryData::delta_from_perspective_of`] and
//! [`EntryData::new_balance_from_perspective_of`].

use crate::amount::ProtocolAmount;
use crate::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger entry types relevant to liquidity settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// A trust line: an issued-asset balance between exactly two accounts
    BilateralBalance,
    /// An account root holding the native-asset balance and owner count
    NativeAccount,
    /// The AMM pool entry itself
    PoolAccount,
    /// Any other entry type; carried through but never interpreted
    #[serde(other)]
    Other,
}

/// One before/after ledger-entry change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AffectedEntry {
    /// Entry created by the transaction (`NewFields` populated)
    Created(EntryData),
    /// Entry modified by the transaction (`PreviousFields`/`FinalFields`)
    Modified(EntryData),
    /// Entry deleted by the transaction (`FinalFields` populated)
    Deleted(EntryData),
}

impl AffectedEntry {
    /// The change's entry payload regardless of change kind
    pub fn data(&self) -> &EntryData {
        match self {
            AffectedEntry::Created(d) | AffectedEntry::Modified(d) | AffectedEntry::Deleted(d) => d,
        }
    }
}

/// Payload of a single entry change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryData {
    /// Entry type tag
    #[serde(rename = "EntryType")]
    pub kind: EntryKind,
    /// Field values before the change (modified entries; changed fields only)
    #[serde(rename = "PreviousFields", skip_serializing_if = "Option::is_none")]
    pub previous_fields: Option<EntryFields>,
    /// Field values after the change (modified and deleted entries)
    #[serde(rename = "FinalFields", skip_serializing_if = "Option::is_none")]
    pub final_fields: Option<EntryFields>,
    /// Field values of a newly created entry
    #[serde(rename = "NewFields", skip_serializing_if = "Option::is_none")]
    pub new_fields: Option<EntryFields>,
}

/// Entry field sub-record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryFields {
    /// Balance: drop-count string for account roots, issued triple for
    /// bilateral balances (from the low account's perspective)
    #[serde(rename = "Balance", skip_serializing_if = "Option::is_none")]
    pub balance: Option<ProtocolAmount>,
    /// High-side limit record of a bilateral balance
    #[serde(rename = "HighLimit", skip_serializing_if = "Option::is_none")]
    pub high_limit: Option<LimitField>,
    /// Low-side limit record of a bilateral balance
    #[serde(rename = "LowLimit", skip_serializing_if = "Option::is_none")]
    pub low_limit: Option<LimitField>,
    /// Owning account of an account-root entry
    #[serde(rename = "Account", skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountId>,
    /// Owned-object count of an account-root entry
    #[serde(rename = "OwnerCount", skip_serializing_if = "Option::is_none")]
    pub owner_count: Option<u32>,
}

/// One side's limit record on a bilateral balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitField {
    pub currency: String,
    pub issuer: AccountId,
    pub value: String,
}

impl EntryData {
    /// Is this a bilateral-balance entry
    pub fn is_bilateral(&self) -> bool {
        self.kind == EntryKind::BilateralBalance
    }

    /// The fields that describe the entry's final shape: `FinalFields` for
    /// modified/deleted entries, `NewFields` for created ones.
    pub fn resolved_fields(&self) -> Option<&EntryFields> {
        self.final_fields.as_ref().or(self.new_fields.as_ref())
    }

    /// The two sides of a bilateral balance as `(low, high)`
    pub fn bilateral_sides(&self) -> Option<(&AccountId, &AccountId)> {
        let fields = self.resolved_fields()?;
        let low = fields.low_limit.as_ref()?;
        let high = fields.high_limit.as_ref()?;
        Some((&low.issuer, &high.issuer))
    }

    /// Currency code of the entry's balance, if it carries one
    pub fn balance_currency(&self) -> Option<&str> {
        self.resolved_fields()?.balance.as_ref().map(|b| b.currency())
    }

    /// Balance change of a modified bilateral entry, viewed from `account`.
    ///
    /// The raw values are stored from the low side's perspective; when
    /// `account` is the high side both are negated before differencing.
    /// Returns `None` when `account` is neither side, when the entry is not
    /// a modified bilateral balance, or when the balance did not change.
    pub fn delta_from_perspective_of(&self, account: &AccountId) -> Option<Decimal> {
        let (low, high) = self.bilateral_sides()?;
        let sign = if account == low {
            Decimal::ONE
        } else if account == high {
            Decimal::NEGATIVE_ONE
        } else {
            return None;
        };

        let previous = self
            .previous_fields
            .as_ref()?
            .balance
            .as_ref()?
            .issued_value()?;
        let final_ = self.final_fields.as_ref()?.balance.as_ref()?.issued_value()?;

        Some(sign * (final_ - previous))
    }

    /// Balance of a created bilateral entry, viewed from `account`, with an
    /// implicit previous balance of zero.
    pub fn new_balance_from_perspective_of(&self, account: &AccountId) -> Option<Decimal> {
        let fields = self.new_fields.as_ref()?;
        let low = fields.low_limit.as_ref()?;
        let high = fields.high_limit.as_ref()?;
        let sign = if account == &low.issuer {
            Decimal::ONE
        } else if account == &high.issuer {
            Decimal::NEGATIVE_ONE
        } else {
            return None;
        };

        let balance = fields.balance.as_ref()?.issued_value()?;
        Some(sign * balance)
    }

    /// Counterpart side of a bilateral balance involving `account`
    pub fn bilateral_counterpart(&self, account: &AccountId) -> Option<&AccountId> {
        let (low, high) = self.bilateral_sides()?;
        if account == low {
            Some(high)
        } else if account == high {
            Some(low)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn issued(value: &str) -> ProtocolAmount {
        ProtocolAmount::Issued {
            currency: "USD".into(),
            issuer: AccountId::new("rNeutral"),
            value: value.into(),
        }
    }

    fn limit(issuer: &str) -> LimitField {
        LimitField {
            currency: "USD".into(),
            issuer: AccountId::new(issuer),
            value: "0".into(),
        }
    }

    fn modified_bilateral(low: &str, high: &str, previous: &str, final_: &str) -> EntryData {
        EntryData {
            kind: EntryKind::BilateralBalance,
            previous_fields: Some(EntryFields {
                balance: Some(issued(previous)),
                ..Default::default()
            }),
            final_fields: Some(EntryFields {
                balance: Some(issued(final_)),
                low_limit: Some(limit(low)),
                high_limit: Some(limit(high)),
                ..Default::default()
            }),
            new_fields: None,
        }
    }

    #[test]
    fn test_delta_low_side_perspective() {
        let entry = modified_bilateral("rAlice", "rPool", "100", "150");
        let alice = AccountId::new("rAlice");
        assert_eq!(entry.delta_from_perspective_of(&alice), Some(dec!(50)));
    }

    #[test]
    fn test_delta_high_side_perspective() {
        // Same economic change with the accounts on swapped sides: the raw
        // stored values negate, the corrected delta must not.
        let entry = modified_bilateral("rPool", "rAlice", "-100", "-150");
        let alice = AccountId::new("rAlice");
        assert_eq!(entry.delta_from_perspective_of(&alice), Some(dec!(50)));
    }

    #[test]
    fn test_delta_uninvolved_account() {
        let entry = modified_bilateral("rAlice", "rPool", "100", "150");
        let mallory = AccountId::new("rMallory");
        assert_eq!(entry.delta_from_perspective_of(&mallory), None);
    }

    #[test]
    fn test_delta_requires_previous_balance() {
        let mut entry = modified_bilateral("rAlice", "rPool", "100", "150");
        entry.previous_fields = Some(EntryFields::default());
        let alice = AccountId::new("rAlice");
        assert_eq!(entry.delta_from_perspective_of(&alice), None);
    }

    #[test]
    fn test_new_balance_perspective() {
        let entry = EntryData {
            kind: EntryKind::BilateralBalance,
            previous_fields: None,
            final_fields: None,
            new_fields: Some(EntryFields {
                balance: Some(issued("-12.5")),
                low_limit: Some(limit("rPool")),
                high_limit: Some(limit("rAlice")),
                ..Default::default()
            }),
        };
        let alice = AccountId::new("rAlice");
        assert_eq!(entry.new_balance_from_perspective_of(&alice), Some(dec!(12.5)));
    }

    #[test]
    fn test_counterpart_lookup() {
        let entry = modified_bilateral("rAlice", "rPool", "100", "150");
        let alice = AccountId::new("rAlice");
        let pool = AccountId::new("rPool");
        assert_eq!(entry.bilateral_counterpart(&alice), Some(&pool));
        assert_eq!(entry.bilateral_counterpart(&pool), Some(&alice));
    }

    #[test]
    fn test_unknown_entry_kind_deserializes() {
        let json = r#"{"EntryType":"EscrowThing","FinalFields":{}}"#;
        let entry: EntryData = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, EntryKind::Other);
    }

    proptest! {
        // Perspective invariance: swapping which account sits on the low and
        // high sides (negating the stored values accordingly) never changes
        // the corrected delta.
        #[test]
        fn prop_perspective_invariance(prev in -1_000_000i64..1_000_000, delta in -1_000_000i64..1_000_000) {
            let prev_d = Decimal::from(prev);
            let final_d = Decimal::from(prev + delta);

            let as_low = modified_bilateral(
                "rAlice", "rPool",
                &prev_d.to_string(), &final_d.to_string(),
            );
            let as_high = modified_bilateral(
                "rPool", "rAlice",
                &(-prev_d).to_string(), &(-final_d).to_string(),
            );

            let alice = AccountId::new("rAlice");
            prop_assert_eq!(
                as_low.delta_from_perspective_of(&alice),
                as_high.delta_from_perspective_of(&alice)
            );
            prop_assert_eq!(as_low.delta_from_perspective_of(&alice), Some(Decimal::from(delta)));
        }
    }
}
