// ledger-core/src/pool.rs

use crate::amount::AssetAmount;
use crate::types::{AccountId, BasisPoints};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live composition of an AMM pool.
///
/// Fetched fresh per operation and never cached across calls: pool
/// composition changes every block. `asset1`/`asset2` are held in a
/// deterministic order (lexicographic by currency code) so callers can
/// address "the pool's first asset" unambiguously.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// The pool's own account
    pub account: AccountId,
    /// First reserve asset (canonical order)
    pub asset1: AssetAmount,
    /// Second reserve asset (canonical order)
    pub asset2: AssetAmount,
    /// Outstanding share-token supply, issued by the pool account
    pub share_token: AssetAmount,
    /// Trading fee in basis points
    pub trading_fee_bp: BasisPoints,
    /// Current discounted-fee auction slot, if occupied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction_slot: Option<AuctionSlot>,
    /// Fee votes weighted by share-token holdings
    #[serde(default)]
    pub vote_slots: Vec<VoteSlot>,
}

impl PoolSnapshot {
    /// Create a snapshot, ordering the two reserve assets canonically
    pub fn new(
        account: AccountId,
        asset_a: AssetAmount,
        asset_b: AssetAmount,
        share_token: AssetAmount,
        trading_fee_bp: BasisPoints,
    ) -> Self {
        let (asset1, asset2) = if asset_a.currency <= asset_b.currency {
            (asset_a, asset_b)
        } else {
            (asset_b, asset_a)
        };
        Self {
            account,
            asset1,
            asset2,
            share_token,
            trading_fee_bp,
            auction_slot: None,
            vote_slots: Vec::new(),
        }
    }

    /// The pool asset matching a currency code, if any
    pub fn matching_asset(&self, currency: &str) -> Option<&AssetAmount> {
        if self.asset1.currency == currency {
            Some(&self.asset1)
        } else if self.asset2.currency == currency {
            Some(&self.asset2)
        } else {
            None
        }
    }

    /// The pool asset that does *not* match a currency code, if the code
    /// matches the other one
    pub fn counterpart_asset(&self, currency: &str) -> Option<&AssetAmount> {
        if self.asset1.currency == currency {
            Some(&self.asset2)
        } else if self.asset2.currency == currency {
            Some(&self.asset1)
        } else {
            None
        }
    }
}

/// The pool's discounted-fee auction slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionSlot {
    /// Current slot holder
    pub owner: AccountId,
    /// Discounted trading fee the holder enjoys, in basis points
    pub discounted_fee_bp: BasisPoints,
    /// Price paid for the slot, in share tokens
    pub price: AssetAmount,
    /// When the slot expires
    pub expiration: DateTime<Utc>,
}

/// One account's trading-fee vote, weighted by its share-token holdings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteSlot {
    /// Voting account
    pub account: AccountId,
    /// Voted trading fee in basis points
    pub trading_fee_bp: BasisPoints,
    /// Vote weight
    pub vote_weight: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn share_token(pool: &str) -> AssetAmount {
        AssetAmount::issued(
            "03AB6A1C1D2E3F40516273849506172839405162",
            AccountId::new(pool),
            dec!(1000),
        )
    }

    #[test]
    fn test_assets_ordered_canonically() {
        let usd = AssetAmount::issued("USD", AccountId::new("rIssuer"), dec!(500));
        let eur = AssetAmount::issued("EUR", AccountId::new("rIssuer"), dec!(400));

        // Insertion order must not matter
        let a = PoolSnapshot::new(
            AccountId::new("rPool"),
            usd.clone(),
            eur.clone(),
            share_token("rPool"),
            30,
        );
        let b = PoolSnapshot::new(
            AccountId::new("rPool"),
            eur,
            usd,
            share_token("rPool"),
            30,
        );

        assert_eq!(a.asset1.currency, "EUR");
        assert_eq!(a.asset2.currency, "USD");
        assert_eq!(b.asset1.currency, "EUR");
        assert_eq!(b.asset2.currency, "USD");
    }

    #[test]
    fn test_matching_and_counterpart() {
        let pool = PoolSnapshot::new(
            AccountId::new("rPool"),
            AssetAmount::native(dec!(100)),
            AssetAmount::issued("USD", AccountId::new("rIssuer"), dec!(500)),
            share_token("rPool"),
            30,
        );

        assert_eq!(pool.matching_asset("USD").unwrap().currency, "USD");
        assert_eq!(pool.counterpart_asset("USD").unwrap().currency, "XRP");
        assert!(pool.matching_asset("EUR").is_none());
        assert!(pool.counterpart_asset("EUR").is_none());
    }
}
