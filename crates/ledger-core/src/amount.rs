// ledger-core/src/amount.rs

use crate::{types::AccountId, CoreError, CoreResult};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Sentinel currency code for the network's native asset
pub const NATIVE_CURRENCY: &str = "XRP";

/// Number of drops making up one native unit
pub const DROPS_PER_NATIVE_UNIT: u64 = 1_000_000;

/// Width of the synthetic currency codes used for pool share tokens.
/// Ordinary currency codes are three characters; share-token codes are
/// fixed-width hex strings and never collide with them.
pub const SHARE_TOKEN_CODE_LEN: usize = 40;

/// Returns true if the currency code has the synthetic share-token width
pub fn is_share_token_code(code: &str) -> bool {
    code.len() == SHARE_TOKEN_CODE_LEN
}

/// A logical asset amount: currency code, optional issuer, decimal value.
///
/// The native asset uses [`NATIVE_CURRENCY`] and carries no issuer; issued
/// assets always carry one. Values are decimal throughout, never floats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    /// Currency code
    pub currency: String,
    /// Issuing account (absent for the native asset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<AccountId>,
    /// Decimal value
    pub value: Decimal,
}

impl AssetAmount {
    /// Create a native-asset amount
    pub fn native(value: Decimal) -> Self {
        Self {
            currency: NATIVE_CURRENCY.to_string(),
            issuer: None,
            value,
        }
    }

    /// Create an issued-asset amount
    pub fn issued(currency: impl Into<String>, issuer: AccountId, value: Decimal) -> Self {
        Self {
            currency: currency.into(),
            issuer: Some(issuer),
            value,
        }
    }

    /// Is this the native asset
    pub fn is_native(&self) -> bool {
        self.currency == NATIVE_CURRENCY
    }

    /// Is this a pool share token (synthetic fixed-width currency code)
    pub fn is_share_token(&self) -> bool {
        is_share_token_code(&self.currency)
    }

    /// Convert to the representation the ledger protocol expects:
    /// a drop-count string for the native asset, an object for issued assets.
    pub fn to_protocol(&self) -> CoreResult<ProtocolAmount> {
        if self.value.is_sign_negative() {
            return Err(CoreError::InvalidAmount(format!(
                "negative value: {}",
                self.value
            )));
        }

        if self.is_native() {
            let drops = self.value * Decimal::from(DROPS_PER_NATIVE_UNIT);
            if !drops.fract().is_zero() {
                return Err(CoreError::InvalidDrops(format!(
                    "{} native units is not a whole drop count",
                    self.value
                )));
            }
            let drops = drops.trunc().to_u64().ok_or_else(|| {
                CoreError::InvalidDrops(format!("{} exceeds drop range", self.value))
            })?;
            return Ok(ProtocolAmount::Drops(drops.to_string()));
        }

        let issuer = self
            .issuer
            .clone()
            .ok_or_else(|| CoreError::MissingIssuer(self.currency.clone()))?;

        Ok(ProtocolAmount::Issued {
            currency: self.currency.clone(),
            issuer,
            value: self.value.normalize().to_string(),
        })
    }

    /// Reconstruct a logical amount from a protocol representation
    pub fn from_protocol(protocol: &ProtocolAmount) -> CoreResult<Self> {
        match protocol {
            ProtocolAmount::Drops(drops) => {
                let drops: u64 = drops
                    .parse()
                    .map_err(|_| CoreError::InvalidDrops(drops.clone()))?;
                Ok(Self::native(drops_to_units(drops)))
            }
            ProtocolAmount::Issued {
                currency,
                issuer,
                value,
            } => {
                let value = Decimal::from_str(value)
                    .map_err(|_| CoreError::InvalidAmount(value.clone()))?;
                Ok(Self::issued(currency.clone(), issuer.clone(), value))
            }
        }
    }
}

impl std::fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.issuer {
            Some(issuer) => write!(f, "{} {}.{}", self.value, self.currency, issuer),
            None => write!(f, "{} {}", self.value, self.currency),
        }
    }
}

/// Convert a raw drop count to native units
pub fn drops_to_units(drops: u64) -> Decimal {
    Decimal::from(drops) / Decimal::from(DROPS_PER_NATIVE_UNIT)
}

/// The two on-wire amount representations the protocol uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProtocolAmount {
    /// Native asset, expressed as an integer drop-count string
    Drops(String),
    /// Issued asset, expressed as a currency/issuer/value object
    Issued {
        currency: String,
        issuer: AccountId,
        value: String,
    },
}

impl ProtocolAmount {
    /// Currency code of this amount
    pub fn currency(&self) -> &str {
        match self {
            ProtocolAmount::Drops(_) => NATIVE_CURRENCY,
            ProtocolAmount::Issued { currency, .. } => currency,
        }
    }

    /// Raw drop count, if this is a native amount
    pub fn drops(&self) -> Option<u64> {
        match self {
            ProtocolAmount::Drops(drops) => drops.parse().ok(),
            ProtocolAmount::Issued { .. } => None,
        }
    }

    /// Decimal value, if this is an issued amount
    pub fn issued_value(&self) -> Option<Decimal> {
        match self {
            ProtocolAmount::Drops(_) => None,
            ProtocolAmount::Issued { value, .. } => Decimal::from_str(value).ok(),
        }
    }
}
