//! Payout value objects.
//!
//! These are request-scoped views rebuilt on every read. Both payout
//! variants always exist in a [`PayoutDetails`], possibly empty; the
//! [`PayoutOption`] tag decides which one is active.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Bank transfer payout details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransfer {
    #[serde(default)]
    pub account_holder: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub iban: String,
    #[serde(default)]
    pub bic: String,
}

impl BankTransfer {
    /// Named fields, in display order.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("account_holder", &self.account_holder),
            ("bank_name", &self.bank_name),
            ("iban", &self.iban),
            ("bic", &self.bic),
        ]
    }
}

/// PayPal payout details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paypal {
    #[serde(default)]
    pub email: String,
}

impl Paypal {
    pub fn fields(&self) -> [(&'static str, &str); 1] {
        [("email", &self.email)]
    }
}

/// The closed set of payout types, keyed by their alias tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutType {
    #[default]
    BankTransfer,
    Paypal,
}

impl PayoutType {
    pub const BANK_TRANSFER_ALIAS: &'static str = "bank_transfer";
    pub const PAYPAL_ALIAS: &'static str = "paypal";

    /// Returns the alias tag stored locally and exchanged with clients.
    pub fn alias(&self) -> &'static str {
        match self {
            PayoutType::BankTransfer => Self::BANK_TRANSFER_ALIAS,
            PayoutType::Paypal => Self::PAYPAL_ALIAS,
        }
    }
}

impl std::fmt::Display for PayoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.alias())
    }
}

impl std::str::FromStr for PayoutType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::BANK_TRANSFER_ALIAS => Ok(PayoutType::BankTransfer),
            Self::PAYPAL_ALIAS => Ok(PayoutType::Paypal),
            other => Err(DomainError::InvalidPaymentOption(other.to_string())),
        }
    }
}

/// A concrete payout account submitted by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutMethod {
    BankTransfer(BankTransfer),
    Paypal(Paypal),
}

impl PayoutMethod {
    pub fn payout_type(&self) -> PayoutType {
        match self {
            PayoutMethod::BankTransfer(_) => PayoutType::BankTransfer,
            PayoutMethod::Paypal(_) => PayoutType::Paypal,
        }
    }
}

/// Both payout variants of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutDetails {
    pub bank_transfer: BankTransfer,
    pub paypal: Paypal,
}

impl PayoutDetails {
    /// Returns the named fields of the variant selected by `payout_type`.
    pub fn fields_for(&self, payout_type: PayoutType) -> Vec<(&'static str, &str)> {
        match payout_type {
            PayoutType::BankTransfer => self.bank_transfer.fields().to_vec(),
            PayoutType::Paypal => self.paypal.fields().to_vec(),
        }
    }

    /// True when every field of the selected variant is non-empty.
    pub fn is_complete(&self, payout_type: PayoutType) -> bool {
        self.fields_for(payout_type)
            .iter()
            .all(|(_, value)| !value.is_empty())
    }
}

/// Which payout type is marked as default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutOption {
    pub default: String,
}

impl PayoutOption {
    pub fn new(payout_type: PayoutType) -> Self {
        Self {
            default: payout_type.alias().to_string(),
        }
    }

    /// Parses the tag, failing with `InvalidPaymentOption` for unknown values.
    pub fn payout_type(&self) -> Result<PayoutType, DomainError> {
        self.default.parse()
    }
}

impl Default for PayoutOption {
    fn default() -> Self {
        Self::new(PayoutType::default())
    }
}

/// Payout details together with the default selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    #[serde(rename = "type")]
    pub details: PayoutDetails,
    pub option: PayoutOption,
}
