//! Local payment record.

use serde::{Deserialize, Serialize};

use super::payment_account::PaymentAccount;
use super::payout::{BankTransfer, Paypal};
use super::user::UserId;
use crate::error::RepoError;

/// Last-known payout configuration of a user, as mirrored locally.
///
/// Absence of this record means the user has never configured a payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoicing {
    pub user_id: UserId,
    pub bank_transfer: BankTransfer,
    pub paypal: Paypal,
    /// Stored default tag, kept as written so unknown tags surface on use.
    pub default_type: String,
    /// Serialized provider account this record was built from.
    pub payment_account: String,
}

impl Invoicing {
    /// Rebuilds the record from a stored provider snapshot and its tag.
    pub fn from_snapshot(
        user_id: UserId,
        payment_account: String,
        default_type: String,
    ) -> Result<Self, RepoError> {
        let account: PaymentAccount = serde_json::from_str(&payment_account)
            .map_err(|e| RepoError::Serialization(e.to_string()))?;

        Ok(Self {
            user_id,
            bank_transfer: account.bank_account.map(Into::into).unwrap_or_default(),
            paypal: Paypal {
                email: account.paypal_account.unwrap_or_default(),
            },
            default_type,
            payment_account,
        })
    }
}
