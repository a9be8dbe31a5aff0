//! Provider-side payment account.
//!
//! The invoicing provider owns this record; it is created on demand and
//! mirrored locally as a serialized snapshot after every save.

use serde::{Deserialize, Serialize};

use super::payout::{BankTransfer, PayoutMethod, PayoutType};
use super::user::UserId;

/// Default-account flag as understood by the invoicing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    BankAccount,
    PaypalAccount,
}

impl From<PayoutType> for AccountType {
    fn from(payout_type: PayoutType) -> Self {
        match payout_type {
            PayoutType::BankTransfer => AccountType::BankAccount,
            PayoutType::Paypal => AccountType::PaypalAccount,
        }
    }
}

impl From<AccountType> for PayoutType {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::BankAccount => PayoutType::BankTransfer,
            AccountType::PaypalAccount => PayoutType::Paypal,
        }
    }
}

/// Bank account sub-object of a [`PaymentAccount`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub iban: String,
    pub bic: String,
    pub bank_name: String,
    pub account_holder: String,
}

impl From<BankTransfer> for BankAccount {
    fn from(bt: BankTransfer) -> Self {
        Self {
            iban: bt.iban,
            bic: bt.bic,
            bank_name: bt.bank_name,
            account_holder: bt.account_holder,
        }
    }
}

impl From<BankAccount> for BankTransfer {
    fn from(account: BankAccount) -> Self {
        Self {
            account_holder: account.account_holder,
            bank_name: account.bank_name,
            iban: account.iban,
            bic: account.bic,
        }
    }
}

/// Payment account held by the invoicing provider, keyed by user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAccount {
    /// Provider-assigned identifier, absent until the provider stores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: UserId,
    #[serde(default)]
    pub bank_account: Option<BankAccount>,
    #[serde(default)]
    pub paypal_account: Option<String>,
    #[serde(default)]
    pub default_account_type: Option<AccountType>,
}

impl PaymentAccount {
    /// Creates an empty account for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: None,
            user_id,
            bank_account: None,
            paypal_account: None,
            default_account_type: None,
        }
    }

    /// Attaches the payout method as the matching sub-object.
    ///
    /// Returns the payout type the method belongs to; the other sub-object
    /// is left untouched.
    pub fn attach(&mut self, method: PayoutMethod) -> PayoutType {
        match method {
            PayoutMethod::BankTransfer(bt) => {
                self.bank_account = Some(bt.into());
                PayoutType::BankTransfer
            }
            PayoutMethod::Paypal(paypal) => {
                self.paypal_account = Some(paypal.email);
                PayoutType::Paypal
            }
        }
    }

    /// Marks the given payout type as the default account.
    pub fn set_default(&mut self, payout_type: PayoutType) {
        self.default_account_type = Some(payout_type.into());
    }
}
