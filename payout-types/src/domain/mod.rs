//! Domain models for the payout settings service.

pub mod invoicing;
pub mod notification;
pub mod payment_account;
pub mod payout;
pub mod settings;
pub mod user;

pub use invoicing::Invoicing;
pub use notification::CompanyChangeNotification;
pub use payment_account::{AccountType, BankAccount, PaymentAccount};
pub use payout::{
    BankTransfer, Payout, PayoutDetails, PayoutMethod, PayoutOption, PayoutType, Paypal,
};
pub use settings::Settings;
pub use user::{User, UserId};
