//! Invoicing provider port.
//!
//! Implementations talk to the third-party invoicing system that owns the
//! payment accounts.

use crate::domain::{PaymentAccount, UserId};
use crate::error::ProviderError;

/// Port trait for the invoicing provider.
#[async_trait::async_trait]
pub trait InvoicingProvider: Send + Sync + 'static {
    /// Fetches the payment account of a user, creating an empty one if needed.
    async fn get_or_create_payment_account(
        &self,
        user_id: UserId,
    ) -> Result<PaymentAccount, ProviderError>;

    /// Updates the payment account. The write is visible to
    /// `get_or_create_payment_account` once [`done`] has returned.
    ///
    /// [`done`]: InvoicingProvider::done
    async fn persist_payment_account(
        &self,
        user_id: UserId,
        account: &PaymentAccount,
    ) -> Result<(), ProviderError>;

    /// Commits the caller's preceding writes.
    ///
    /// The adapter is shared by concurrent requests; it must never flush or
    /// report on writes issued by another caller.
    async fn done(&self) -> Result<(), ProviderError>;
}
