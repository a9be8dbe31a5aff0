//! Repository port traits.
//!
//! Adapters (Postgres, SQLite) implement these for the local datastore.

use crate::domain::{Invoicing, PayoutType, User, UserId};
use crate::error::RepoError;

/// User persistence.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Persists the user as given.
    async fn update_user(&self, user: &User) -> Result<(), RepoError>;

    /// Loads a user with its roles attached.
    ///
    /// Fails with `RepoError::NotFound` when the user does not exist.
    async fn get_user_with_roles(&self, id: UserId) -> Result<User, RepoError>;
}

/// Local mirror of the provider payment accounts.
#[async_trait::async_trait]
pub trait PaymentDataRepository: Send + Sync + 'static {
    /// Gets the payment record of a user, `None` if payout was never configured.
    async fn get_user_payment_data(&self, user_id: UserId)
    -> Result<Option<Invoicing>, RepoError>;

    /// Stores the serialized provider account and the default payout type.
    ///
    /// Last write wins.
    async fn store_user_payment_type(
        &self,
        user_id: UserId,
        payment_account: &str,
        default_type: PayoutType,
    ) -> Result<(), RepoError>;
}
