//! Database row types shared by the SQLite and PostgreSQL adapters.
//!
//! Rows are always looked up by user ID, so the key column is not selected.

use sqlx::FromRow;

use payout_types::{Invoicing, RepoError, User, UserId};

/// User row from database.
#[derive(FromRow)]
pub struct DbUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

impl DbUser {
    /// Convert database row to domain User.
    pub fn into_domain(self, id: UserId, roles: Vec<String>) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            roles,
        }
    }
}

/// Payment data row from database.
#[derive(FromRow)]
pub struct DbPaymentData {
    pub payment_account: String,
    pub default_type: String,
}

impl DbPaymentData {
    /// Convert database row to the domain payment record.
    pub fn into_domain(self, user_id: UserId) -> Result<Invoicing, RepoError> {
        Invoicing::from_snapshot(user_id, self.payment_account, self.default_type)
    }
}
