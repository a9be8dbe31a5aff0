//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use payout_types::{
    Invoicing, PaymentDataRepository, PayoutType, RepoError, User, UserId, UserStore,
};

use crate::types::{DbPaymentData, DbUser};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl UserStore for SqliteRepo {
    async fn update_user(&self, user: &User) -> Result<(), RepoError> {
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO users (id, first_name, last_name, email, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   first_name = excluded.first_name,
                   last_name = excluded.last_name,
                   email = excluded.email,
                   updated_at = excluded.updated_at"#,
        )
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_user_with_roles(&self, id: UserId) -> Result<User, RepoError> {
        let id_str = id.to_string();

        let row: Option<DbUser> =
            sqlx::query_as(r#"SELECT first_name, last_name, email FROM users WHERE id = ?"#)
                .bind(&id_str)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        let row = row.ok_or(RepoError::NotFound)?;

        let roles: Vec<String> =
            sqlx::query_scalar(r#"SELECT role FROM user_roles WHERE user_id = ? ORDER BY role"#)
                .bind(&id_str)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.into_domain(id, roles))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment data
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentDataRepository for SqliteRepo {
    async fn get_user_payment_data(
        &self,
        user_id: UserId,
    ) -> Result<Option<Invoicing>, RepoError> {
        let row: Option<DbPaymentData> = sqlx::query_as(
            r#"SELECT payment_account, default_type FROM user_payment_data WHERE user_id = ?"#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(|r| r.into_domain(user_id)).transpose()
    }

    async fn store_user_payment_type(
        &self,
        user_id: UserId,
        payment_account: &str,
        default_type: PayoutType,
    ) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO user_payment_data (user_id, payment_account, default_type, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                   payment_account = excluded.payment_account,
                   default_type = excluded.default_type,
                   updated_at = excluded.updated_at"#,
        )
        .bind(user_id.to_string())
        .bind(payment_account)
        .bind(default_type.alias())
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        tracing::debug!(%user_id, %default_type, "stored payment data");
        Ok(())
    }
}
