//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use payout_types::{
    Invoicing, PaymentDataRepository, PayoutType, RepoError, User, UserId, UserStore,
};

use crate::types::{DbPaymentData, DbUser};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_tables_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl UserStore for PostgresRepo {
    async fn update_user(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO users (id, first_name, last_name, email)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (id) DO UPDATE SET
                   first_name = EXCLUDED.first_name,
                   last_name = EXCLUDED.last_name,
                   email = EXCLUDED.email,
                   updated_at = NOW()"#,
        )
        .bind(user.id.into_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_user_with_roles(&self, id: UserId) -> Result<User, RepoError> {
        let row: Option<DbUser> =
            sqlx::query_as(r#"SELECT first_name, last_name, email FROM users WHERE id = $1"#)
                .bind(id.into_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        let row = row.ok_or(RepoError::NotFound)?;

        let roles: Vec<String> =
            sqlx::query_scalar(r#"SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role"#)
                .bind(id.into_uuid())
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
impl PaymentDataRepository for PostgresRepo {
    async fn get_user_payment_data(
        &self,
        user_id: UserId,
    ) -> Result<Option<Invoicing>, RepoError> {
        let row: Option<DbPaymentData> = sqlx::query_as(
            r#"SELECT payment_account::text AS payment_account, default_type
               FROM user_payment_data WHERE user_id = $1"#,
        )
        .bind(user_id.into_uuid())
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
            r#"INSERT INTO user_payment_data (user_id, payment_account, default_type)
               VALUES ($1, $2::jsonb, $3)
               ON CONFLICT (user_id) DO UPDATE SET
                   payment_account = EXCLUDED.payment_account,
                   default_type = EXCLUDED.default_type,
                   updated_at = NOW()"#,
        )
        .bind(user_id.into_uuid())
        .bind(payment_account)
        .bind(default_type.alias())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        tracing::debug!(%user_id, %default_type, "stored payment data");
        Ok(())
    }
}
