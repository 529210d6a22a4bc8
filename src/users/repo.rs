use axum::async_trait;
use sea_query_binder::SqlxValues;
use sqlx::PgPool;

use crate::users::{
    query::{Dialect, Statement},
    repo_types::UserRow,
};

/// Runs built statements against the store. One call is one round trip.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Placeholder convention the statements must be rendered with.
    fn dialect(&self) -> Dialect;

    /// Runs an insert that returns the generated id as its only column.
    async fn fetch_id(&self, stmt: Statement) -> Result<i64, sqlx::Error>;

    /// Runs a select that matches at most one user.
    async fn fetch_user(&self, stmt: Statement) -> Result<Option<UserRow>, sqlx::Error>;

    /// Runs a statement without a result set and returns the affected row count.
    async fn execute(&self, stmt: Statement) -> Result<u64, sqlx::Error>;
}

/// [`StatementExecutor`] over a shared Postgres pool. A connection is
/// checked out for each call and returned when it finishes.
#[derive(Clone)]
pub struct PoolExecutor {
    db: PgPool,
}

impl PoolExecutor {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatementExecutor for PoolExecutor {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn fetch_id(&self, stmt: Statement) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar_with::<_, i64, _>(&stmt.sql, SqlxValues(stmt.values))
            .fetch_one(&self.db)
            .await
    }

    async fn fetch_user(&self, stmt: Statement) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as_with::<_, UserRow, _>(&stmt.sql, SqlxValues(stmt.values))
            .fetch_optional(&self.db)
            .await
    }

    async fn execute(&self, stmt: Statement) -> Result<u64, sqlx::Error> {
        let done = sqlx::query_with(&stmt.sql, SqlxValues(stmt.values))
            .execute(&self.db)
            .await?;
        Ok(done.rows_affected())
    }
}
