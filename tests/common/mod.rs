use std::{env, sync::Arc};

use auth_api::users::{repo::PoolExecutor, UserService};
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Returns `None` when no test database is configured, so the caller can skip.
pub async fn provision() -> Option<(UserService, PgPool)> {
    let Ok(url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to postgres for integration tests");

    create_schema(&pool).await;
    reset_tables(&pool).await;

    let service = UserService::new(Arc::new(PoolExecutor::new(pool.clone())));
    Some((service, pool))
}

async fn create_schema(pool: &PgPool) {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id         BIGSERIAL PRIMARY KEY,
            user_name       TEXT NOT NULL,
            user_email      TEXT NOT NULL UNIQUE,
            user_password   TEXT NOT NULL,
            user_role       INTEGER NOT NULL,
            user_created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            user_updated_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("failed to create users table for integration tests");
}

pub async fn reset_tables(pool: &PgPool) {
    sqlx::query("TRUNCATE TABLE users RESTART IDENTITY;")
        .execute(pool)
        .await
        .expect("failed to truncate tables for test isolation");
}

pub async fn stored_password(pool: &PgPool, id: i64) -> String {
    sqlx::query_scalar("SELECT user_password FROM users WHERE user_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("failed to read stored password")
}
