pub mod models;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database pool not initialized")]
    NotInitialized,

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            other => DatabaseError::Sqlx(other),
        }
    }
}

static DB_POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Connect the shared pool and bring the schema up to date. Called once at
/// startup; subsequent calls are no-ops.
pub async fn init_pool() -> Result<PgPool, DatabaseError> {
    let db = &config::config().database;

    let pool = DB_POOL
        .get_or_try_init(|| async {
            let pool = PgPoolOptions::new()
                .max_connections(db.max_connections)
                .acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
                .connect(&db.connection_url())
                .await?;

            run_migrations(&pool).await?;
            info!(max_connections = db.max_connections, "database pool ready");
            Ok::<_, sqlx::Error>(pool)
        })
        .await?;

    Ok(pool.clone())
}

/// Shared pool handle for handlers and middleware.
pub fn pool() -> Result<PgPool, DatabaseError> {
    DB_POOL
        .get()
        .cloned()
        .ok_or(DatabaseError::NotInitialized)
}

/// Pings the pool to ensure connectivity
pub async fn health_check() -> Result<(), DatabaseError> {
    let pool = pool()?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(())
}

/// Idempotent schema bootstrap. Tables carry surrogate bigserial ids and
/// creation timestamps; `settings` and `analytics` are keyed by their
/// natural text keys instead.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("running schema bootstrap");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            client TEXT,
            location TEXT,
            year INTEGER,
            featured BOOLEAN NOT NULL DEFAULT false,
            image_main TEXT,
            gallery JSONB,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS testimonials (
            id BIGSERIAL PRIMARY KEY,
            client_name TEXT NOT NULL,
            position TEXT NOT NULL,
            company TEXT NOT NULL,
            quote TEXT NOT NULL,
            rating INTEGER NOT NULL DEFAULT 5,
            image TEXT,
            featured BOOLEAN NOT NULL DEFAULT false,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cv (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            file_path TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blogs (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            content TEXT NOT NULL,
            seo_title TEXT,
            seo_description TEXT,
            likes INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS newsletter_subscribers (
            id BIGSERIAL PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            subscribed_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analytics (
            page_url TEXT PRIMARY KEY,
            visits BIGINT NOT NULL DEFAULT 0,
            last_visited TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
