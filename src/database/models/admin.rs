use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

/// Public shape of an admin account. The password hash never leaves the
/// credentials type below.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Full row including the bcrypt hash, fetched only for login.
#[derive(Debug, Clone, FromRow)]
pub struct AdminCredentials {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Admin>, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, email FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(admin)
    }

    pub async fn get_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<AdminCredentials>, DatabaseError> {
        let admin = sqlx::query_as::<_, AdminCredentials>(
            "SELECT id, username, email, password, created_at FROM admins WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(admin)
    }

    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Admin, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
        Ok(admin)
    }

    /// Update username/email. The UNIQUE constraint on email is the single
    /// arbiter; its violation maps to a conflict so concurrent writers
    /// cannot slip past a pre-check.
    pub async fn update_profile(
        pool: &PgPool,
        id: i64,
        username: &str,
        email: &str,
    ) -> Result<Admin, DatabaseError> {
        let result = sqlx::query_as::<_, Admin>(
            r#"
            UPDATE admins SET username = $1, email = $2, updated_at = now()
            WHERE id = $3
            RETURNING id, username, email
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(id)
        .fetch_one(pool)
        .await;

        match result {
            Ok(admin) => Ok(admin),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                DatabaseError::Conflict("Email already exists".to_string()),
            ),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn update_password(
        pool: &PgPool,
        id: i64,
        password_hash: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE admins SET password = $1, updated_at = now() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Idempotent seed used by the seed-admin binary: insert the account or
    /// refresh its credentials when the email already exists.
    pub async fn upsert_by_email(
        pool: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Admin, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (username, email, password)
            VALUES ($1, $2, $3)
            ON CONFLICT (email)
            DO UPDATE SET username = EXCLUDED.username, password = EXCLUDED.password, updated_at = now()
            RETURNING id, username, email
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
        Ok(admin)
    }
}
