use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cv {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl Cv {
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Cv>, DatabaseError> {
        let rows = sqlx::query_as::<_, Cv>(
            "SELECT id, title, file_path, created_at FROM cv ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Cv>, DatabaseError> {
        let row = sqlx::query_as::<_, Cv>(
            "SELECT id, title, file_path, created_at FROM cv WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn create(pool: &PgPool, title: &str, file_path: &str) -> Result<Cv, DatabaseError> {
        let row = sqlx::query_as::<_, Cv>(
            r#"
            INSERT INTO cv (title, file_path)
            VALUES ($1, $2)
            RETURNING id, title, file_path, created_at
            "#,
        )
        .bind(title)
        .bind(file_path)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        title: &str,
        file_path: &str,
    ) -> Result<Cv, DatabaseError> {
        let row = sqlx::query_as::<_, Cv>(
            r#"
            UPDATE cv SET title = $1, file_path = $2
            WHERE id = $3
            RETURNING id, title, file_path, created_at
            "#,
        )
        .bind(title)
        .bind(file_path)
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM cv WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
