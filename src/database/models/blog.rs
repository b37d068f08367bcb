use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Rich HTML body.
    pub content: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BlogFields {
    pub title: String,
    pub description: String,
    pub content: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

/// Blank SEO fields fall back to the display title/description.
pub fn seo_or_default(seo: Option<String>, fallback: &str) -> String {
    match seo {
        Some(s) if !s.trim().is_empty() => s,
        _ => fallback.to_string(),
    }
}

const COLUMNS: &str =
    "id, title, description, content, seo_title, seo_description, likes, created_at, updated_at";

impl Blog {
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Blog>, DatabaseError> {
        let rows = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {COLUMNS} FROM blogs ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Blog>, DatabaseError> {
        let row = sqlx::query_as::<_, Blog>(&format!("SELECT {COLUMNS} FROM blogs WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn create(pool: &PgPool, fields: BlogFields) -> Result<Blog, DatabaseError> {
        let seo_title = seo_or_default(fields.seo_title, &fields.title);
        let seo_description = seo_or_default(fields.seo_description, &fields.description);

        let row = sqlx::query_as::<_, Blog>(&format!(
            r#"
            INSERT INTO blogs (title, description, content, seo_title, seo_description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.content)
        .bind(seo_title)
        .bind(seo_description)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn update(pool: &PgPool, id: i64, fields: BlogFields) -> Result<Blog, DatabaseError> {
        let seo_title = seo_or_default(fields.seo_title, &fields.title);
        let seo_description = seo_or_default(fields.seo_description, &fields.description);

        let row = sqlx::query_as::<_, Blog>(&format!(
            r#"
            UPDATE blogs SET
                title = $1, description = $2, content = $3,
                seo_title = $4, seo_description = $5, updated_at = now()
            WHERE id = $6
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.content)
        .bind(seo_title)
        .bind(seo_description)
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unconditional like counter; any caller may increment any number of times.
    pub async fn like(pool: &PgPool, id: i64) -> Result<Option<Blog>, DatabaseError> {
        let row = sqlx::query_as::<_, Blog>(&format!(
            "UPDATE blogs SET likes = likes + 1 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seo_defaults_apply_when_blank() {
        assert_eq!(seo_or_default(None, "Title"), "Title");
        assert_eq!(seo_or_default(Some(String::new()), "Title"), "Title");
        assert_eq!(seo_or_default(Some("   ".to_string()), "Title"), "Title");
        assert_eq!(
            seo_or_default(Some("Custom".to_string()), "Title"),
            "Custom"
        );
    }
}
