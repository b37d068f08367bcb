use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PageVisit {
    pub page_url: String,
    pub visits: i64,
    pub last_visited: DateTime<Utc>,
}

impl PageVisit {
    /// Atomic per-page counter. The upsert runs as one statement, so
    /// concurrent hits on the same URL serialize in the database and no
    /// increment is lost.
    pub async fn increment(pool: &PgPool, page_url: &str) -> Result<PageVisit, DatabaseError> {
        let row = sqlx::query_as::<_, PageVisit>(
            r#"
            INSERT INTO analytics (page_url, visits, last_visited)
            VALUES ($1, 1, now())
            ON CONFLICT (page_url)
            DO UPDATE SET visits = analytics.visits + 1, last_visited = now()
            RETURNING page_url, visits, last_visited
            "#,
        )
        .bind(page_url)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn get_all(pool: &PgPool) -> Result<Vec<PageVisit>, DatabaseError> {
        let rows = sqlx::query_as::<_, PageVisit>(
            "SELECT page_url, visits, last_visited FROM analytics ORDER BY visits DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
