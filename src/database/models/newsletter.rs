use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscriber {
    pub async fn subscribe(pool: &PgPool, email: &str) -> Result<Subscriber, DatabaseError> {
        let result = sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO newsletter_subscribers (email)
            VALUES ($1)
            RETURNING id, email, subscribed_at
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await;

        match result {
            Ok(subscriber) => Ok(subscriber),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                DatabaseError::Conflict("Email is already subscribed".to_string()),
            ),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn get_all(pool: &PgPool) -> Result<Vec<Subscriber>, DatabaseError> {
        let rows = sqlx::query_as::<_, Subscriber>(
            "SELECT id, email, subscribed_at FROM newsletter_subscribers ORDER BY subscribed_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
