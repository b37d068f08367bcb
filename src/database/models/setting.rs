use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::database::DatabaseError;

/// Settings are loose key/value rows collapsed into one object for clients.
pub struct Setting;

/// Fold raw rows into the flattened settings aggregate.
pub fn aggregate(rows: Vec<(String, String)>) -> Map<String, Value> {
    rows.into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

impl Setting {
    pub async fn get_all(pool: &PgPool) -> Result<Map<String, Value>, DatabaseError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
            .fetch_all(pool)
            .await?;
        Ok(aggregate(rows))
    }

    pub async fn get_by_key(pool: &PgPool, key: &str) -> Result<Option<String>, DatabaseError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(v,)| v))
    }

    pub async fn update(pool: &PgPool, key: &str, value: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Upsert every key inside a single transaction so a partial batch never
    /// becomes visible.
    pub async fn update_many(
        pool: &PgPool,
        entries: &[(String, String)],
    ) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO settings (key, value) VALUES ($1, $2)
                ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_folds_rows_into_object() {
        let rows = vec![
            ("site_title".to_string(), "Atelier".to_string()),
            ("contact_email".to_string(), "hello@example.com".to_string()),
        ];
        let map = aggregate(rows);
        assert_eq!(map.len(), 2);
        assert_eq!(map["site_title"], "Atelier");
        assert_eq!(map["contact_email"], "hello@example.com");
    }

    #[test]
    fn aggregate_of_nothing_is_empty() {
        assert!(aggregate(vec![]).is_empty());
    }
}
