use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Testimonial {
    pub id: i64,
    pub client_name: String,
    pub position: String,
    pub company: String,
    pub quote: String,
    pub rating: i32,
    pub image: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TestimonialFields {
    pub client_name: String,
    pub position: String,
    pub company: String,
    pub quote: String,
    pub rating: i32,
    pub image: Option<String>,
    pub featured: bool,
}

/// Ratings outside [1,5] are clamped rather than rejected; the schema itself
/// carries no check constraint.
pub fn clamp_rating(rating: i32) -> i32 {
    rating.clamp(1, 5)
}

const COLUMNS: &str =
    "id, client_name, position, company, quote, rating, image, featured, created_at";

impl Testimonial {
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Testimonial>, DatabaseError> {
        let rows = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {COLUMNS} FROM testimonials ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_featured(pool: &PgPool) -> Result<Vec<Testimonial>, DatabaseError> {
        let rows = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {COLUMNS} FROM testimonials WHERE featured ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Testimonial>, DatabaseError> {
        let row = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {COLUMNS} FROM testimonials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn create(
        pool: &PgPool,
        fields: TestimonialFields,
    ) -> Result<Testimonial, DatabaseError> {
        let row = sqlx::query_as::<_, Testimonial>(&format!(
            r#"
            INSERT INTO testimonials (client_name, position, company, quote, rating, image, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&fields.client_name)
        .bind(&fields.position)
        .bind(&fields.company)
        .bind(&fields.quote)
        .bind(clamp_rating(fields.rating))
        .bind(&fields.image)
        .bind(fields.featured)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        fields: TestimonialFields,
    ) -> Result<Testimonial, DatabaseError> {
        let row = sqlx::query_as::<_, Testimonial>(&format!(
            r#"
            UPDATE testimonials SET
                client_name = $1, position = $2, company = $3, quote = $4,
                rating = $5, image = $6, featured = $7
            WHERE id = $8
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&fields.client_name)
        .bind(&fields.position)
        .bind(&fields.company)
        .bind(&fields.quote)
        .bind(clamp_rating(fields.rating))
        .bind(&fields.image)
        .bind(fields.featured)
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratings_are_clamped_to_range() {
        assert_eq!(clamp_rating(0), 1);
        assert_eq!(clamp_rating(-3), 1);
        assert_eq!(clamp_rating(1), 1);
        assert_eq!(clamp_rating(3), 3);
        assert_eq!(clamp_rating(5), 5);
        assert_eq!(clamp_rating(17), 5);
    }
}
