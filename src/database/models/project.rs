use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub client: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub featured: bool,
    pub image_main: Option<String>,
    /// Ordered list of server-relative gallery image paths.
    pub gallery: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Gallery is stored as a JSONB array; the row type keeps the sqlx wrapper
// out of the public shape.
#[derive(FromRow)]
struct ProjectRow {
    id: i64,
    title: String,
    category: String,
    description: Option<String>,
    client: Option<String>,
    location: Option<String>,
    year: Option<i32>,
    featured: bool,
    image_main: Option<String>,
    gallery: Option<Json<Vec<String>>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            category: row.category,
            description: row.description,
            client: row.client,
            location: row.location,
            year: row.year,
            featured: row.featured,
            image_main: row.image_main,
            gallery: row.gallery.map(|j| j.0).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Field set shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct ProjectFields {
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub client: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub featured: bool,
    pub image_main: Option<String>,
    pub gallery: Vec<String>,
}

const COLUMNS: &str =
    "id, title, category, description, client, location, year, featured, image_main, gallery, created_at, updated_at";

impl Project {
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Project>, DatabaseError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    pub async fn get_featured(pool: &PgPool) -> Result<Vec<Project>, DatabaseError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE featured ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Project>, DatabaseError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Project::from))
    }

    pub async fn get_by_category(
        pool: &PgPool,
        category: &str,
    ) -> Result<Vec<Project>, DatabaseError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE category = $1 ORDER BY created_at DESC"
        ))
        .bind(category)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    /// Distinct non-empty categories currently in use, ascending.
    pub async fn categories(pool: &PgPool) -> Result<Vec<String>, DatabaseError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM projects WHERE category != '' ORDER BY category ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    pub async fn create(pool: &PgPool, fields: ProjectFields) -> Result<Project, DatabaseError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (title, category, description, client, location, year, featured, image_main, gallery)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(&fields.category)
        .bind(&fields.description)
        .bind(&fields.client)
        .bind(&fields.location)
        .bind(fields.year)
        .bind(fields.featured)
        .bind(&fields.image_main)
        .bind(Json(&fields.gallery))
        .fetch_one(pool)
        .await?;
        Ok(row.into())
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        fields: ProjectFields,
    ) -> Result<Project, DatabaseError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects SET
                title = $1, category = $2, description = $3, client = $4,
                location = $5, year = $6, featured = $7, image_main = $8,
                gallery = $9, updated_at = now()
            WHERE id = $10
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(&fields.category)
        .bind(&fields.description)
        .bind(&fields.client)
        .bind(&fields.location)
        .bind(fields.year)
        .bind(fields.featured)
        .bind(&fields.image_main)
        .bind(Json(&fields.gallery))
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(row.into())
    }

    /// Returns false when no row matched.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
