use axum::extract::Path;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::database::{
    self,
    models::{blog::BlogFields, Blog},
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct BlogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

/// GET /api/blogs
pub async fn list() -> ApiResult<Vec<Blog>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Blog::get_all(&pool).await?))
}

/// GET /api/blogs/:id
pub async fn get(Path(id): Path<i64>) -> ApiResult<Blog> {
    let pool = database::pool()?;
    let blog = Blog::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog not found"))?;
    Ok(ApiResponse::success(blog))
}

/// POST /api/blogs
pub async fn create(Json(body): Json<BlogRequest>) -> ApiResult<Blog> {
    let fields = required_fields(body)?;
    let pool = database::pool()?;
    let blog = Blog::create(&pool, fields).await?;
    info!("blog {} created", blog.id);
    Ok(ApiResponse::created(blog))
}

/// PUT /api/blogs/:id (omitted fields keep their current values)
pub async fn update(Path(id): Path<i64>, Json(body): Json<BlogRequest>) -> ApiResult<Blog> {
    let pool = database::pool()?;
    let existing = Blog::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog not found"))?;

    let fields = BlogFields {
        title: non_blank(body.title).unwrap_or(existing.title),
        description: non_blank(body.description).unwrap_or(existing.description),
        content: non_blank(body.content).unwrap_or(existing.content),
        seo_title: non_blank(body.seo_title).or(existing.seo_title),
        seo_description: non_blank(body.seo_description).or(existing.seo_description),
    };

    Ok(ApiResponse::success(Blog::update(&pool, id, fields).await?))
}

/// DELETE /api/blogs/:id
pub async fn delete(Path(id): Path<i64>) -> ApiResult<()> {
    let pool = database::pool()?;
    if !Blog::delete(&pool, id).await? {
        return Err(ApiError::not_found("Blog not found"));
    }
    info!("blog {} deleted", id);
    Ok(ApiResponse::message("Blog deleted successfully"))
}

/// POST /api/blogs/:id/like: public, unauthenticated, unconditional.
pub async fn like(Path(id): Path<i64>) -> ApiResult<Blog> {
    let pool = database::pool()?;
    let blog = Blog::like(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog not found"))?;
    Ok(ApiResponse::success(blog))
}

fn required_fields(body: BlogRequest) -> Result<BlogFields, ApiError> {
    let missing = || ApiError::validation("Please provide title, description and content");
    Ok(BlogFields {
        title: non_blank(body.title).ok_or_else(missing)?,
        description: non_blank(body.description).ok_or_else(missing)?,
        content: non_blank(body.content).ok_or_else(missing)?,
        seo_title: non_blank(body.seo_title),
        seo_description: non_blank(body.seo_description),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
