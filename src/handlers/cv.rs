use axum::extract::{Multipart, Path};
use tracing::info;

use crate::database::{self, models::Cv};
use crate::error::ApiError;
use crate::handlers::form::FormData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::storage::{self, UploadKind};

/// GET /api/cv
pub async fn list() -> ApiResult<Vec<Cv>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Cv::get_all(&pool).await?))
}

/// GET /api/cv/:id
pub async fn get(Path(id): Path<i64>) -> ApiResult<Cv> {
    let pool = database::pool()?;
    let cv = Cv::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("CV not found"))?;
    Ok(ApiResponse::success(cv))
}

/// POST /api/cv (multipart; `title` text and `cvFile` PDF required)
pub async fn create(multipart: Multipart) -> ApiResult<Cv> {
    let form = FormData::read(multipart).await?;

    let title = form.require_text("title")?.to_string();
    let file = form
        .file("cvFile")
        .ok_or_else(|| ApiError::validation("cvFile is required"))?;

    let file_path = storage::store(
        UploadKind::CvDocument,
        &file.filename,
        file.content_type.as_deref(),
        &file.bytes,
        true,
    )
    .await?;

    let pool = database::pool()?;
    match Cv::create(&pool, &title, &file_path).await {
        Ok(cv) => {
            info!("cv {} created", cv.id);
            Ok(ApiResponse::created(cv))
        }
        Err(err) => {
            storage::remove(&file_path).await;
            Err(err.into())
        }
    }
}

/// PUT /api/cv/:id (multipart; new `cvFile` replaces and deletes the old one)
pub async fn update(Path(id): Path<i64>, multipart: Multipart) -> ApiResult<Cv> {
    let pool = database::pool()?;
    let existing = Cv::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("CV not found"))?;

    let form = FormData::read(multipart).await?;
    let title = form
        .text("title")
        .map(str::to_string)
        .unwrap_or(existing.title);

    let (file_path, new_path) = match form.file("cvFile") {
        Some(file) => {
            let path = storage::store(
                UploadKind::CvDocument,
                &file.filename,
                file.content_type.as_deref(),
                &file.bytes,
                true,
            )
            .await?;
            (path.clone(), Some(path))
        }
        None => (existing.file_path.clone(), None),
    };

    match Cv::update(&pool, id, &title, &file_path).await {
        Ok(cv) => {
            if new_path.is_some() {
                storage::remove(&existing.file_path).await;
            }
            Ok(ApiResponse::success(cv))
        }
        Err(err) => {
            if let Some(path) = new_path {
                storage::remove(&path).await;
            }
            Err(err.into())
        }
    }
}

/// DELETE /api/cv/:id
pub async fn delete(Path(id): Path<i64>) -> ApiResult<()> {
    let pool = database::pool()?;
    let cv = Cv::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("CV not found"))?;

    if !Cv::delete(&pool, id).await? {
        return Err(ApiError::not_found("CV not found"));
    }

    storage::remove(&cv.file_path).await;
    info!("cv {} deleted", id);
    Ok(ApiResponse::message("CV deleted successfully"))
}
