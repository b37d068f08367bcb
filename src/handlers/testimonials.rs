use axum::extract::{Multipart, Path};
use tracing::info;

use crate::database::{
    self,
    models::{testimonial::TestimonialFields, Testimonial},
};
use crate::error::ApiError;
use crate::handlers::form::FormData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::storage::{self, UploadKind};

const DEFAULT_RATING: i32 = 5;

/// GET /api/testimonials
pub async fn list() -> ApiResult<Vec<Testimonial>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Testimonial::get_all(&pool).await?))
}

/// GET /api/testimonials/featured
pub async fn featured() -> ApiResult<Vec<Testimonial>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Testimonial::get_featured(&pool).await?))
}

/// GET /api/testimonials/:id
pub async fn get(Path(id): Path<i64>) -> ApiResult<Testimonial> {
    let pool = database::pool()?;
    let testimonial = Testimonial::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Testimonial not found"))?;
    Ok(ApiResponse::success(testimonial))
}

/// POST /api/testimonials (multipart)
pub async fn create(multipart: Multipart) -> ApiResult<Testimonial> {
    let form = FormData::read(multipart).await?;

    let fields_base = (
        form.require_text("client_name")?.to_string(),
        form.require_text("position")?.to_string(),
        form.require_text("company")?.to_string(),
        form.require_text("quote")?.to_string(),
    );

    let image = match form.file("image") {
        Some(file) => Some(
            storage::store(
                UploadKind::TestimonialImage,
                &file.filename,
                file.content_type.as_deref(),
                &file.bytes,
                true,
            )
            .await?,
        ),
        None => None,
    };

    let (client_name, position, company, quote) = fields_base;
    let fields = TestimonialFields {
        client_name,
        position,
        company,
        quote,
        rating: form.int("rating").unwrap_or(DEFAULT_RATING),
        image: image.clone(),
        featured: form.flag("featured").unwrap_or(false),
    };

    let pool = database::pool()?;
    match Testimonial::create(&pool, fields).await {
        Ok(testimonial) => {
            info!("testimonial {} created", testimonial.id);
            Ok(ApiResponse::created(testimonial))
        }
        Err(err) => {
            if let Some(path) = image {
                storage::remove(&path).await;
            }
            Err(err.into())
        }
    }
}

/// PUT /api/testimonials/:id (multipart, everything optional)
pub async fn update(Path(id): Path<i64>, multipart: Multipart) -> ApiResult<Testimonial> {
    let pool = database::pool()?;
    let existing = Testimonial::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Testimonial not found"))?;

    let form = FormData::read(multipart).await?;

    let (image, new_path, replaced) = match form.file("image") {
        Some(file) => {
            let path = storage::store(
                UploadKind::TestimonialImage,
                &file.filename,
                file.content_type.as_deref(),
                &file.bytes,
                true,
            )
            .await?;
            (Some(path.clone()), Some(path), existing.image.clone())
        }
        None => (existing.image.clone(), None, None),
    };

    let fields = TestimonialFields {
        client_name: form
            .text("client_name")
            .map(str::to_string)
            .unwrap_or(existing.client_name),
        position: form
            .text("position")
            .map(str::to_string)
            .unwrap_or(existing.position),
        company: form
            .text("company")
            .map(str::to_string)
            .unwrap_or(existing.company),
        quote: form
            .text("quote")
            .map(str::to_string)
            .unwrap_or(existing.quote),
        rating: form.int("rating").unwrap_or(existing.rating),
        image,
        featured: form.flag("featured").unwrap_or(existing.featured),
    };

    match Testimonial::update(&pool, id, fields).await {
        Ok(testimonial) => {
            if let Some(old) = replaced {
                storage::remove(&old).await;
            }
            Ok(ApiResponse::success(testimonial))
        }
        Err(err) => {
            if let Some(path) = new_path {
                storage::remove(&path).await;
            }
            Err(err.into())
        }
    }
}

/// DELETE /api/testimonials/:id
pub async fn delete(Path(id): Path<i64>) -> ApiResult<()> {
    let pool = database::pool()?;
    let testimonial = Testimonial::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Testimonial not found"))?;

    if !Testimonial::delete(&pool, id).await? {
        return Err(ApiError::not_found("Testimonial not found"));
    }

    if let Some(image) = &testimonial.image {
        storage::remove(image).await;
    }

    info!("testimonial {} deleted", id);
    Ok(ApiResponse::message("Testimonial deleted successfully"))
}
