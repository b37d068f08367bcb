use axum::extract::{Multipart, Path};
use tracing::info;

use crate::database::{
    self,
    models::{project::ProjectFields, Project},
};
use crate::error::ApiError;
use crate::handlers::form::FormData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::storage::{self, UploadKind};

const MAX_GALLERY_IMAGES: usize = 10;

/// GET /api/projects
pub async fn list() -> ApiResult<Vec<Project>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Project::get_all(&pool).await?))
}

/// GET /api/projects/featured
pub async fn featured() -> ApiResult<Vec<Project>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Project::get_featured(&pool).await?))
}

/// GET /api/projects/categories
pub async fn categories() -> ApiResult<Vec<String>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Project::categories(&pool).await?))
}

/// GET /api/projects/category/:category
pub async fn by_category(Path(category): Path<String>) -> ApiResult<Vec<Project>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(
        Project::get_by_category(&pool, &category).await?,
    ))
}

/// GET /api/projects/:id
pub async fn get(Path(id): Path<i64>) -> ApiResult<Project> {
    let pool = database::pool()?;
    let project = Project::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(ApiResponse::success(project))
}

/// POST /api/projects (multipart)
pub async fn create(multipart: Multipart) -> ApiResult<Project> {
    let form = FormData::read(multipart).await?;

    let title = form.require_text("title")?.to_string();
    let category = form.require_text("category")?.to_string();

    let gallery_files = form.files("galleryImages");
    if gallery_files.len() > MAX_GALLERY_IMAGES {
        return Err(ApiError::validation(format!(
            "A maximum of {} gallery images is allowed",
            MAX_GALLERY_IMAGES
        )));
    }

    let mut stored: Vec<String> = Vec::new();

    let image_main = match form.file("mainImage") {
        Some(file) => {
            let path = storage::store(
                UploadKind::ProjectImage,
                &file.filename,
                file.content_type.as_deref(),
                &file.bytes,
                false,
            )
            .await?;
            stored.push(path.clone());
            Some(path)
        }
        None => None,
    };

    let mut gallery: Vec<String> = Vec::new();
    for file in gallery_files {
        match storage::store(
            UploadKind::ProjectImage,
            &file.filename,
            file.content_type.as_deref(),
            &file.bytes,
            true,
        )
        .await
        {
            Ok(path) => {
                stored.push(path.clone());
                gallery.push(path);
            }
            Err(err) => {
                storage::discard(&stored).await;
                return Err(err);
            }
        }
    }

    let fields = ProjectFields {
        title,
        category,
        description: form.text("description").map(str::to_string),
        client: form.text("client").map(str::to_string),
        location: form.text("location").map(str::to_string),
        year: form.int("year"),
        featured: form.flag("featured").unwrap_or(false),
        image_main,
        gallery,
    };

    let pool = database::pool()?;
    match Project::create(&pool, fields).await {
        Ok(project) => {
            info!("project {} created", project.id);
            Ok(ApiResponse::created(project))
        }
        Err(err) => {
            storage::discard(&stored).await;
            Err(err.into())
        }
    }
}

/// PUT /api/projects/:id (multipart)
///
/// Fields and files are all optional; anything omitted keeps its current
/// value. New files replace (and afterwards delete) the old ones.
pub async fn update(Path(id): Path<i64>, multipart: Multipart) -> ApiResult<Project> {
    let pool = database::pool()?;
    let existing = Project::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    let form = FormData::read(multipart).await?;

    let gallery_files = form.files("galleryImages");
    if gallery_files.len() > MAX_GALLERY_IMAGES {
        return Err(ApiError::validation(format!(
            "A maximum of {} gallery images is allowed",
            MAX_GALLERY_IMAGES
        )));
    }

    let mut stored: Vec<String> = Vec::new();
    let mut replaced: Vec<String> = Vec::new();

    let image_main = match form.file("mainImage") {
        Some(file) => {
            let path = storage::store(
                UploadKind::ProjectImage,
                &file.filename,
                file.content_type.as_deref(),
                &file.bytes,
                false,
            )
            .await?;
            stored.push(path.clone());
            if let Some(old) = &existing.image_main {
                replaced.push(old.clone());
            }
            Some(path)
        }
        None => existing.image_main.clone(),
    };

    let gallery = if gallery_files.is_empty() {
        existing.gallery.clone()
    } else {
        let mut gallery = Vec::new();
        for file in gallery_files {
            match storage::store(
                UploadKind::ProjectImage,
                &file.filename,
                file.content_type.as_deref(),
                &file.bytes,
                true,
            )
            .await
            {
                Ok(path) => {
                    stored.push(path.clone());
                    gallery.push(path);
                }
                Err(err) => {
                    storage::discard(&stored).await;
                    return Err(err);
                }
            }
        }
        replaced.extend(existing.gallery.iter().cloned());
        gallery
    };

    let fields = ProjectFields {
        title: form
            .text("title")
            .map(str::to_string)
            .unwrap_or(existing.title),
        category: form
            .text("category")
            .map(str::to_string)
            .unwrap_or(existing.category),
        description: form
            .text("description")
            .map(str::to_string)
            .or(existing.description),
        client: form.text("client").map(str::to_string).or(existing.client),
        location: form
            .text("location")
            .map(str::to_string)
            .or(existing.location),
        year: form.int("year").or(existing.year),
        featured: form.flag("featured").unwrap_or(existing.featured),
        image_main,
        gallery,
    };

    match Project::update(&pool, id, fields).await {
        Ok(project) => {
            // Row committed; old files are now orphans.
            storage::discard(&replaced).await;
            Ok(ApiResponse::success(project))
        }
        Err(err) => {
            storage::discard(&stored).await;
            Err(err.into())
        }
    }
}

/// DELETE /api/projects/:id
///
/// The row goes first; file unlinks afterwards are best-effort so a failed
/// unlink can never resurrect a half-deleted project.
pub async fn delete(Path(id): Path<i64>) -> ApiResult<()> {
    let pool = database::pool()?;
    let project = Project::get_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if !Project::delete(&pool, id).await? {
        return Err(ApiError::not_found("Project not found"));
    }

    if let Some(main) = &project.image_main {
        storage::remove(main).await;
    }
    storage::discard(&project.gallery).await;

    info!("project {} deleted", id);
    Ok(ApiResponse::message("Project deleted successfully"))
}
