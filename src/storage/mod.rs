//! Category-partitioned file store for user uploads.
//!
//! Controllers hand this module raw multipart bytes; it validates them
//! against the per-category allow-list, writes them under the configured
//! uploads root and returns the server-relative path that gets persisted.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;

pub const URL_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ProjectImage,
    TestimonialImage,
    CvDocument,
}

impl UploadKind {
    pub fn subdir(&self) -> &'static str {
        match self {
            UploadKind::ProjectImage => "projects",
            UploadKind::TestimonialImage => "testimonials",
            UploadKind::CvDocument => "cv",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            UploadKind::ProjectImage => "project",
            UploadKind::TestimonialImage => "testimonial",
            UploadKind::CvDocument => "cv",
        }
    }

    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::ProjectImage | UploadKind::TestimonialImage => {
                &["jpeg", "jpg", "png", "webp"]
            }
            UploadKind::CvDocument => &["pdf"],
        }
    }

    fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            UploadKind::ProjectImage | UploadKind::TestimonialImage => {
                &["image/jpeg", "image/jpg", "image/png", "image/webp"]
            }
            UploadKind::CvDocument => &["application/pdf"],
        }
    }

    pub fn max_size_bytes(&self) -> usize {
        match self {
            UploadKind::ProjectImage => 10 * 1024 * 1024,
            UploadKind::TestimonialImage => 5 * 1024 * 1024,
            UploadKind::CvDocument => 10 * 1024 * 1024,
        }
    }

    fn type_error(&self) -> &'static str {
        match self {
            UploadKind::ProjectImage | UploadKind::TestimonialImage => {
                "Only image files (JPEG, JPG, PNG, WEBP) are allowed"
            }
            UploadKind::CvDocument => "Only PDF files are allowed",
        }
    }
}

/// Create the uploads root and its category subdirectories at startup.
pub async fn ensure_upload_dirs() -> std::io::Result<()> {
    let root = PathBuf::from(&config::config().uploads.root_dir);
    for subdir in ["projects", "testimonials", "cv"] {
        let dir = root.join(subdir);
        if !dir.exists() {
            tokio::fs::create_dir_all(&dir).await?;
            info!("created upload directory {}", dir.display());
        }
    }
    Ok(())
}

fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Magic-byte sniff so a renamed file cannot smuggle a wrong type through
/// the extension check.
fn content_matches(kind: UploadKind, bytes: &[u8]) -> bool {
    match kind {
        UploadKind::ProjectImage | UploadKind::TestimonialImage => matches!(
            bytes,
            // JPEG / PNG / WebP signatures
            [0xFF, 0xD8, 0xFF, ..]
                | [0x89, 0x50, 0x4E, 0x47, ..]
                | [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..]
        ),
        UploadKind::CvDocument => bytes.starts_with(b"%PDF"),
    }
}

pub fn validate(
    kind: UploadKind,
    filename: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<(), ApiError> {
    let ext = extension_of(filename).ok_or_else(|| ApiError::validation(kind.type_error()))?;
    if !kind.allowed_extensions().contains(&ext.as_str()) {
        return Err(ApiError::validation(kind.type_error()));
    }

    if let Some(mime) = content_type {
        if !kind.allowed_mime_types().contains(&mime) {
            return Err(ApiError::validation(kind.type_error()));
        }
    }

    if bytes.is_empty() {
        return Err(ApiError::validation("Uploaded file is empty"));
    }

    if !content_matches(kind, bytes) {
        return Err(ApiError::validation(kind.type_error()));
    }

    if bytes.len() > kind.max_size_bytes() {
        return Err(ApiError::payload_too_large(format!(
            "File too large. Maximum size is {}MB.",
            kind.max_size_bytes() / (1024 * 1024)
        )));
    }

    Ok(())
}

/// `<prefix>-<millis>` plus, when requested, a random suffix for fields that
/// can carry several files in one request.
fn generate_filename(kind: UploadKind, ext: &str, unique_suffix: bool) -> String {
    let millis = Utc::now().timestamp_millis();
    if unique_suffix {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}-{}-{}.{}", kind.prefix(), millis, &suffix[..8], ext)
    } else {
        format!("{}-{}.{}", kind.prefix(), millis, ext)
    }
}

/// Validate and persist one uploaded file, returning the server-relative
/// `/uploads/...` path to store in the database.
pub async fn store(
    kind: UploadKind,
    original_filename: &str,
    content_type: Option<&str>,
    bytes: &[u8],
    unique_suffix: bool,
) -> Result<String, ApiError> {
    validate(kind, original_filename, content_type, bytes)?;

    // validate() established an allowed extension, so this cannot be empty.
    let ext = extension_of(original_filename).unwrap_or_default();
    let filename = generate_filename(kind, &ext, unique_suffix);

    let dir = PathBuf::from(&config::config().uploads.root_dir).join(kind.subdir());
    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        tracing::error!("failed to create upload directory: {}", e);
        ApiError::internal("Failed to save uploaded file")
    })?;

    let path = dir.join(&filename);
    tokio::fs::write(&path, bytes).await.map_err(|e| {
        tracing::error!("failed to write upload {}: {}", path.display(), e);
        ApiError::internal("Failed to save uploaded file")
    })?;

    info!("stored upload {} ({} bytes)", path.display(), bytes.len());
    Ok(format!("{}/{}/{}", URL_PREFIX, kind.subdir(), filename))
}

/// Map a stored `/uploads/...` path back to its on-disk location. Rejects
/// anything outside the uploads tree.
fn fs_path_for(url_path: &str) -> Option<PathBuf> {
    let rest = url_path.strip_prefix(URL_PREFIX)?.strip_prefix('/')?;
    if rest.is_empty() || rest.contains("..") || rest.contains('\\') {
        return None;
    }
    Some(PathBuf::from(&config::config().uploads.root_dir).join(rest))
}

/// Best-effort unlink. Failures are logged, never escalated; the database is
/// the source of truth and orphaned files are reconciled out of band.
pub async fn remove(url_path: &str) {
    let Some(path) = fs_path_for(url_path) else {
        warn!("refusing to remove suspicious upload path {}", url_path);
        return;
    };
    match tokio::fs::remove_file(&path).await {
        Ok(()) => info!("removed upload {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("failed to remove upload {}: {}", path.display(), e),
    }
}

/// Cleanup for files written before a later validation/database failure.
pub async fn discard(url_paths: &[String]) {
    for path in url_paths {
        remove(path).await;
    }
}
