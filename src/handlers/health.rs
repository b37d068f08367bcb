use std::time::Instant;

use axum::Json;
use chrono::Utc;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::config;

// Captured on first touch from lib::run(), so uptime measures the process.
pub static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// GET /api/health: liveness probe, no auth, no rate limit.
pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is running",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": STARTED_AT.elapsed().as_secs(),
        "environment": config::config().environment.as_str(),
    }))
}

/// GET /api/test: trivial connectivity check for frontend smoke tests.
pub async fn test() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is working",
    }))
}

/// GET /: human-facing index of the API surface.
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "atelier-api",
        "status": "running",
        "endpoints": {
            "health": "/api/health",
            "admin": "/api/admin",
            "projects": "/api/projects",
            "testimonials": "/api/testimonials",
            "cv": "/api/cv",
            "blogs": "/api/blogs",
            "settings": "/api/settings",
            "newsletter": "/api/newsletter",
            "analytics": "/api/analytics",
            "uploads": "/uploads",
        },
    }))
}
