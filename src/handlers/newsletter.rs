use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::database::{self, models::Subscriber};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

/// POST /api/newsletter/subscribe: public.
pub async fn subscribe(Json(body): Json<SubscribeRequest>) -> ApiResult<Subscriber> {
    let email = body
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide an email address"))?;

    if !looks_like_email(&email) {
        return Err(ApiError::validation("Please provide a valid email address"));
    }

    let pool = database::pool()?;
    let subscriber = Subscriber::subscribe(&pool, &email).await?;
    info!("newsletter subscription for {}", subscriber.email);
    Ok(ApiResponse::created(subscriber))
}

/// GET /api/newsletter/subscribers: protected, newest first.
pub async fn subscribers() -> ApiResult<Vec<Subscriber>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Subscriber::get_all(&pool).await?))
}

// Enough to turn away obvious garbage; real verification happens via the
// confirmation mail flow upstream of this service.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obvious_garbage_is_rejected() {
        assert!(!looks_like_email("not-an-email"));
        assert!(!looks_like_email("@nodomain.com"));
        assert!(!looks_like_email("user@"));
        assert!(!looks_like_email("user@.com"));
        assert!(looks_like_email("user@example.com"));
    }
}
