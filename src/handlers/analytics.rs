use axum::Json;
use serde::Deserialize;

use crate::database::{self, models::PageVisit};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/analytics: protected, busiest pages first.
pub async fn stats() -> ApiResult<Vec<PageVisit>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(PageVisit::get_all(&pool).await?))
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub page_url: Option<String>,
}

/// POST /api/analytics/track: public, fired by the site on page views.
pub async fn track(Json(body): Json<TrackRequest>) -> ApiResult<PageVisit> {
    let page_url = body
        .page_url
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide a page_url"))?;

    let pool = database::pool()?;
    Ok(ApiResponse::success(
        PageVisit::increment(&pool, &page_url).await?,
    ))
}
