mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn health_reports_uptime_and_environment() -> Result<()> {
    let (status, body) = common::send(common::app(), common::get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "API is running");
    assert!(body["uptime"].is_number());
    assert!(body["environment"].is_string());
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_endpoint_responds() -> Result<()> {
    let (status, body) = common::send(common::app(), common::get("/api/test")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn root_lists_the_api_surface() -> Result<()> {
    let (status, body) = common::send(common::app(), common::get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["projects"], "/api/projects");
    assert_eq!(body["endpoints"]["health"], "/api/health");
    Ok(())
}

#[tokio::test]
async fn unknown_api_route_gets_enveloped_404() -> Result<()> {
    let (status, body) = common::send(common::app(), common::get("/api/nonexistent")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Cannot GET /api/nonexistent");
    Ok(())
}
