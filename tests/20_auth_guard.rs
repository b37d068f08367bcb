mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn protected_routes_reject_missing_token() -> Result<()> {
    for path in [
        "/api/admin/me",
        "/api/analytics",
        "/api/newsletter/subscribers",
    ] {
        let (status, body) = common::send(common::app(), common::get(path)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "path {}", path);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not authorized, no token");
    }
    Ok(())
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() -> Result<()> {
    let (status, body) = common::send(
        common::app(),
        common::get_with_bearer("/api/admin/me", "not.a.real.jwt"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let (status, body) = common::send(
        common::app(),
        common::post_json("/api/admin/login", json!({"email": "a@b.c"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please provide email and password");
    Ok(())
}

#[tokio::test]
async fn verify_token_requires_a_token() -> Result<()> {
    let (status, body) = common::send(
        common::app(),
        common::post_json("/api/admin/verify-token", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide a token");
    Ok(())
}

#[tokio::test]
async fn verify_token_rejects_forgeries() -> Result<()> {
    let (status, body) = common::send(
        common::app(),
        common::post_json("/api/admin/verify-token", json!({"token": "abc.def.ghi"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
    Ok(())
}
