mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

// Single test in this binary: the limiter window is configured through the
// process-wide config singleton, so it must be set before anything else
// touches it.
#[tokio::test]
async fn login_limiter_kicks_in_after_quota() -> Result<()> {
    std::env::set_var("LOGIN_LIMIT_REQUESTS", "2");
    std::env::set_var("LOGIN_LIMIT_WINDOW_SECS", "600");

    let app = common::app();

    for _ in 0..2 {
        let (status, _) = common::send(
            app.clone(),
            common::post_json("/api/admin/login", json!({})),
        )
        .await;
        // Counted by the limiter, rejected by field validation.
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, body) = common::send(
        app,
        common::post_json("/api/admin/login", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Too many login attempts, please try again later"
    );
    Ok(())
}
