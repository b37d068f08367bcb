//! In-process test harness: drives the router directly with `oneshot`, so no
//! listener is needed. Surface-level checks run without a database; the
//! CRUD suite additionally connects the pool when DATABASE_URL is set.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

/// Environment the router expects; set before the config singleton is built.
pub fn setup() {
    std::env::set_var("JWT_SECRET", "integration-test-secret");
    std::env::set_var(
        "UPLOAD_DIR",
        std::env::temp_dir()
            .join(format!("atelier-test-uploads-{}", std::process::id()))
            .display()
            .to_string(),
    );
}

pub fn app() -> Router {
    setup();
    atelier_api::app()
}

/// Router plus connected pool, or `None` when DATABASE_URL is absent so
/// DB-backed tests skip instead of failing on machines without Postgres.
pub async fn db_app() -> Option<Router> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping database-backed test");
        return None;
    }
    setup();
    atelier_api::database::init_pool()
        .await
        .expect("database connection");
    Some(atelier_api::app())
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router error");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("non-JSON response body")
    };
    (status, body)
}

pub fn get(path: &str) -> Request<Body> {
    request("GET", path, None, None)
}

pub fn get_with_bearer(path: &str, token: &str) -> Request<Body> {
    request("GET", path, Some(token), None)
}

pub fn post_json(path: &str, body: Value) -> Request<Body> {
    request("POST", path, None, Some(body))
}

/// General request builder with optional bearer token and JSON body.
pub fn request(method: &str, path: &str, token: Option<&str>, json: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match json {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Hand-rolled multipart body: text fields first, then files as
/// `(field, filename, content type, bytes)`.
pub fn multipart_request(
    method: &str,
    path: &str,
    token: &str,
    texts: &[(&str, &str)],
    files: &[(&str, &str, &str, &[u8])],
) -> Request<Body> {
    const BOUNDARY: &str = "------------------------atelier-test";

    let mut body: Vec<u8> = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, filename, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
