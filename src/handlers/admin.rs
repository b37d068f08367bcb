use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth;
use crate::database::{self, models::Admin};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthAdmin};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/admin/login
pub async fn login(Json(body): Json<LoginRequest>) -> ApiResult<Value> {
    let email = non_blank(body.email)
        .ok_or_else(|| ApiError::bad_request("Please provide email and password"))?;
    let password = non_blank(body.password)
        .ok_or_else(|| ApiError::bad_request("Please provide email and password"))?;

    let pool = database::pool()?;
    let admin = Admin::get_by_email(&pool, &email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !auth::verify_password(password, admin.password.clone()).await {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = auth::generate_token(admin.id)?;
    info!("admin {} logged in", admin.id);

    Ok(ApiResponse::success(json!({
        "id": admin.id,
        "username": admin.username,
        "email": admin.email,
        "token": token,
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: Option<String>,
}

/// POST /api/admin/verify-token
pub async fn verify_token(Json(body): Json<VerifyTokenRequest>) -> ApiResult<Value> {
    let token = non_blank(body.token)
        .ok_or_else(|| ApiError::bad_request("Please provide a token"))?;
    let claims = auth::verify_token(&token)?;
    Ok(ApiResponse::success(json!({
        "valid": true,
        "admin_id": claims.sub,
    })))
}

/// GET /api/admin/me
pub async fn me(Extension(admin): Extension<AuthAdmin>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": admin.id,
        "username": admin.username,
        "email": admin.email,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// PUT /api/admin/me
pub async fn update_me(
    Extension(admin): Extension<AuthAdmin>,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<Admin> {
    let username = non_blank(body.username).unwrap_or(admin.username);
    let email = non_blank(body.email).unwrap_or(admin.email);

    let pool = database::pool()?;
    let updated = Admin::update_profile(&pool, admin.id, &username, &email).await?;
    Ok(ApiResponse::success(updated))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: Option<String>,
}

/// PUT /api/admin/password
pub async fn update_password(
    Extension(admin): Extension<AuthAdmin>,
    Json(body): Json<UpdatePasswordRequest>,
) -> ApiResult<()> {
    let password = non_blank(body.password)
        .ok_or_else(|| ApiError::bad_request("Please provide a password"))?;
    if password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let hash = auth::hash_password(password).await?;
    let pool = database::pool()?;
    Admin::update_password(&pool, admin.id, &hash).await?;
    info!("admin {} changed password", admin.id);
    Ok(ApiResponse::message("Password updated successfully"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_read_as_absent() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(
            non_blank(Some("  a@b.c ".to_string())),
            Some("a@b.c".to_string())
        );
    }
}
