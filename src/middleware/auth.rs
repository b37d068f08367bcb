use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::database::{self, models::Admin};
use crate::error::ApiError;

/// Authenticated admin context extracted from a verified bearer token.
///
/// The account is re-fetched on every request, so a token minted before an
/// admin row was deleted stops working immediately.
#[derive(Clone, Debug)]
pub struct AuthAdmin {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<Admin> for AuthAdmin {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
        }
    }
}

/// Bearer-token guard for the admin surface. Verifies the JWT, loads the
/// account and injects [`AuthAdmin`] into request extensions.
pub async fn require_admin(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;
    let claims = auth::verify_token(&token)?;

    let pool = database::pool()?;
    let admin = Admin::get_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Admin not found"))?;

    request.extensions_mut().insert(AuthAdmin::from(admin));
    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::unauthorized("Not authorized, no token")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = extract_bearer_token(&headers_with("Basic dXNlcjpwYXNz")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn empty_bearer_token_is_rejected() {
        let err = extract_bearer_token(&headers_with("Bearer   ")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn bearer_token_is_extracted() {
        let token = extract_bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }
}
