use bcrypt::DEFAULT_COST;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ApiError;

/// Token payload carries only the acting admin's id plus the standard
/// issued-at/expiry pair. Everything else is re-fetched on each request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(admin_id: i64, expire_days: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: admin_id,
            iat: now.timestamp(),
            exp: (now + Duration::days(expire_days)).timestamp(),
        }
    }
}

pub fn encode_token(secret: &str, claims: &Claims) -> Result<String, ApiError> {
    if secret.is_empty() {
        return Err(ApiError::server_config(
            "Server configuration error: JWT_SECRET is not set",
        ));
    }
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("JWT generation error: {}", e);
        ApiError::internal("Failed to generate token")
    })
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    if secret.is_empty() {
        return Err(ApiError::server_config(
            "Server configuration error: JWT_SECRET is not set",
        ));
    }
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
}

/// Sign a token for an admin using the configured secret and expiry.
pub fn generate_token(admin_id: i64) -> Result<String, ApiError> {
    let security = &config::config().security;
    let claims = Claims::new(admin_id, security.jwt_expire_days);
    encode_token(&security.jwt_secret, &claims)
}

/// Verify a bearer token against the configured secret.
pub fn verify_token(token: &str) -> Result<Claims, ApiError> {
    decode_token(&config::config().security.jwt_secret, token)
}

/// Hash a password with a per-password salt. bcrypt is CPU-bound, so the
/// work runs on the blocking thread pool.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, DEFAULT_COST))
        .await
        .map_err(|e| {
            tracing::error!("spawn_blocking panic during hash: {}", e);
            ApiError::internal("Failed to process password")
        })?
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            ApiError::internal("Failed to process password")
        })
}

/// Constant-time comparison of a candidate password against a stored hash.
pub async fn verify_password(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-secret";

    #[test]
    fn token_round_trip_preserves_subject() {
        let claims = Claims::new(42, 30);
        let token = encode_token(SECRET, &claims).unwrap();
        let decoded = decode_token(SECRET, &token).unwrap();
        assert_eq!(decoded.sub, 42);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        let claims = Claims::new(1, 30);
        let err = encode_token("", &claims).unwrap_err();
        assert!(matches!(err, ApiError::ServerConfig(_)));
        assert!(matches!(
            decode_token("", "whatever").unwrap_err(),
            ApiError::ServerConfig(_)
        ));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let claims = Claims::new(7, 30);
        let token = encode_token(SECRET, &claims).unwrap();
        let err = decode_token("another-secret", &token).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Expiry one day in the past
        let claims = Claims::new(7, -1);
        let token = encode_token(SECRET, &claims).unwrap();
        let err = decode_token(SECRET, &token).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = decode_token(SECRET, "not.a.jwt").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn password_hash_verifies_and_rejects() {
        let hash = hash_password("password123".to_string()).await.unwrap();
        assert!(verify_password("password123".to_string(), hash.clone()).await);
        assert!(!verify_password("wrong".to_string(), hash).await);
    }
}
