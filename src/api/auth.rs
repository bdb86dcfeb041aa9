//! Credential service: password hashing and bearer-token authentication.
//!
//! Tokens are HS256 JWTs with a fixed claims shape. Every authentication
//! failure surfaces as the same 401 response so callers cannot tell which
//! check failed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use crate::config::AuthConfig;
use crate::db::{DbPool, User};
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Access token claims. `sub` is the stringified user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Issue a signed access token for a user
pub fn issue_token(user_id: i64, auth: &AuthConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::minutes(auth.token_expiry_minutes);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
}

/// Decode a token and extract the subject user id.
/// Signature and expiry are verified; any failure is a uniform 401.
fn decode_subject(token: &str, auth: &AuthConfig) -> Result<i64, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    data.claims
        .sub
        .parse::<i64>()
        .map_err(|_| ApiError::unauthorized(INVALID_CREDENTIALS))
}

/// Resolve the user a token belongs to.
/// A valid token for a user that no longer exists is still a 401, not a 404.
pub async fn resolve_user(pool: &DbPool, auth: &AuthConfig, token: &str) -> Result<User, ApiError> {
    let user_id = decode_subject(token, auth)?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    user.ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))
}

/// Extract the bearer token from request headers
fn extract_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Extractor for the current authenticated user
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;
        resolve_user(&state.db, &state.config.auth, token).await
    }
}
