use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use super::auth::{hash_password, issue_token, verify_password};
use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::Json;
use super::validation::{validate_email, validate_name, validate_password};
use crate::db::{LoginRequest, RegisterRequest, TokenResponse, User, UserResponse};
use crate::AppState;

fn validate_register_request(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(&req.name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(&req.password) {
        errors.add("password", e);
    }

    errors.finish()
}

/// Register a new user
///
/// POST /api/users/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_register_request(&req)?;

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await?;

    tracing::info!(user_id = user.id, "Registered user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Log in with email and password
///
/// POST /api/users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    // Same response for unknown email and wrong password
    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = issue_token(user.id, &state.config.auth)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {}", e)))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
