use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::Json;
use super::validation::{validate_event_date, validate_location, validate_title};
use crate::db::{CreateEventRequest, Event};
use crate::AppState;

fn validate_create_request(req: &CreateEventRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_title(&req.title) {
        errors.add("title", e);
    }
    if let Err(e) = validate_location(&req.location) {
        errors.add("location", e);
    }
    if let Err(e) = validate_event_date(&req.date) {
        errors.add("date", e);
    }

    errors.finish()
}

/// List all events. No pagination or filtering.
///
/// GET /api/events
pub async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>, ApiError> {
    let events: Vec<Event> = sqlx::query_as("SELECT * FROM events")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(events))
}

/// Create an event. Past dates are accepted.
///
/// POST /api/events
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    validate_create_request(&req)?;

    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO events (title, description, genre, language, location, date, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.genre)
    .bind(&req.language)
    .bind(&req.location)
    .bind(&req.date)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let event: Event = sqlx::query_as("SELECT * FROM events WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await?;

    tracing::info!(event_id = event.id, title = %event.title, "Created event");

    Ok((StatusCode::CREATED, Json(event)))
}
