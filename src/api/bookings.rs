use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use super::error::ApiError;
use super::extract::Json;
use super::validation::validate_ticket_count;
use crate::db::{Booking, CreateBookingRequest, Event, User};
use crate::AppState;

/// List the caller's bookings
///
/// GET /api/bookings/my
pub async fn my_bookings(
    user: User,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings: Vec<Booking> = sqlx::query_as("SELECT * FROM bookings WHERE user_id = ?")
        .bind(user.id)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(bookings))
}

/// Create a booking for the caller.
/// The booking is always owned by the authenticated user; a user_id in the
/// request body is ignored.
///
/// POST /api/bookings
pub async fn create_booking(
    user: User,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    if let Err(e) = validate_ticket_count(req.number_of_tickets) {
        return Err(ApiError::validation_field("number_of_tickets", e));
    }

    let event: Option<Event> = sqlx::query_as("SELECT * FROM events WHERE id = ?")
        .bind(req.event_id)
        .fetch_optional(&state.db)
        .await?;

    if event.is_none() {
        return Err(ApiError::not_found("Event not found"));
    }

    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO bookings (user_id, event_id, number_of_tickets, created_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(req.event_id)
    .bind(req.number_of_tickets)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let booking: Booking = sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await?;

    tracing::info!(
        booking_id = booking.id,
        user_id = user.id,
        event_id = booking.event_id,
        "Created booking"
    );

    Ok((StatusCode::CREATED, Json(booking)))
}
