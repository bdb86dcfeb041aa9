pub mod auth;
mod bookings;
mod error;
mod extract;
mod events;
mod users;
mod validation;

pub use error::{ApiError, ErrorResponse};

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let user_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login));

    let event_routes = Router::new()
        .route("/", get(events::list_events))
        .route("/", post(events::create_event));

    let booking_routes = Router::new()
        .route("/", post(bookings::create_booking))
        .route("/my", get(bookings::my_bookings));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/users", user_routes)
        .nest("/api/events", event_routes)
        .nest("/api/bookings", booking_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Gigbook API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "database": "sqlite",
    }))
}

#[cfg(test)]
pub(crate) async fn test_state() -> Arc<AppState> {
    let pool = crate::db::test_pool().await;
    let mut config = crate::config::Config::default();
    config.auth.jwt_secret = "test-signing-key".to_string();
    Arc::new(AppState::new(config, pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_bookings_require_bearer_token() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/bookings/my")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_envelope() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/users/register")
                    .header("content-type", "application/json")
                    .body(Body::from("{not valid json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "bad_request");
        assert!(json["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_register_login_book_flow() {
        let app = create_router(test_state().await);

        // Register
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/users/register",
                serde_json::json!({"name": "Ann", "email": "a@x.com", "password": "p1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let user = body_json(response).await;
        assert_eq!(user["id"], 1);
        assert!(user.get("password_hash").is_none());

        // Login
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/users/login",
                serde_json::json!({"email": "a@x.com", "password": "p1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token_body = body_json(response).await;
        assert_eq!(token_body["token_type"], "bearer");
        let token = token_body["access_token"].as_str().unwrap().to_string();

        // Create an event (unauthenticated)
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/events",
                serde_json::json!({
                    "title": "Gig",
                    "location": "Hall",
                    "date": "2025-01-01T20:00:00",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let event = body_json(response).await;
        assert_eq!(event["id"], 1);

        // Book it
        let mut request = json_request(
            "POST",
            "/api/bookings",
            serde_json::json!({"event_id": 1, "number_of_tickets": 2}),
        );
        request.headers_mut().insert(
            "Authorization",
            format!("Bearer {}", token).parse().unwrap(),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let booking = body_json(response).await;
        assert_eq!(booking["user_id"], 1);
        assert_eq!(booking["event_id"], 1);
        assert_eq!(booking["number_of_tickets"], 2);

        // List my bookings
        let mut request = Request::builder()
            .uri("/api/bookings/my")
            .body(Body::empty())
            .unwrap();
        request.headers_mut().insert(
            "Authorization",
            format!("Bearer {}", token).parse().unwrap(),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bookings = body_json(response).await;
        assert_eq!(bookings.as_array().unwrap().len(), 1);
    }
}
