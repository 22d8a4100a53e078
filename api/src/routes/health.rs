use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET /health
///
/// Liveness probe; requires no authentication.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({"status": "ok"}), "Service is up")),
    )
}
