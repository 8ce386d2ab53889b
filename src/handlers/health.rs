use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use chrono::Utc;
use serde::Serialize;

/// The response payload for the health check.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// Handles `GET /health`.
#[axum::debug_handler]
pub async fn health() -> Response {
    let response = HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
