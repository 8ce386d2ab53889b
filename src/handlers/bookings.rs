use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    error::Result,
    services::bookings as booking_service,
    state::AppState,
    validation::booking::BookingForm,
};

/// The response payload for a successful booking submission.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

/// Handles `POST /api/book`: validates, persists, queues the confirmation.
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<BookingForm>,
) -> Result<Response> {
    let booking = booking_service::submit(&state, form).await?;
    tracing::info!("Booking {} accepted for {}", booking.id, booking.email);

    let response = SubmitResponse {
        success: true,
        message: "Booking submitted successfully! Check your email for payment instructions."
            .to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
