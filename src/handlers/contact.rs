use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{error::Result, state::AppState, validation::contact::ContactForm};

/// The response payload for a contact submission.
#[derive(Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Handles `POST /api/contact`: validates and forwards the message to the
/// operator address with Reply-To set to the submitter.
///
/// Once validation passes the caller always gets 200; mail delivery is
/// best-effort and its failure is logged, not surfaced.
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Response> {
    let msg = form.validate()?;

    state
        .mailer
        .dispatch_contact_message(&msg.name, &msg.email, &msg.message);
    tracing::info!("Contact message accepted from {}", msg.email);

    let response = ContactResponse {
        success: true,
        message: "Thanks! Your message has been received.".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
