use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies, cookie::time::Duration};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::SESSION_COOKIE,
    models::booking::Booking,
    models::session::Session,
    services::{auth as auth_service, bookings as booking_service},
    state::AppState,
};

/// The request payload for admin login. Fields are optional so missing ones
/// surface as a 400, not a deserialization rejection.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The response payload for login/logout/delete.
#[derive(Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

/// The response payload for mark-paid.
#[derive(Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
}

/// Creates the session cookie.
fn session_cookie(value: String, max_age_hours: i64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);

    cookie.set_http_only(true);
    if secure {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_hours * 3600));
    cookie.set_path("/");

    cookie
}

/// Handles `POST /api/admin/login`.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(AppError::Validation(
            "Username and password required".to_string(),
        ));
    };
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password required".to_string(),
        ));
    }

    let admin = auth_service::authenticate_admin(&state.store, &username, &password).await?;

    let session_id = state.sessions.create(&admin.id).await?;
    cookies.add(session_cookie(
        session_id.to_string(),
        state.config.session_duration_hours,
        state.config.secure_cookies,
    ));

    tracing::info!("Admin logged in: {}", admin.username);

    let response = StatusResponse {
        success: true,
        message: "Login successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles `POST /api/admin/logout`. Destroys the session unconditionally
/// and always responds 200, with or without a live session.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    if let Some(session_id) = cookies
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        if let Err(e) = state.sessions.destroy(&session_id).await {
            tracing::warn!("Session destroy failed: {}", e);
        }
    }

    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookies.remove(cookie);

    let response = StatusResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles `GET /api/admin/bookings`. Session required; newest first.
#[axum::debug_handler]
pub async fn list_bookings(State(state): State<AppState>) -> Result<Response> {
    let bookings = booking_service::list(&state).await?;
    Ok((StatusCode::OK, Json(bookings)).into_response())
}

/// Handles `PUT /api/admin/bookings/{id}/paid`. Session required.
/// Idempotent: a second call on the same id succeeds with no change.
#[axum::debug_handler]
pub async fn mark_paid(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response> {
    let booking = booking_service::mark_paid(&state, &id).await?;
    tracing::info!("Booking {} marked paid by admin {}", booking.id, session.admin_id);

    let response = BookingResponse {
        success: true,
        booking,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles `DELETE /api/admin/bookings/{id}`. Session required.
#[axum::debug_handler]
pub async fn delete_booking(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response> {
    booking_service::delete(&state, &id).await?;
    tracing::info!("Booking {} deleted by admin {}", id, session.admin_id);

    let response = StatusResponse {
        success: true,
        message: "Booking deleted".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_cookies::cookie::SameSite;

    #[test]
    fn session_cookie_is_http_only_lax_and_scoped_to_root() {
        let cookie = session_cookie("abc".to_string(), 12, false);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(12 * 3600)));
        assert_eq!(cookie.secure(), None);
    }

    #[test]
    fn session_cookie_is_secure_when_configured() {
        let cookie = session_cookie("abc".to_string(), 12, true);
        assert_eq!(cookie.secure(), Some(true));
    }
}
