use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// Parses a session cookie value. Anything but a UUID is rejected outright.
fn parse_session_token(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}

/// Extracts the session id from the request cookies.
fn extract_session_token(cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| parse_session_token(cookie.value()))
}

/// Guards every admin-only route: resolves the session cookie against the
/// session store and injects the [`Session`](crate::models::session::Session)
/// as a request extension.
///
/// Short-circuits with 401 and performs no side effects when the cookie is
/// absent, malformed, unknown, or expired.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = extract_session_token(&cookies).ok_or_else(|| {
        tracing::debug!("No valid session cookie on {}", request.uri().path());
        AppError::Authentication("Authentication required".to_string())
    })?;

    let session = state
        .sessions
        .get(&session_id)
        .await
        .map_err(|e| {
            tracing::warn!("Session lookup failed: {}", e);
            AppError::Authentication("Authentication required".to_string())
        })?
        .ok_or_else(|| {
            tracing::debug!("Session {} unknown or expired", session_id);
            AppError::Authentication("Authentication required".to_string())
        })?;

    tracing::debug!("Admin authenticated: {}", session.admin_id);
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[test]
    fn session_tokens_must_be_uuids() {
        assert!(parse_session_token("not-a-uuid").is_none());
        assert!(parse_session_token("").is_none());
        assert!(parse_session_token("42").is_none());

        let id = Uuid::new_v4();
        assert_eq!(parse_session_token(&id.to_string()), Some(id));
    }

    #[tokio::test]
    async fn guard_rejection_is_401_with_message_body() {
        // The exact response every admin route returns when the session
        // cookie is absent, malformed, unknown, or expired.
        let response =
            AppError::Authentication("Authentication required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body.as_ref(), br#"{"message":"Authentication required"}"#);
    }
}
