//! HTTP handlers for supervisor login and sessions

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::handlers::{ApiResponse, AppState};
use super::session::{SupervisorSession, bearer_token};
use crate::core::auth::Credentials;
use crate::core::error::{BookingDeskError, BookingDeskResult, RequestError};
use crate::core::validation::JsonPayload;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> BookingDeskResult<Response> {
    let credentials: Credentials = serde_json::from_value(payload)?;

    let Some(context) = state.authenticator.authenticate(&credentials) else {
        tracing::warn!(username = %credentials.username, "rejected login");
        return Err(RequestError::unauthorized("Invalid username or password").into());
    };

    let session = state
        .sessions
        .issue(&context, state.clock.now())
        .await
        .ok_or_else(|| BookingDeskError::Internal("session not issued".to_string()))?;

    tracing::info!(username = %session.username, expires_at = %session.expires_at, "supervisor logged in");
    Ok(ApiResponse::ok(session).with_message("Login successful").into_response())
}

/// POST /auth/logout
///
/// Always succeeds; an unknown or missing token simply has nothing to revoke.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let revoked = match bearer_token(&headers) {
        Some(token) => state.sessions.revoke(token).await,
        None => false,
    };
    if revoked {
        tracing::info!("supervisor logged out");
    }

    ApiResponse::ok(json!({ "revoked": revoked }))
        .with_message("Logged out")
        .into_response()
}

/// GET /auth/session
pub async fn current_session(SupervisorSession(session): SupervisorSession) -> Response {
    ApiResponse::ok(json!({
        "username": session.username,
        "role": session.role,
        "expiresAt": session.expires_at,
    }))
    .into_response()
}
