//! Session extractor
//!
//! Resolves the `Authorization: Bearer <token>` header against the session
//! store and applies the supervisor policy.

use super::handlers::AppState;
use crate::core::auth::{AuthPolicy, Session};
use crate::core::error::{BookingDeskError, RequestError};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};

/// A live supervisor session taken from the request
#[derive(Debug, Clone)]
pub struct SupervisorSession(pub Session);

/// Token carried by an `Authorization: Bearer` header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for SupervisorSession {
    type Rejection = BookingDeskError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| RequestError::unauthorized("missing bearer token"))?;

        let session = state
            .sessions
            .resolve(token, state.clock.now())
            .await
            .ok_or_else(|| RequestError::unauthorized("session is invalid or expired"))?;

        if !AuthPolicy::supervisor_only().check(&session.context()) {
            return Err(RequestError::Forbidden {
                message: format!("role '{}' may not manage bookings", session.role),
            }
            .into());
        }

        Ok(SupervisorSession(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("Basic abc123")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
