//! Axum extractor for booking payloads
//!
//! [`JsonPayload`] accepts any JSON object and hands it to the validation
//! engine untouched. Malformed bodies are answered with the crate's error
//! envelope instead of axum's plain-text rejection.

use crate::core::error::{BookingDeskError, RequestError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;

/// Raw JSON object taken from the request body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_booking(
///     State(state): State<AppState>,
///     JsonPayload(payload): JsonPayload,
/// ) -> BookingDeskResult<impl IntoResponse> {
///     let booking = state.service.create(&payload).await?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonPayload(pub Value);

impl JsonPayload {
    /// Get the inner payload
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl std::ops::Deref for JsonPayload {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = BookingDeskError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state)
            .await
            .map_err(|e| RequestError::InvalidBody {
                message: e.body_text(),
            })?;

        if !payload.is_object() {
            return Err(RequestError::InvalidBody {
                message: "expected a JSON object".to_string(),
            }
            .into());
        }

        Ok(JsonPayload(payload))
    }
}
