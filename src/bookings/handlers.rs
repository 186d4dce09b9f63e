//! HTTP handlers for booking operations
//!
//! Every handler here sits behind [`SupervisorSession`]; the booking rules
//! themselves live in [`BookingService`].

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use super::session::SupervisorSession;
use crate::core::auth::{SessionStore, SupervisorAuthenticator};
use crate::core::booking::{BookingId, BookingView};
use crate::core::clock::Clock;
use crate::core::error::{BookingDeskResult, RequestError};
use crate::core::overview::YearMonth;
use crate::core::service::BookingService;
use crate::core::validation::JsonPayload;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BookingService>,
    pub sessions: Arc<SessionStore>,
    pub authenticator: Arc<SupervisorAuthenticator>,
    pub clock: Arc<dyn Clock>,
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Query for the advisory check
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckQuery {
    pub exclude_id: Option<String>,
}

/// Query for the monthly overview
#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    /// `YYYY-MM`; the current month when absent
    pub month: Option<String>,
}

/// Query for the booked-dates feed
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedDatesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub exclude_id: Option<String>,
}

/// GET /bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    _session: SupervisorSession,
) -> BookingDeskResult<Response> {
    let bookings = state.service.list().await?;
    let views: Vec<BookingView<'_>> = bookings.iter().map(BookingView::from).collect();
    Ok(ApiResponse::ok(views).into_response())
}

/// GET /bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    _session: SupervisorSession,
    Path(id): Path<String>,
) -> BookingDeskResult<Response> {
    let booking = state.service.get(&BookingId::new(id)).await?;
    Ok(ApiResponse::ok(BookingView::from(&booking)).into_response())
}

/// POST /bookings
pub async fn create_booking(
    State(state): State<AppState>,
    SupervisorSession(session): SupervisorSession,
    JsonPayload(payload): JsonPayload,
) -> BookingDeskResult<Response> {
    let booking = state.service.create(&payload).await?;
    tracing::debug!(id = %booking.id, by = %session.username, "create handled");

    let body = ApiResponse::ok(BookingView::from(&booking)).with_message("Booking created successfully");
    Ok((StatusCode::CREATED, body).into_response())
}

/// PUT /bookings/{id}
pub async fn update_booking(
    State(state): State<AppState>,
    _session: SupervisorSession,
    Path(id): Path<String>,
    JsonPayload(payload): JsonPayload,
) -> BookingDeskResult<Response> {
    let booking = state.service.update(&BookingId::new(id), &payload).await?;

    let body = ApiResponse::ok(BookingView::from(&booking)).with_message("Booking updated successfully");
    Ok(body.into_response())
}

/// DELETE /bookings/{id}
pub async fn delete_booking(
    State(state): State<AppState>,
    _session: SupervisorSession,
    Path(id): Path<String>,
) -> BookingDeskResult<Response> {
    let id = BookingId::new(id);
    state.service.delete(&id).await?;

    let body = ApiResponse::ok(json!({ "id": id })).with_message("Booking deleted successfully");
    Ok(body.into_response())
}

/// POST /bookings/check
///
/// Runs the same rule as create/update and reports the normalized candidate.
/// Nothing is stored.
pub async fn check_booking(
    State(state): State<AppState>,
    _session: SupervisorSession,
    Query(query): Query<CheckQuery>,
    JsonPayload(payload): JsonPayload,
) -> BookingDeskResult<Response> {
    let exclude = query.exclude_id.map(BookingId::new);
    let fields = state.service.check(&payload, exclude).await?;

    let body = ApiResponse::ok(fields).with_message("The selected dates are available");
    Ok(body.into_response())
}

/// GET /bookings/overview
pub async fn monthly_overview(
    State(state): State<AppState>,
    _session: SupervisorSession,
    Query(query): Query<OverviewQuery>,
) -> BookingDeskResult<Response> {
    let month = match query.month.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(YearMonth::parse(raw).ok_or_else(|| RequestError::InvalidQuery {
            parameter: "month".to_string(),
            message: format!("'{}' is not a YYYY-MM month", raw),
        })?),
    };

    let overview = state.service.overview(month).await?;
    Ok(ApiResponse::ok(overview).into_response())
}

/// GET /bookings/booked-dates
pub async fn booked_dates(
    State(state): State<AppState>,
    _session: SupervisorSession,
    Query(query): Query<BookedDatesQuery>,
) -> BookingDeskResult<Response> {
    let from = parse_day("from", query.from.as_deref())?;
    let to = parse_day("to", query.to.as_deref())?;
    let exclude = query
        .exclude_id
        .filter(|id| !id.trim().is_empty())
        .map(BookingId::new);

    let dates = state
        .service
        .booked_dates(from, to, exclude.as_ref())
        .await?;
    Ok(ApiResponse::ok(dates).into_response())
}

fn parse_day(parameter: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, RequestError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| RequestError::InvalidQuery {
                parameter: parameter.to_string(),
                message: format!("'{}' is not a YYYY-MM-DD date", raw),
            }),
    }
}
