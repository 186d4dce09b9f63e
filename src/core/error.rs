//! Typed error handling for booking-desk
//!
//! Errors are split by where they originate so handlers can map them to HTTP
//! without string matching.
//!
//! # Error Categories
//!
//! - [`Rejection`]: a booking candidate failed admissibility checks
//! - [`StorageError`]: the booking repository failed
//! - [`RequestError`]: malformed requests and authentication failures
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match service.create(&payload).await {
//!     Ok(booking) => println!("created {}", booking.id),
//!     Err(BookingDeskError::Rejected(Rejection::OverlapConflict { conflicting_id })) => {
//!         println!("dates taken by {}", conflicting_id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use crate::core::booking::BookingId;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Message returned to callers for failures whose cause stays server-side
pub const GENERIC_FAILURE_MESSAGE: &str = "Internal server error, please try again";

/// The main error type for booking-desk
#[derive(Debug, thiserror::Error)]
pub enum BookingDeskError {
    /// The candidate booking is not admissible
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// No booking with this id
    #[error("Booking '{id}' not found")]
    NotFound { id: BookingId },

    /// Storage backend errors
    #[error(transparent)]
    Storage(StorageError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`; mirrors the success envelope
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable reason
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BookingDeskError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingDeskError::Rejected(r) => r.status_code(),
            BookingDeskError::NotFound { .. } => StatusCode::NOT_FOUND,
            BookingDeskError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingDeskError::Request(e) => e.status_code(),
            BookingDeskError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingDeskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BookingDeskError::Rejected(r) => r.error_code(),
            BookingDeskError::NotFound { .. } => "BOOKING_NOT_FOUND",
            BookingDeskError::Storage(_) => "STORAGE_FAILURE",
            BookingDeskError::Request(e) => e.error_code(),
            BookingDeskError::Config(_) => "CONFIG_ERROR",
            BookingDeskError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the underlying cause is hidden from the caller
    pub fn is_server_fault(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Convert to an error response
    ///
    /// Server-side failures collapse to a generic message; the original error
    /// only goes to the log.
    pub fn to_response(&self) -> ErrorResponse {
        let error = if self.is_server_fault() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            success: false,
            code: self.error_code().to_string(),
            error,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BookingDeskError::Rejected(r) => r.details(),
            BookingDeskError::NotFound { id } => Some(serde_json::json!({ "id": id })),
            _ => None,
        }
    }
}

impl IntoResponse for BookingDeskError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Rejections
// =============================================================================

/// The date field a rejection refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Checkin,
    Checkout,
}

impl DateField {
    /// JSON field name
    pub fn as_str(&self) -> &'static str {
        match self {
            DateField::Checkin => "checkinDate",
            DateField::Checkout => "checkoutDate",
        }
    }

    /// Wording used in messages
    pub fn label(&self) -> &'static str {
        match self {
            DateField::Checkin => "check-in",
            DateField::Checkout => "check-out",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a booking candidate was refused
///
/// Produced by the validation engine before anything is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingField { fields: Vec<String> },

    #[error("{reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Invalid {field} date format")]
    InvalidDate { field: DateField },

    #[error("Check-out date must be after check-in date")]
    DateOrderViolation,

    #[error("Check-in date cannot be in the past")]
    PastCheckin,

    #[error("The selected dates overlap with an existing booking")]
    OverlapConflict { conflicting_id: BookingId },
}

impl Rejection {
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Rejection::InvalidFieldValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Rejection::OverlapConflict { .. } => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Rejection::MissingField { .. } => "MISSING_FIELD",
            Rejection::InvalidFieldValue { .. } => "INVALID_FIELD_VALUE",
            Rejection::InvalidDate { .. } => "INVALID_DATE",
            Rejection::DateOrderViolation => "DATE_ORDER_VIOLATION",
            Rejection::PastCheckin => "PAST_CHECKIN",
            Rejection::OverlapConflict { .. } => "OVERLAP_CONFLICT",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Rejection::MissingField { fields } => Some(serde_json::json!({ "fields": fields })),
            Rejection::InvalidFieldValue { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            Rejection::InvalidDate { field } => {
                Some(serde_json::json!({ "field": field.as_str() }))
            }
            Rejection::OverlapConflict { conflicting_id } => {
                Some(serde_json::json!({ "conflictingId": conflicting_id }))
            }
            Rejection::DateOrderViolation | Rejection::PastCheckin => None,
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by booking repositories
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Booking '{id}' not found in storage")]
    NotFound { id: BookingId },

    #[error("Failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    #[error("{backend} request failed: {message}")]
    Query { backend: String, message: String },

    #[error("Failed to decode {backend} record: {message}")]
    Decode { backend: String, message: String },

    #[error("Storage lock poisoned: {message}")]
    Lock { message: String },
}

impl From<StorageError> for BookingDeskError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { id } => BookingDeskError::NotFound { id },
            other => BookingDeskError::Storage(other),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("Invalid query parameter '{parameter}': {message}")]
    InvalidQuery { parameter: String, message: String },

    #[error("Booking ID is required")]
    MissingId,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },
}

impl RequestError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        RequestError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            RequestError::MissingId => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
            RequestError::MissingId => "MISSING_ID",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{}", parse_message(.file, .message))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

fn parse_message(file: &Option<String>, message: &str) -> String {
    match file {
        Some(file) => format!("Failed to parse config file '{}': {}", file, message),
        None => format!("Failed to parse config: {}", message),
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for BookingDeskError {
    fn from(err: serde_json::Error) -> Self {
        BookingDeskError::Request(RequestError::InvalidBody {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for booking-desk operations
pub type BookingDeskResult<T> = Result<T, BookingDeskError>;
