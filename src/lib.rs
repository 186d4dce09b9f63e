//! # booking-desk
//!
//! Booking management for a single rental property, served over HTTP.
//!
//! ## Features
//!
//! - **Overlap-safe bookings**: half-open `[checkin, checkout)` stays, so
//!   back-to-back guests on a turnover day never clash
//! - **One admissibility rule**: the advisory check, the calendar feed and the
//!   write path share [`core::validation::validate`]
//! - **Monthly overview**: previous, current and next month with revenue and
//!   night statistics
//! - **Supervisor login**: a single configured account guards every booking
//!   route through bearer sessions
//! - **Pluggable storage**: in-memory by default, a hosted table behind the
//!   `airtable` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use booking_desk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::load()?)
//!         .serve()
//!         .await
//! }
//! ```

pub mod bookings;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, Credentials, Session, SessionStore, SupervisorAuthenticator},
        booking::{Booking, BookingFields, BookingId, BookingView},
        clock::{Clock, FixedClock, SystemClock},
        error::{BookingDeskError, BookingDeskResult, Rejection, StorageError},
        overview::{MonthSummary, MonthlyOverview, YearMonth},
        service::{BookingRepository, BookingService},
        stay::StayInterval,
        validation::{ValidationMode, validate},
    };

    // === Handlers ===
    pub use crate::bookings::{ApiResponse, AppState, SupervisorSession};

    // === Storage ===
    pub use crate::storage::InMemoryBookingRepository;
    #[cfg(feature = "airtable")]
    pub use crate::storage::AirtableBookingRepository;

    // === Config ===
    pub use crate::config::{AppConfig, StorageBackend};

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
}
