//! Core module containing the booking model, rules and service

pub mod auth;
pub mod booking;
pub mod clock;
pub mod error;
pub mod overview;
pub mod service;
pub mod stay;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, Credentials, Session, SessionStore, SupervisorAuthenticator};
pub use booking::{Booking, BookingFields, BookingId, BookingView};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{BookingDeskError, BookingDeskResult, Rejection, StorageError};
pub use overview::{MonthSummary, MonthlyOverview, YearMonth};
pub use service::{BookingRepository, BookingService};
pub use stay::StayInterval;
