//! HTTP surface for bookings and supervisor sessions

pub mod auth_handlers;
pub mod handlers;
pub mod session;

pub use handlers::{ApiResponse, AppState};
pub use session::SupervisorSession;
