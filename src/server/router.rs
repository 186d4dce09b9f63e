//! Router builder utilities for booking and auth routes

use crate::bookings::AppState;
use crate::bookings::auth_handlers::{current_session, login, logout};
use crate::bookings::handlers::{
    booked_dates, check_booking, create_booking, delete_booking, get_booking, list_bookings,
    monthly_overview, update_booking,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build booking routes
///
/// - GET /bookings - List bookings sorted by check-in
/// - POST /bookings - Create a booking
/// - POST /bookings/check - Advisory admissibility check
/// - GET /bookings/overview - Previous, current and next month
/// - GET /bookings/booked-dates - Occupied nights
/// - GET|PUT|DELETE /bookings/{id} - Single booking
pub fn build_booking_routes(state: AppState) -> Router {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/check", post(check_booking))
        .route("/bookings/overview", get(monthly_overview))
        .route("/bookings/booked-dates", get(booked_dates))
        .route(
            "/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .with_state(state)
}

/// Build supervisor session routes
pub fn build_auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
        .with_state(state)
}
