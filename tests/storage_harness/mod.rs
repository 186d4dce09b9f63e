//! Shared test harness for booking repository testing
//!
//! Provides booking builders and the `booking_repository_tests!` macro that
//! checks any `BookingRepository` against the storage contract.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

pub mod repository_tests;

use booking_desk::core::booking::{Booking, BookingFields, BookingId};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};

/// A calendar day in 2025
pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

/// Fixed creation timestamp used across tests
pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
}

/// Valid fields for a stay between two days
pub fn fields(checkin: NaiveDate, checkout: NaiveDate) -> BookingFields {
    BookingFields {
        checkin_date: checkin,
        checkout_date: checkout,
        customer_name: "Asha Rao".to_string(),
        customer_phone: "9876543210".to_string(),
        booking_amount: 200.0,
        advance_amount: 50.0,
        number_of_guests: 2,
    }
}

/// A stored booking, for seeding repositories directly
pub fn stored(id: &str, checkin: NaiveDate, checkout: NaiveDate) -> Booking {
    Booking::new(BookingId::new(id), fields(checkin, checkout), created_at())
}

/// Raw JSON candidate as a client would send it
pub fn candidate(checkin: &str, checkout: &str) -> Value {
    json!({
        "checkinDate": checkin,
        "checkoutDate": checkout,
        "customerName": "Asha Rao",
        "customerPhone": "9876543210",
        "bookingAmount": 200,
        "advanceAmount": 50,
        "numberOfGuests": 2
    })
}
