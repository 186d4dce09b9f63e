//! Booking entity and its value types
//!
//! A [`Booking`] is the only entity the service manages. Its mutable part is
//! [`BookingFields`]; the identifier and creation timestamp are assigned once
//! by storage and never change afterwards.

use crate::core::stay::StayInterval;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque booking identifier assigned by the storage backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BookingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Validated, normalized booking fields
///
/// Produced only by the validation engine (or decoded from storage), so the
/// strings are trimmed and `checkout_date > checkin_date` holds for values
/// that went through validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFields {
    pub checkin_date: NaiveDate,
    /// Exclusive end of the stay
    pub checkout_date: NaiveDate,
    pub customer_name: String,
    pub customer_phone: String,
    pub booking_amount: f64,
    pub advance_amount: f64,
    pub number_of_guests: u32,
}

impl BookingFields {
    /// The half-open stay, or `None` when the dates are not ordered
    pub fn stay(&self) -> Option<StayInterval> {
        StayInterval::new(self.checkin_date, self.checkout_date)
    }

    pub fn remaining_amount(&self) -> f64 {
        self.booking_amount - self.advance_amount
    }
}

/// A stored booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,

    #[serde(flatten)]
    pub fields: BookingFields,

    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(id: BookingId, fields: BookingFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            fields,
            created_at,
        }
    }

    pub fn stay(&self) -> Option<StayInterval> {
        self.fields.stay()
    }

    /// Number of nights; zero for records whose dates are not ordered
    pub fn nights(&self) -> i64 {
        self.stay().map(|stay| stay.nights()).unwrap_or(0)
    }

    /// Replace every mutable field, keeping id and creation timestamp
    pub fn replace_fields(&mut self, fields: BookingFields) {
        self.fields = fields;
    }
}

/// Response shape of a booking with its derived amounts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView<'a> {
    #[serde(flatten)]
    pub booking: &'a Booking,
    pub nights: i64,
    pub remaining_amount: f64,
}

impl<'a> From<&'a Booking> for BookingView<'a> {
    fn from(booking: &'a Booking) -> Self {
        Self {
            booking,
            nights: booking.nights(),
            remaining_amount: booking.fields.remaining_amount(),
        }
    }
}
