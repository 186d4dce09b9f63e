//! Booking admissibility
//!
//! [`validate`] decides whether a candidate payload may be stored next to the
//! bookings that already exist. It is pure: the caller supplies the snapshot
//! and today's date, and nothing is written. The advisory check endpoint and
//! the write path both call it, so they always agree.

use super::filters;
use super::validators::{
    as_whole_number, calendar_date, is_missing, min_trimmed_chars, non_negative_number,
    parse_calendar_date, whole_number_at_least,
};
use crate::core::booking::{Booking, BookingFields, BookingId};
use crate::core::error::{DateField, Rejection};
use crate::core::stay::StayInterval;
use chrono::NaiveDate;
use serde_json::{Map, Value};

pub const CHECKIN_DATE: &str = "checkinDate";
pub const CHECKOUT_DATE: &str = "checkoutDate";
pub const CUSTOMER_NAME: &str = "customerName";
pub const CUSTOMER_PHONE: &str = "customerPhone";
pub const BOOKING_AMOUNT: &str = "bookingAmount";
pub const ADVANCE_AMOUNT: &str = "advanceAmount";
pub const NUMBER_OF_GUESTS: &str = "numberOfGuests";

/// Fields every candidate must carry, in reporting order
pub const REQUIRED_FIELDS: [&str; 7] = [
    CHECKIN_DATE,
    CHECKOUT_DATE,
    CUSTOMER_NAME,
    CUSTOMER_PHONE,
    BOOKING_AMOUNT,
    ADVANCE_AMOUNT,
    NUMBER_OF_GUESTS,
];

/// Which write the candidate is headed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationMode {
    /// New booking: check-in may not lie in the past
    Create,
    /// Edit of an existing booking, which is left out of the overlap test
    Update { exclude: BookingId },
}

impl ValidationMode {
    pub fn excluded(&self) -> Option<&BookingId> {
        match self {
            ValidationMode::Create => None,
            ValidationMode::Update { exclude } => Some(exclude),
        }
    }
}

/// Check a raw candidate against the stored bookings
///
/// Checks run in a fixed order and stop at the first failure: presence,
/// field values, date formats, date order, past check-in (create only) and
/// finally overlap. On success the trimmed, typed fields are returned.
pub fn validate(
    candidate: &Value,
    existing: &[Booking],
    mode: &ValidationMode,
    today: NaiveDate,
) -> Result<BookingFields, Rejection> {
    let mut payload = candidate.as_object().cloned().unwrap_or_default();

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| is_missing(payload.get(**field)))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Rejection::MissingField { fields: missing });
    }

    filters::apply_to_fields(
        &mut payload,
        &[CUSTOMER_NAME, CUSTOMER_PHONE, CHECKIN_DATE, CHECKOUT_DATE],
        filters::trim(),
    )
    .map_err(|e| Rejection::invalid_field(&e.field, e.message))?;

    check_field(&payload, CUSTOMER_NAME, min_trimmed_chars("Customer name", 2))?;
    check_field(&payload, CUSTOMER_PHONE, min_trimmed_chars("Customer phone", 10))?;
    check_field(&payload, BOOKING_AMOUNT, non_negative_number("Booking amount"))?;
    check_field(&payload, ADVANCE_AMOUNT, non_negative_number("Advance amount"))?;

    let booking_amount = number(&payload, BOOKING_AMOUNT);
    let advance_amount = number(&payload, ADVANCE_AMOUNT);
    if advance_amount > booking_amount {
        return Err(Rejection::invalid_field(
            ADVANCE_AMOUNT,
            "Advance amount cannot be greater than booking amount",
        ));
    }

    check_field(
        &payload,
        NUMBER_OF_GUESTS,
        whole_number_at_least("Number of guests", 1),
    )?;

    let checkin = date(&payload, CHECKIN_DATE, DateField::Checkin)?;
    let checkout = date(&payload, CHECKOUT_DATE, DateField::Checkout)?;

    let stay = StayInterval::new(checkin, checkout).ok_or(Rejection::DateOrderViolation)?;

    if matches!(mode, ValidationMode::Create) && checkin < today {
        return Err(Rejection::PastCheckin);
    }

    if let Some(conflict) = find_overlap(&stay, existing, mode.excluded()) {
        return Err(Rejection::OverlapConflict {
            conflicting_id: conflict.id.clone(),
        });
    }

    Ok(BookingFields {
        checkin_date: checkin,
        checkout_date: checkout,
        customer_name: text(&payload, CUSTOMER_NAME),
        customer_phone: text(&payload, CUSTOMER_PHONE),
        booking_amount,
        advance_amount,
        number_of_guests: payload
            .get(NUMBER_OF_GUESTS)
            .and_then(as_whole_number)
            .unwrap_or_default(),
    })
}

/// First stored booking whose stay shares a night with `stay`
///
/// The excluded id is skipped, as are stored records whose dates are not
/// ordered (they occupy no nights).
pub fn find_overlap<'a>(
    stay: &StayInterval,
    existing: &'a [Booking],
    exclude: Option<&BookingId>,
) -> Option<&'a Booking> {
    existing
        .iter()
        .filter(|booking| Some(&booking.id) != exclude)
        .find(|booking| {
            booking
                .stay()
                .is_some_and(|occupied| stay.overlaps(&occupied))
        })
}

fn check_field<V>(payload: &Map<String, Value>, field: &str, validator: V) -> Result<(), Rejection>
where
    V: Fn(&str, &Value) -> Result<(), String>,
{
    let value = payload.get(field).unwrap_or(&Value::Null);
    validator(field, value).map_err(|reason| Rejection::invalid_field(field, reason))
}

fn date(payload: &Map<String, Value>, field: &str, which: DateField) -> Result<NaiveDate, Rejection> {
    let value = payload.get(field).unwrap_or(&Value::Null);
    calendar_date(which.label())(field, value).map_err(|_| Rejection::InvalidDate { field: which })?;
    parse_calendar_date(value).ok_or(Rejection::InvalidDate { field: which })
}

fn number(payload: &Map<String, Value>, field: &str) -> f64 {
    payload
        .get(field)
        .and_then(Value::as_f64)
        .unwrap_or_default()
}

fn text(payload: &Map<String, Value>, field: &str) -> String {
    payload
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
