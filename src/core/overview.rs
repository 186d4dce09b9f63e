//! Monthly overview and booked-day calendar
//!
//! Both views read a booking snapshot and use the same half-open stay rule as
//! the admissibility check: a booking leaving on the 1st is not part of that
//! month, and its checkout day is free.

use crate::core::booking::{Booking, BookingId};
use crate::core::stay::StayInterval;
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `day`
    pub fn of(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    /// Parse `YYYY-MM`
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.trim().split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// `[first day, first day of next month)`
    pub fn range(&self) -> Option<StayInterval> {
        StayInterval::month(self.year, self.month)
    }

    /// Human label such as `June 2025`
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Statistics for the bookings touching one month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month: YearMonth,
    pub label: String,
    pub bookings: Vec<Booking>,
    pub total_bookings: usize,
    pub total_revenue: f64,
    pub total_nights: i64,
    pub average_nights: i64,
}

/// Previous, requested and next month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyOverview {
    pub previous: MonthSummary,
    pub current: MonthSummary,
    pub next: MonthSummary,
}

/// Summarize the bookings whose stay overlaps `month`
///
/// Revenue and nights count each booking in full, even when the stay spills
/// into a neighbouring month.
pub fn summarize_month(bookings: &[Booking], month: YearMonth) -> MonthSummary {
    let mut selected: Vec<Booking> = match month.range() {
        Some(range) => bookings
            .iter()
            .filter(|booking| booking.stay().is_some_and(|stay| stay.overlaps(&range)))
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    selected.sort_by(|a, b| a.fields.checkin_date.cmp(&b.fields.checkin_date));

    let total_bookings = selected.len();
    let total_revenue = selected.iter().map(|b| b.fields.booking_amount).sum();
    let total_nights: i64 = selected.iter().map(Booking::nights).sum();
    let average_nights = if total_bookings == 0 {
        0
    } else {
        (total_nights as f64 / total_bookings as f64).round() as i64
    };

    MonthSummary {
        month,
        label: month.label(),
        bookings: selected,
        total_bookings,
        total_revenue,
        total_nights,
        average_nights,
    }
}

/// Overview centred on `month`
pub fn monthly_overview(bookings: &[Booking], month: YearMonth) -> MonthlyOverview {
    MonthlyOverview {
        previous: summarize_month(bookings, month.previous()),
        current: summarize_month(bookings, month),
        next: summarize_month(bookings, month.next()),
    }
}

/// Every occupied night, sorted and de-duplicated
///
/// `from` is inclusive and `to` exclusive; either bound may be omitted.
/// The booking named by `exclude` is ignored so an edit form can offer its own
/// nights again.
pub fn booked_dates(
    bookings: &[Booking],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    exclude: Option<&BookingId>,
) -> Vec<NaiveDate> {
    bookings
        .iter()
        .filter(|booking| Some(&booking.id) != exclude)
        .filter_map(Booking::stay)
        .filter_map(|stay| stay.clamp(from, to))
        .flat_map(|stay| stay.nights_iter())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
