//! Half-open date ranges
//!
//! A stay covers `[checkin, checkout)`: the checkout day itself is free, so a
//! booking ending on the 12th and another starting on the 12th do not clash.
//! Every overlap decision in the crate (admissibility, monthly overview,
//! booked-day calendar) goes through [`StayInterval::overlaps`] or
//! [`StayInterval::contains`].

use chrono::NaiveDate;

/// Non-empty half-open range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StayInterval {
    checkin: NaiveDate,
    checkout: NaiveDate,
}

impl StayInterval {
    /// Build a stay; `None` unless `checkout` is strictly after `checkin`
    pub fn new(checkin: NaiveDate, checkout: NaiveDate) -> Option<Self> {
        (checkout > checkin).then_some(Self { checkin, checkout })
    }

    /// The range covering one calendar month
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Self::new(first, next)
    }

    pub fn checkin(&self) -> NaiveDate {
        self.checkin
    }

    pub fn checkout(&self) -> NaiveDate {
        self.checkout
    }

    pub fn nights(&self) -> i64 {
        (self.checkout - self.checkin).num_days()
    }

    /// True when `day` is an occupied night of this stay
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.checkin <= day && day < self.checkout
    }

    /// Whether two stays share at least one night
    ///
    /// Evaluated as: new check-in inside the other stay, or new checkout
    /// inside it, or this stay enclosing it. For non-empty ranges this is
    /// exactly `a < d && c < b` for `[a, b)` and `[c, d)`.
    pub fn overlaps(&self, other: &StayInterval) -> bool {
        let (new_in, new_out) = (self.checkin, self.checkout);
        let (old_in, old_out) = (other.checkin, other.checkout);

        (new_in >= old_in && new_in < old_out)
            || (new_out > old_in && new_out <= old_out)
            || (new_in <= old_in && new_out >= old_out)
    }

    /// The part of this stay inside `[from, to)`; a missing bound leaves that
    /// side open
    pub fn clamp(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<Self> {
        let checkin = from.map_or(self.checkin, |from| self.checkin.max(from));
        let checkout = to.map_or(self.checkout, |to| self.checkout.min(to));
        Self::new(checkin, checkout)
    }

    /// Occupied nights in order, checkout excluded
    pub fn nights_iter(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let checkout = self.checkout;
        self.checkin.iter_days().take_while(move |day| *day < checkout)
    }
}
