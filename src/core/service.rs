//! Repository contract and the booking service built on it

use crate::core::booking::{Booking, BookingFields, BookingId};
use crate::core::clock::Clock;
use crate::core::error::{BookingDeskError, BookingDeskResult, RequestError, StorageError};
use crate::core::overview::{self, MonthlyOverview, YearMonth};
use crate::core::validation::{ValidationMode, validate};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage backend for bookings
///
/// Implementations only persist; every admissibility decision happens in
/// [`BookingService`] before a write reaches them.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// All bookings, sorted by check-in ascending
    async fn list(&self) -> Result<Vec<Booking>, StorageError>;

    /// Get a booking by ID
    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, StorageError>;

    /// Store a new booking; the backend assigns the id
    async fn create(
        &self,
        fields: BookingFields,
        created_at: DateTime<Utc>,
    ) -> Result<Booking, StorageError>;

    /// Replace every field of an existing booking, keeping id and creation time
    async fn update(&self, id: &BookingId, fields: BookingFields)
    -> Result<Booking, StorageError>;

    /// Delete a booking
    async fn delete(&self, id: &BookingId) -> Result<(), StorageError>;
}

/// Booking operations with validation in front of every write
pub struct BookingService {
    repository: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
    write_guard: Mutex<()>,
}

impl BookingService {
    pub fn new(repository: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            write_guard: Mutex::new(()),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// All bookings sorted by check-in, then id
    pub async fn list(&self) -> BookingDeskResult<Vec<Booking>> {
        let mut bookings = self.repository.list().await?;
        bookings.sort_by(|a, b| {
            a.fields
                .checkin_date
                .cmp(&b.fields.checkin_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(bookings)
    }

    pub async fn get(&self, id: &BookingId) -> BookingDeskResult<Booking> {
        if id.is_blank() {
            return Err(RequestError::MissingId.into());
        }
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| BookingDeskError::NotFound { id: id.clone() })
    }

    /// Validate against a fresh snapshot and store
    pub async fn create(&self, candidate: &Value) -> BookingDeskResult<Booking> {
        let _guard = self.write_guard.lock().await;

        let existing = self.repository.list().await?;
        let fields = self.admit(candidate, &existing, &ValidationMode::Create)?;

        let booking = self.repository.create(fields, self.clock.now()).await?;
        tracing::info!(
            id = %booking.id,
            checkin = %booking.fields.checkin_date,
            checkout = %booking.fields.checkout_date,
            "booking created"
        );
        Ok(booking)
    }

    /// Validate against a fresh snapshot, excluding the edited booking, and store
    pub async fn update(&self, id: &BookingId, candidate: &Value) -> BookingDeskResult<Booking> {
        if id.is_blank() {
            return Err(RequestError::MissingId.into());
        }

        let _guard = self.write_guard.lock().await;

        let existing = self.repository.list().await?;
        if !existing.iter().any(|booking| &booking.id == id) {
            return Err(BookingDeskError::NotFound { id: id.clone() });
        }

        let mode = ValidationMode::Update { exclude: id.clone() };
        let fields = self.admit(candidate, &existing, &mode)?;

        let booking = self.repository.update(id, fields).await?;
        tracing::info!(id = %booking.id, "booking updated");
        Ok(booking)
    }

    pub async fn delete(&self, id: &BookingId) -> BookingDeskResult<()> {
        if id.is_blank() {
            return Err(RequestError::MissingId.into());
        }

        let _guard = self.write_guard.lock().await;
        self.repository.delete(id).await?;
        tracing::info!(id = %id, "booking deleted");
        Ok(())
    }

    /// Run the admissibility rule without writing anything
    ///
    /// Uses create semantics unless `exclude` names the booking being edited.
    pub async fn check(
        &self,
        candidate: &Value,
        exclude: Option<BookingId>,
    ) -> BookingDeskResult<BookingFields> {
        let mode = match exclude {
            Some(id) if !id.is_blank() => ValidationMode::Update { exclude: id },
            _ => ValidationMode::Create,
        };
        let existing = self.repository.list().await?;
        self.admit(candidate, &existing, &mode)
    }

    /// Previous, given and next month; defaults to the current month
    pub async fn overview(&self, month: Option<YearMonth>) -> BookingDeskResult<MonthlyOverview> {
        let month = month.unwrap_or_else(|| YearMonth::of(self.clock.today()));
        let bookings = self.repository.list().await?;
        Ok(overview::monthly_overview(&bookings, month))
    }

    pub async fn booked_dates(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        exclude: Option<&BookingId>,
    ) -> BookingDeskResult<Vec<NaiveDate>> {
        let bookings = self.repository.list().await?;
        Ok(overview::booked_dates(&bookings, from, to, exclude))
    }

    fn admit(
        &self,
        candidate: &Value,
        existing: &[Booking],
        mode: &ValidationMode,
    ) -> BookingDeskResult<BookingFields> {
        let degenerate = existing.iter().filter(|b| b.stay().is_none()).count();
        if degenerate > 0 {
            tracing::warn!(count = degenerate, "stored bookings with unordered dates ignored");
        }

        validate(candidate, existing, mode, self.clock.today()).map_err(|rejection| {
            tracing::warn!(code = rejection.error_code(), reason = %rejection, "booking rejected");
            rejection.into()
        })
    }
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService").finish_non_exhaustive()
    }
}
