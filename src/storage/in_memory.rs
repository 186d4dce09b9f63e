//! In-memory implementation of BookingRepository for testing and development

use crate::core::booking::{Booking, BookingFields, BookingId};
use crate::core::error::StorageError;
use crate::core::service::BookingRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory booking repository
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Ids look like the hosted backend's: `rec` followed by 14 characters.
#[derive(Clone)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            bookings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a repository pre-loaded with stored bookings
    ///
    /// Records are taken as-is, without validation, the way an external store
    /// may already hold them.
    pub fn with_bookings(bookings: impl IntoIterator<Item = Booking>) -> Self {
        let map = bookings
            .into_iter()
            .map(|booking| (booking.id.clone(), booking))
            .collect();
        Self {
            bookings: Arc::new(RwLock::new(map)),
        }
    }

    fn next_id() -> BookingId {
        let raw = Uuid::new_v4().simple().to_string();
        BookingId::new(format!("rec{}", &raw[..14]))
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Lock {
        message: e.to_string(),
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn list(&self) -> Result<Vec<Booking>, StorageError> {
        let bookings = self.bookings.read().map_err(lock_error)?;

        let mut all: Vec<Booking> = bookings.values().cloned().collect();
        all.sort_by(|a, b| {
            a.fields
                .checkin_date
                .cmp(&b.fields.checkin_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        tracing::debug!(count = all.len(), "listed bookings from memory");
        Ok(all)
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, StorageError> {
        let bookings = self.bookings.read().map_err(lock_error)?;

        Ok(bookings.get(id).cloned())
    }

    async fn create(
        &self,
        fields: BookingFields,
        created_at: DateTime<Utc>,
    ) -> Result<Booking, StorageError> {
        let mut bookings = self.bookings.write().map_err(lock_error)?;

        let mut id = Self::next_id();
        while bookings.contains_key(&id) {
            id = Self::next_id();
        }

        let booking = Booking::new(id.clone(), fields, created_at);
        bookings.insert(id, booking.clone());

        Ok(booking)
    }

    async fn update(
        &self,
        id: &BookingId,
        fields: BookingFields,
    ) -> Result<Booking, StorageError> {
        let mut bookings = self.bookings.write().map_err(lock_error)?;

        let booking = bookings
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound { id: id.clone() })?;
        booking.replace_fields(fields);

        Ok(booking.clone())
    }

    async fn delete(&self, id: &BookingId) -> Result<(), StorageError> {
        let mut bookings = self.bookings.write().map_err(lock_error)?;

        bookings
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound { id: id.clone() })
    }
}
