//! Storage implementations for different backends

#[cfg(feature = "airtable")]
pub mod airtable;
pub mod in_memory;

#[cfg(feature = "airtable")]
pub use airtable::AirtableBookingRepository;
pub use in_memory::InMemoryBookingRepository;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::service::BookingRepository;
use anyhow::Result;
use std::sync::Arc;

/// Build the repository selected by configuration
pub fn repository_from_config(config: &StorageConfig) -> Result<Arc<dyn BookingRepository>> {
    match config.backend {
        StorageBackend::InMemory => {
            tracing::info!("using in-memory booking storage");
            Ok(Arc::new(InMemoryBookingRepository::new()))
        }
        #[cfg(feature = "airtable")]
        StorageBackend::Airtable => {
            tracing::info!(
                base_id = %config.airtable.base_id,
                table = %config.airtable.table,
                "using airtable booking storage"
            );
            Ok(Arc::new(AirtableBookingRepository::new(&config.airtable)?))
        }
        #[cfg(not(feature = "airtable"))]
        StorageBackend::Airtable => Err(anyhow::anyhow!(
            "storage backend 'airtable' requires the 'airtable' feature"
        )),
    }
}
