//! Macro-generated test suite for `BookingRepository` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use booking_desk::storage::InMemoryBookingRepository;
//!
//! booking_repository_tests!(InMemoryBookingRepository::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`: create then read back, all fields equal
//! - `test_get_nonexistent`: unknown id returns None
//! - `test_list_empty`: empty store lists nothing
//! - `test_list_sorted_by_checkin`: list order follows check-in
//! - `test_update_replaces_fields`: id and createdAt survive an update
//! - `test_update_nonexistent`: unknown id is `StorageError::NotFound`
//! - `test_delete_existing`: delete then get returns None
//! - `test_delete_nonexistent`: unknown id is `StorageError::NotFound`
//!
//! ## Edge Cases
//! - `test_ids_are_unique`: many creates never reuse an id
//! - `test_concurrent_creates`: parallel creates from spawned tasks

/// Generate a full `BookingRepository` conformance test suite.
///
/// `$factory` is re-evaluated for each test. It may contain `.await`. For the
/// concurrent test the repository must also be `Clone + 'static`.
#[macro_export]
macro_rules! booking_repository_tests {
    ($factory:expr) => {
        mod booking_repository_contract_tests {
            use super::*;
            use booking_desk::core::booking::BookingId;
            use booking_desk::core::error::StorageError;
            use booking_desk::core::service::BookingRepository;
            use std::collections::HashSet;

            // ==================================================================
            // CRUD: Create & Get
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let repo = $factory;
                let created = repo
                    .create(fields(day(6, 10), day(6, 12)), created_at())
                    .await
                    .unwrap();

                assert!(!created.id.is_blank());
                assert_eq!(created.fields, fields(day(6, 10), day(6, 12)));
                assert_eq!(created.created_at, created_at());

                let fetched = repo.get(&created.id).await.unwrap().unwrap();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let repo = $factory;
                let found = repo.get(&BookingId::new("recDoesNotExist1")).await.unwrap();
                assert!(found.is_none());
            }

            // ==================================================================
            // CRUD: List
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let repo = $factory;
                assert!(repo.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_sorted_by_checkin() {
                let repo = $factory;
                for (checkin, checkout) in [(20, 22), (3, 5), (12, 14)] {
                    repo.create(fields(day(7, checkin), day(7, checkout)), created_at())
                        .await
                        .unwrap();
                }

                let checkins: Vec<_> = repo
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|b| b.fields.checkin_date)
                    .collect();
                assert_eq!(checkins, vec![day(7, 3), day(7, 12), day(7, 20)]);
            }

            // ==================================================================
            // CRUD: Update
            // ==================================================================

            #[tokio::test]
            async fn test_update_replaces_fields() {
                let repo = $factory;
                let original = repo
                    .create(fields(day(6, 10), day(6, 12)), created_at())
                    .await
                    .unwrap();

                let mut changed = fields(day(6, 15), day(6, 18));
                changed.customer_name = "Ravi Kumar".to_string();
                changed.number_of_guests = 5;

                let updated = repo.update(&original.id, changed.clone()).await.unwrap();
                assert_eq!(updated.id, original.id);
                assert_eq!(updated.created_at, original.created_at);
                assert_eq!(updated.fields, changed);

                let fetched = repo.get(&original.id).await.unwrap().unwrap();
                assert_eq!(fetched.fields, changed);
                assert_eq!(fetched.created_at, original.created_at);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let repo = $factory;
                let err = repo
                    .update(&BookingId::new("recDoesNotExist1"), fields(day(6, 1), day(6, 2)))
                    .await
                    .unwrap_err();
                assert!(matches!(err, StorageError::NotFound { .. }), "got {err:?}");
            }

            // ==================================================================
            // CRUD: Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_existing() {
                let repo = $factory;
                let created = repo
                    .create(fields(day(6, 10), day(6, 12)), created_at())
                    .await
                    .unwrap();

                repo.delete(&created.id).await.unwrap();
                assert!(repo.get(&created.id).await.unwrap().is_none());
                assert!(repo.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let repo = $factory;
                let err = repo
                    .delete(&BookingId::new("recDoesNotExist1"))
                    .await
                    .unwrap_err();
                assert!(matches!(err, StorageError::NotFound { .. }), "got {err:?}");
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_ids_are_unique() {
                let repo = $factory;
                let mut ids = HashSet::new();
                for offset in 0..20u32 {
                    let checkin = day(8, 1) + chrono::Duration::days(offset.into());
                    let checkout = checkin + chrono::Duration::days(1);
                    let booking = repo.create(fields(checkin, checkout), created_at()).await.unwrap();
                    assert!(ids.insert(booking.id));
                }
                assert_eq!(repo.list().await.unwrap().len(), 20);
            }

            #[tokio::test]
            async fn test_concurrent_creates() {
                let repo = $factory;
                let mut handles = Vec::new();
                for offset in 0..10u32 {
                    let repo = repo.clone();
                    handles.push(tokio::spawn(async move {
                        let checkin = day(9, 1) + chrono::Duration::days(offset.into());
                        let checkout = checkin + chrono::Duration::days(1);
                        repo.create(fields(checkin, checkout), created_at()).await
                    }));
                }
                for handle in handles {
                    handle.await.unwrap().unwrap();
                }
                assert_eq!(repo.list().await.unwrap().len(), 10);
            }
        }
    };
}
