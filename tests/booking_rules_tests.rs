//! Booking rules enforced by BookingService
//!
//! These tests drive the service the way the HTTP handlers do: raw JSON
//! candidates in, typed errors out, with a fixed clock so "today" is stable.

mod storage_harness;

use booking_desk::prelude::*;
use booking_desk::core::error::RequestError;
use booking_desk::core::overview::YearMonth;
use serde_json::json;
use std::sync::Arc;
use storage_harness::*;

fn service_with(bookings: Vec<Booking>) -> (BookingService, InMemoryBookingRepository) {
    let repo = InMemoryBookingRepository::with_bookings(bookings);
    let clock = FixedClock::on(day(6, 1));
    let service = BookingService::new(Arc::new(repo.clone()), Arc::new(clock));
    (service, repo)
}

fn assert_no_overlaps(bookings: &[Booking]) {
    for a in bookings {
        for b in bookings {
            if a.id != b.id {
                let clash = a.fields.checkin_date < b.fields.checkout_date
                    && b.fields.checkin_date < a.fields.checkout_date;
                assert!(!clash, "{} overlaps {}", a.id, b.id);
            }
        }
    }
}

// =============================================================================
// Overlap
// =============================================================================

mod overlap_tests {
    use super::*;

    #[tokio::test]
    async fn test_back_to_back_insert_succeeds() {
        let (service, _) = service_with(vec![]);
        service.create(&candidate("2025-06-10", "2025-06-12")).await.unwrap();
        service.create(&candidate("2025-06-12", "2025-06-14")).await.unwrap();

        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_overlapping_insert_is_rejected() {
        let (service, _) = service_with(vec![]);
        let first = service.create(&candidate("2025-06-10", "2025-06-12")).await.unwrap();

        let err = service
            .create(&candidate("2025-06-11", "2025-06-13"))
            .await
            .unwrap_err();
        match err {
            BookingDeskError::Rejected(Rejection::OverlapConflict { conflicting_id }) => {
                assert_eq!(conflicting_id, first.id)
            }
            other => panic!("expected overlap, got {other:?}"),
        }
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_enclosing_insert_is_rejected() {
        let (service, _) = service_with(vec![stored("recA", day(6, 10), day(6, 12))]);
        let err = service
            .create(&candidate("2025-06-05", "2025-06-20"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "OVERLAP_CONFLICT");
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_editing_against_itself_is_never_overlap() {
        let (service, _) = service_with(vec![stored("recX", day(6, 10), day(6, 12))]);
        let updated = service
            .update(&BookingId::new("recX"), &candidate("2025-06-10", "2025-06-12"))
            .await
            .unwrap();
        assert_eq!(updated.id.as_str(), "recX");
    }

    #[tokio::test]
    async fn test_edit_into_another_booking_is_rejected() {
        let (service, _) = service_with(vec![
            stored("recA", day(6, 10), day(6, 12)),
            stored("recB", day(6, 14), day(6, 16)),
        ]);
        let err = service
            .update(&BookingId::new("recA"), &candidate("2025-06-11", "2025-06-15"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingDeskError::Rejected(Rejection::OverlapConflict { ref conflicting_id })
                if conflicting_id.as_str() == "recB"
        ));
    }

    #[tokio::test]
    async fn test_stored_set_never_overlaps_after_mixed_writes() {
        let (service, repo) = service_with(vec![]);
        let attempts = [
            ("2025-06-01", "2025-06-05"),
            ("2025-06-04", "2025-06-06"),
            ("2025-06-05", "2025-06-08"),
            ("2025-06-07", "2025-06-09"),
            ("2025-06-02", "2025-06-03"),
            ("2025-06-08", "2025-06-10"),
            ("2025-05-30", "2025-06-20"),
        ];
        for (checkin, checkout) in attempts {
            let _ = service.create(&candidate(checkin, checkout)).await;
        }

        let stored = repo.list().await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_no_overlaps(&stored);
    }

    #[tokio::test]
    async fn test_concurrent_creates_for_same_dates_admit_one() {
        let (service, repo) = service_with(vec![]);
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create(&candidate("2025-06-10", "2025-06-12")).await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}

// =============================================================================
// Validation order
// =============================================================================

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_advance_above_booking_wins_over_overlap() {
        let (service, _) = service_with(vec![stored("recA", day(6, 10), day(6, 12))]);
        let mut raw = candidate("2025-06-10", "2025-06-12");
        raw["bookingAmount"] = json!(100);
        raw["advanceAmount"] = json!(150);

        let err = service.create(&raw).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FIELD_VALUE");
        assert_eq!(
            err.to_string(),
            "Advance amount cannot be greater than booking amount"
        );
    }

    #[tokio::test]
    async fn test_same_day_checkout_is_order_violation() {
        let (service, _) = service_with(vec![stored("recA", day(6, 9), day(6, 12))]);
        let err = service
            .create(&candidate("2025-06-10", "2025-06-10"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "DATE_ORDER_VIOLATION");
    }

    #[tokio::test]
    async fn test_past_checkin_create_rejected_but_update_allowed() {
        let (service, _) = service_with(vec![stored("recOld", day(6, 10), day(6, 12))]);

        let err = service
            .create(&candidate("2025-05-31", "2025-06-02"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PAST_CHECKIN");

        let updated = service
            .update(&BookingId::new("recOld"), &candidate("2025-05-31", "2025-06-02"))
            .await
            .unwrap();
        assert_eq!(updated.fields.checkin_date, day(5, 31));
    }

    #[tokio::test]
    async fn test_rejected_write_changes_nothing() {
        let (service, repo) = service_with(vec![stored("recA", day(6, 10), day(6, 12))]);
        let mut raw = candidate("2025-06-20", "2025-06-22");
        raw["customerPhone"] = json!("123");

        assert!(service.create(&raw).await.is_err());
        assert!(service.update(&BookingId::new("recA"), &raw).await.is_err());

        let stored_now = repo.list().await.unwrap();
        assert_eq!(stored_now, vec![stored("recA", day(6, 10), day(6, 12))]);
    }
}

// =============================================================================
// Round trips
// =============================================================================

mod round_trip_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_read_back() {
        let (service, _) = service_with(vec![]);
        let mut raw = candidate("2025-06-10", "2025-06-12");
        raw["customerName"] = json!("  Asha Rao ");

        let created = service.create(&raw).await.unwrap();
        assert_eq!(created.created_at, FixedClock::on(day(6, 1)).now());

        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.fields.customer_name, "Asha Rao");
        assert_eq!(fetched.fields, fields(day(6, 10), day(6, 12)));
    }

    #[tokio::test]
    async fn test_update_then_read_back_keeps_identity() {
        let (service, _) = service_with(vec![]);
        let created = service.create(&candidate("2025-06-10", "2025-06-12")).await.unwrap();

        let mut raw = candidate("2025-06-15", "2025-06-18");
        raw["numberOfGuests"] = json!(4);
        service.update(&created.id, &raw).await.unwrap();

        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.created_at, created.created_at);
        assert_eq!(fetched.fields.checkin_date, day(6, 15));
        assert_eq!(fetched.fields.number_of_guests, 4);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let (service, _) = service_with(vec![]);
        let missing = BookingId::new("recNope");

        assert_eq!(service.get(&missing).await.unwrap_err().error_code(), "BOOKING_NOT_FOUND");
        assert_eq!(
            service
                .update(&missing, &candidate("2025-06-10", "2025-06-12"))
                .await
                .unwrap_err()
                .error_code(),
            "BOOKING_NOT_FOUND"
        );
        assert_eq!(service.delete(&missing).await.unwrap_err().error_code(), "BOOKING_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_blank_id_is_bad_request() {
        let (service, _) = service_with(vec![]);
        let err = service.delete(&BookingId::new("  ")).await.unwrap_err();
        assert!(matches!(err, BookingDeskError::Request(RequestError::MissingId)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_frees_dates() {
        let (service, _) = service_with(vec![]);
        let created = service.create(&candidate("2025-06-10", "2025-06-12")).await.unwrap();
        service.delete(&created.id).await.unwrap();

        service.create(&candidate("2025-06-10", "2025-06-12")).await.unwrap();
    }
}

// =============================================================================
// Advisory check, overview and calendar agree with the write path
// =============================================================================

mod shared_rule_tests {
    use super::*;

    #[tokio::test]
    async fn test_check_matches_create() {
        let (service, repo) = service_with(vec![stored("recA", day(6, 10), day(6, 12))]);

        let clash = candidate("2025-06-11", "2025-06-13");
        assert_eq!(
            service.check(&clash, None).await.unwrap_err().error_code(),
            service.create(&clash).await.unwrap_err().error_code()
        );

        let free = candidate("2025-06-12", "2025-06-13");
        let checked = service.check(&free, None).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);
        let created = service.create(&free).await.unwrap();
        assert_eq!(checked, created.fields);
    }

    #[tokio::test]
    async fn test_check_with_exclude_uses_update_rules() {
        let (service, _) = service_with(vec![stored("recA", day(5, 20), day(5, 22))]);
        let raw = candidate("2025-05-20", "2025-05-23");

        assert_eq!(service.check(&raw, None).await.unwrap_err().error_code(), "PAST_CHECKIN");
        assert!(service.check(&raw, Some(BookingId::new("recA"))).await.is_ok());
    }

    #[tokio::test]
    async fn test_overview_and_calendar_use_half_open_rule() {
        let (service, _) = service_with(vec![
            stored("recMay", day(5, 29), day(6, 1)),
            stored("recJune", day(6, 10), day(6, 12)),
        ]);

        let overview = service.overview(None).await.unwrap();
        assert_eq!(overview.current.month, YearMonth::new(2025, 6).unwrap());
        let june_ids: Vec<_> = overview.current.bookings.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(june_ids, vec!["recJune"]);
        assert_eq!(overview.previous.total_bookings, 1);
        assert_eq!(overview.next.total_bookings, 0);

        let dates = service.booked_dates(None, None, None).await.unwrap();
        assert!(!dates.contains(&day(6, 1)));
        assert!(dates.contains(&day(5, 31)));
        assert!(!dates.contains(&day(6, 12)));
        assert!(dates.contains(&day(6, 11)));
    }

    #[tokio::test]
    async fn test_free_calendar_day_is_bookable() {
        let (service, _) = service_with(vec![stored("recA", day(6, 10), day(6, 12))]);
        let dates = service.booked_dates(None, None, None).await.unwrap();

        let checkin = day(6, 12);
        assert!(!dates.contains(&checkin));
        service
            .create(&candidate(&checkin.to_string(), "2025-06-13"))
            .await
            .unwrap();
    }
}
