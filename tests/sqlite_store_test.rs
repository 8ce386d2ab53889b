//! Booking store contract tests, run against the in-memory SQLite backend
//! so they need no external services. The postgres backend implements the
//! same contract behind the same `Store` dispatch.

use chrono::NaiveDate;

use bookline::models::booking::{NewBooking, Service};
use bookline::repositories::sqlite::SqliteStore;
use bookline::repositories::store::Store;
use bookline::services::auth;
use bookline::services::mailer::Mailer;

fn new_booking(name: &str, service: Service) -> NewBooking {
    NewBooking {
        name: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase()),
        service,
        date: NaiveDate::from_ymd_opt(2030, 6, 15).unwrap(),
        time: "10:00".to_string(),
        notes: String::new(),
        stripe_session_id: None,
    }
}

fn store() -> Store {
    Store::Sqlite(SqliteStore::open_in_memory().unwrap())
}

#[tokio::test]
async fn created_bookings_default_to_unpaid() {
    let store = store();
    let booking = store
        .create_booking(new_booking("Ann", Service::Consultation))
        .await
        .unwrap();

    assert!(!booking.paid);
    assert_eq!(booking.service, Service::Consultation);
    assert_eq!(booking.email, "ann@x.com");
    assert_eq!(booking.stripe_session_id, None);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let store = store();
    store.create_booking(new_booking("First", Service::Consultation)).await.unwrap();
    store.create_booking(new_booking("Second", Service::Maintenance)).await.unwrap();
    let newest = store
        .create_booking(new_booking("Third", Service::WebDevelopment))
        .await
        .unwrap();

    let bookings = store.list_bookings().await.unwrap();
    assert_eq!(bookings.len(), 3);
    assert_eq!(bookings[0].id, newest.id);
    assert_eq!(bookings[0].name, "Third");
    assert_eq!(bookings[2].name, "First");
}

#[tokio::test]
async fn mark_paid_is_idempotent() {
    let store = store();
    let booking = store
        .create_booking(new_booking("Ann", Service::Consultation))
        .await
        .unwrap();

    let first = store.mark_paid(booking.id.as_str()).await.unwrap().unwrap();
    assert!(first.paid);

    // Second call on the same id succeeds with no observable change.
    let second = store.mark_paid(booking.id.as_str()).await.unwrap().unwrap();
    assert!(second.paid);
    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn mark_paid_unknown_id_is_not_found() {
    let store = store();
    assert!(store.mark_paid("999").await.unwrap().is_none());
    // An id shaped for the other backend is unknown here, not an error.
    assert!(store.mark_paid("27b2e4a2-1a55-4cc8-9e8f-000000000000").await.unwrap().is_none());
    assert!(store.mark_paid("not-an-id").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_unknown_id_is_not_found_before_and_after_other_deletes() {
    let store = store();
    let keep = store.create_booking(new_booking("Keep", Service::Consultation)).await.unwrap();
    let gone = store.create_booking(new_booking("Gone", Service::Maintenance)).await.unwrap();

    assert!(!store.delete_booking("999").await.unwrap());

    assert!(store.delete_booking(gone.id.as_str()).await.unwrap());
    // No id-reuse confusion after an unrelated delete.
    assert!(!store.delete_booking("999").await.unwrap());
    assert!(!store.delete_booking(gone.id.as_str()).await.unwrap());

    let remaining = store.list_bookings().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
}

#[tokio::test]
async fn deleted_bookings_disappear_from_listing() {
    let store = store();
    let booking = store
        .create_booking(new_booking("Ann", Service::Consultation))
        .await
        .unwrap();

    store.mark_paid(booking.id.as_str()).await.unwrap().unwrap();
    assert!(store.delete_booking(booking.id.as_str()).await.unwrap());
    assert!(store.list_bookings().await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_lookup_round_trips_through_password_hash() {
    let store = store();
    let hash = auth::hash_password("admin123").unwrap();
    let created = store.create_admin("admin", &hash).await.unwrap();

    let found = store.find_admin("admin").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(auth::verify_password("admin123", &found.password_hash).unwrap());

    assert!(store.find_admin("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_user_and_wrong_password_fail_identically() {
    let store = store();
    let hash = auth::hash_password("admin123").unwrap();
    store.create_admin("admin", &hash).await.unwrap();

    let wrong_pw = auth::authenticate_admin(&store, "admin", "wrong").await.unwrap_err();
    let no_user = auth::authenticate_admin(&store, "ghost", "admin123").await.unwrap_err();

    // Same error shape either way: no user-existence oracle.
    assert_eq!(wrong_pw.to_string(), no_user.to_string());
}

#[tokio::test]
async fn disabled_mailer_leaves_booking_state_untouched() {
    // Notification is eventual, not guaranteed: a dead mailer must not
    // change what was persisted.
    let store = store();
    let booking = store
        .create_booking(new_booking("Ann", Service::Consultation))
        .await
        .unwrap();

    Mailer::disabled().dispatch_booking_confirmation(&booking);

    let listed = store.list_bookings().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, booking.id);
    assert!(!listed[0].paid);
}

#[tokio::test]
async fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookline.db");

    let id = {
        let store = Store::Sqlite(SqliteStore::open(&path).unwrap());
        store
            .create_booking(new_booking("Ann", Service::WebsiteDesign))
            .await
            .unwrap()
            .id
    };

    let reopened = Store::Sqlite(SqliteStore::open(&path).unwrap());
    let bookings = reopened.list_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, id);
    assert_eq!(bookings[0].service, Service::WebsiteDesign);
}

#[tokio::test]
async fn booking_json_shape_is_backend_agnostic() {
    let store = store();
    let booking = store
        .create_booking(new_booking("Ann", Service::Consultation))
        .await
        .unwrap();

    let json = serde_json::to_value(&booking).unwrap();
    // The id is a string regardless of the backend's native id type.
    assert!(json["id"].is_string());
    assert_eq!(json["service"], "consultation");
    assert_eq!(json["paid"], false);
    assert_eq!(json["date"], "2030-06-15");
}
