use crate::{
    error::Result,
    models::admin::Admin,
    models::booking::{Booking, NewBooking},
    repositories::{postgres::PgStore, sqlite::SqliteStore},
};

/// The booking store, dispatching to whichever backend was configured.
///
/// Both backends expose the same contract and the same external JSON shape;
/// the only divergence between them, the native id type, is normalized into
/// the string-backed `BookingId` inside each backend.
#[derive(Clone)]
pub enum Store {
    Postgres(PgStore),
    Sqlite(SqliteStore),
}

impl Store {
    /// Inserts a new booking with `paid = false`.
    pub async fn create_booking(&self, new: NewBooking) -> Result<Booking> {
        match self {
            Store::Postgres(s) => s.create_booking(new).await,
            Store::Sqlite(s) => s.create_booking(new).await,
        }
    }

    /// Returns all bookings, newest first.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        match self {
            Store::Postgres(s) => s.list_bookings().await,
            Store::Sqlite(s) => s.list_bookings().await,
        }
    }

    /// Sets the paid flag. Idempotent; `None` when the id is unknown.
    pub async fn mark_paid(&self, id: &str) -> Result<Option<Booking>> {
        match self {
            Store::Postgres(s) => s.mark_paid(id).await,
            Store::Sqlite(s) => s.mark_paid(id).await,
        }
    }

    /// Deletes a booking. `false` when the id is unknown.
    pub async fn delete_booking(&self, id: &str) -> Result<bool> {
        match self {
            Store::Postgres(s) => s.delete_booking(id).await,
            Store::Sqlite(s) => s.delete_booking(id).await,
        }
    }

    /// Finds an admin by username.
    pub async fn find_admin(&self, username: &str) -> Result<Option<Admin>> {
        match self {
            Store::Postgres(s) => s.find_admin(username).await,
            Store::Sqlite(s) => s.find_admin(username).await,
        }
    }

    /// Inserts an admin. Called only by the seed-admin binary.
    pub async fn create_admin(&self, username: &str, password_hash: &str) -> Result<Admin> {
        match self {
            Store::Postgres(s) => s.create_admin(username, password_hash).await,
            Store::Sqlite(s) => s.create_admin(username, password_hash).await,
        }
    }
}
