use chrono::{NaiveDate, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::admin::Admin,
    models::booking::{Booking, BookingId, NewBooking, Service},
};

/// Schema for the postgres booking backend. The service column carries the
/// same CHECK the handler enforces, so a bad value is rejected at either layer.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bookings (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    service TEXT NOT NULL CHECK (
        service IN ('website-design', 'web-development', 'consultation', 'maintenance')
    ),
    date DATE NOT NULL,
    time TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    paid BOOLEAN NOT NULL DEFAULT FALSE,
    stripe_session_id TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS admins (
    id UUID PRIMARY KEY,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

/// PostgreSQL implementation of the booking store contract.
///
/// Ids are v4 UUIDs, normalized to their string form at the boundary.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

/// A helper function to map a `tokio_postgres::Row` to a `Booking`.
fn row_to_booking(row: &Row) -> Result<Booking> {
    let id: Uuid = row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?;
    let service: String = row.try_get("service").map_err(|_| AppError::MissingData("service".to_string()))?;
    let service = Service::parse(&service)
        .ok_or_else(|| AppError::MissingData("service".to_string()))?;
    let date: NaiveDate = row.try_get("date").map_err(|_| AppError::MissingData("date".to_string()))?;
    Ok(Booking {
        id: BookingId::new(id.to_string()),
        name: row.try_get("name").map_err(|_| AppError::MissingData("name".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        service,
        date,
        time: row.try_get("time").map_err(|_| AppError::MissingData("time".to_string()))?,
        notes: row.try_get("notes").map_err(|_| AppError::MissingData("notes".to_string()))?,
        paid: row.try_get("paid").map_err(|_| AppError::MissingData("paid".to_string()))?,
        stripe_session_id: row.try_get("stripe_session_id").map_err(|_| AppError::MissingData("stripe_session_id".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
        updated_at: row.try_get("updated_at").map_err(|_| AppError::MissingData("updated_at".to_string()))?,
    })
}

/// A helper function to map a `tokio_postgres::Row` to an `Admin`.
fn row_to_admin(row: &Row) -> Result<Admin> {
    let id: Uuid = row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?;
    Ok(Admin {
        id: id.to_string(),
        username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        password_hash: row.try_get("password").map_err(|_| AppError::MissingData("password".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

impl PgStore {
    /// Wraps an existing pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates the bookings and admins tables if they do not exist.
    pub async fn init_schema(&self) -> Result<()> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        Ok(())
    }

    /// Inserts a new booking with `paid = false`.
    pub async fn create_booking(&self, new: NewBooking) -> Result<Booking> {
        let client = self.pool.get().await?;
        let id = Uuid::new_v4();
        let now = Utc::now();
        let row = client
            .query_one(
                r#"
                INSERT INTO bookings
                    (id, name, email, service, date, time, notes, paid, stripe_session_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $9, $9)
                RETURNING *
                "#,
                &[
                    &id,
                    &new.name,
                    &new.email,
                    &new.service.as_str(),
                    &new.date,
                    &new.time,
                    &new.notes,
                    &new.stripe_session_id,
                    &now,
                ],
            )
            .await?;
        row_to_booking(&row)
    }

    /// Returns all bookings, newest first.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT *
                FROM bookings
                ORDER BY created_at DESC
                "#,
                &[],
            )
            .await?;
        rows.iter().map(row_to_booking).collect()
    }

    /// Sets `paid = true`. Returns `None` when the id is unknown.
    ///
    /// An unconditional field set, so calling it on an already-paid booking
    /// succeeds with no observable change.
    pub async fn mark_paid(&self, id: &str) -> Result<Option<Booking>> {
        let Ok(id) = Uuid::parse_str(id) else {
            // Not a UUID, so not an id this backend ever issued.
            return Ok(None);
        };
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                UPDATE bookings
                SET paid = TRUE, updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
                &[&id],
            )
            .await?;
        row.map(|r| row_to_booking(&r)).transpose()
    }

    /// Deletes a booking. Returns `false` when the id is unknown.
    pub async fn delete_booking(&self, id: &str) -> Result<bool> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(false);
        };
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM bookings WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }

    /// Finds an admin by username.
    pub async fn find_admin(&self, username: &str) -> Result<Option<Admin>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM admins
                WHERE username = $1
                "#,
                &[&username],
            )
            .await?;
        row.map(|r| row_to_admin(&r)).transpose()
    }

    /// Inserts an admin. Seeding path only; the HTTP surface never calls this.
    pub async fn create_admin(&self, username: &str, password_hash: &str) -> Result<Admin> {
        let client = self.pool.get().await?;
        let id = Uuid::new_v4();
        let row = client
            .query_one(
                r#"
                INSERT INTO admins (id, username, password)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
                &[&id, &username, &password_hash],
            )
            .await?;
        row_to_admin(&row)
    }
}
