use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;

use crate::{
    error::Result,
    models::admin::Admin,
    models::booking::{Booking, BookingId, NewBooking, Service},
};

/// Schema for the embedded SQLite backend. Mirrors the postgres schema,
/// including the service CHECK, but with integer autoincrement ids.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    service TEXT NOT NULL CHECK (
        service IN ('website-design', 'web-development', 'consultation', 'maintenance')
    ),
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    paid INTEGER NOT NULL DEFAULT 0,
    stripe_session_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// SQLite implementation of the booking store contract.
///
/// Ids are integer rowids, normalized to their decimal string form at the
/// boundary. The connection is shared behind an async mutex; every operation
/// is a single statement (or statement-plus-readback) under one lock scope.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

fn row_to_booking(row: &rusqlite::Row<'_>) -> rusqlite::Result<Booking> {
    let id: i64 = row.get("id")?;
    let service: String = row.get("service")?;
    let service = Service::parse(&service).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            service.len(),
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::other(format!("unknown service '{service}'"))),
        )
    })?;
    Ok(Booking {
        id: BookingId::new(id.to_string()),
        name: row.get("name")?,
        email: row.get("email")?,
        service,
        date: row.get("date")?,
        time: row.get("time")?,
        notes: row.get("notes")?,
        paid: row.get("paid")?,
        stripe_session_id: row.get("stripe_session_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn row_to_admin(row: &rusqlite::Row<'_>) -> rusqlite::Result<Admin> {
    let id: i64 = row.get("id")?;
    Ok(Admin {
        id: id.to_string(),
        username: row.get("username")?,
        password_hash: row.get("password")?,
        created_at: row.get("created_at")?,
    })
}

impl SqliteStore {
    /// Opens or creates the database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Inserts a new booking with `paid = 0`.
    pub async fn create_booking(&self, new: NewBooking) -> Result<Booking> {
        let conn = self.conn.lock().await;
        let now = Utc::now();
        conn.execute(
            r#"
            INSERT INTO bookings
                (name, email, service, date, time, notes, paid, stripe_session_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?8)
            "#,
            params![
                new.name,
                new.email,
                new.service.as_str(),
                new.date,
                new.time,
                new.notes,
                new.stripe_session_id,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();
        let booking = conn.query_row(
            "SELECT * FROM bookings WHERE id = ?1",
            params![id],
            row_to_booking,
        )?;
        Ok(booking)
    }

    /// Returns all bookings, newest first.
    ///
    /// Rowids are monotonic per insert, so they break created_at ties in
    /// true insertion order.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT * FROM bookings ORDER BY created_at DESC, id DESC")?;
        let rows = stmt.query_map([], row_to_booking)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Sets `paid = 1`. Returns `None` when the id is unknown.
    pub async fn mark_paid(&self, id: &str) -> Result<Option<Booking>> {
        let Ok(id) = id.parse::<i64>() else {
            // Not an integer, so not an id this backend ever issued.
            return Ok(None);
        };
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE bookings SET paid = 1, updated_at = ?2 WHERE id = ?1",
            params![id, Utc::now()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let booking = conn.query_row(
            "SELECT * FROM bookings WHERE id = ?1",
            params![id],
            row_to_booking,
        )?;
        Ok(Some(booking))
    }

    /// Deletes a booking. Returns `false` when the id is unknown.
    pub async fn delete_booking(&self, id: &str) -> Result<bool> {
        let Ok(id) = id.parse::<i64>() else {
            return Ok(false);
        };
        let conn = self.conn.lock().await;
        let deleted = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Finds an admin by username.
    pub async fn find_admin(&self, username: &str) -> Result<Option<Admin>> {
        let conn = self.conn.lock().await;
        let admin = conn
            .query_row(
                "SELECT * FROM admins WHERE username = ?1",
                params![username],
                row_to_admin,
            )
            .optional()?;
        Ok(admin)
    }

    /// Inserts an admin. Seeding path only; the HTTP surface never calls this.
    pub async fn create_admin(&self, username: &str, password_hash: &str) -> Result<Admin> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO admins (username, password, created_at) VALUES (?1, ?2, ?3)",
            params![username, password_hash, Utc::now()],
        )?;
        let id = conn.last_insert_rowid();
        let admin = conn.query_row(
            "SELECT * FROM admins WHERE id = ?1",
            params![id],
            row_to_admin,
        )?;
        Ok(admin)
    }
}
