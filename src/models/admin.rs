use chrono::{DateTime, Utc};

/// The privileged actor who manages bookings.
///
/// Admins are seeded out-of-band by the `seed-admin` binary and are
/// read-only as far as the HTTP surface is concerned.
#[derive(Debug, Clone)]
pub struct Admin {
    /// The backend-assigned identifier, normalized to a string.
    pub id: String,
    /// The unique login name.
    pub username: String,
    /// The argon2id PHC-format password hash.
    pub password_hash: String,
    /// The timestamp when the admin was created.
    pub created_at: DateTime<Utc>,
}
