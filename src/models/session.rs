use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-held proof of a successful admin login.
///
/// Stored in Redis keyed by the UUID carried in the client's session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The id of the admin this session belongs to.
    pub admin_id: String,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired at `now`.
    ///
    /// Redis TTLs already evict expired sessions; this is the authoritative
    /// check for the window between logical and physical expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring_at(expires_at: DateTime<Utc>) -> Session {
        Session {
            admin_id: "1".to_string(),
            created_at: expires_at - Duration::hours(12),
            expires_at,
        }
    }

    #[test]
    fn session_is_live_before_expiry() {
        let now = Utc::now();
        let session = session_expiring_at(now + Duration::minutes(1));
        assert!(!session.is_expired(now));
    }

    #[test]
    fn session_is_expired_after_expiry() {
        let now = Utc::now();
        let session = session_expiring_at(now - Duration::seconds(1));
        assert!(session.is_expired(now));
    }

    #[test]
    fn session_at_exact_expiry_is_still_live() {
        let now = Utc::now();
        let session = session_expiring_at(now);
        assert!(!session.is_expired(now));
    }
}
