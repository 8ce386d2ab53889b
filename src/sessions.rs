use chrono::Utc;
use redis::{AsyncCommands, aio::ConnectionManager};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::Session,
};

/// The server-side session store: create/read/destroy over Redis.
///
/// Keys are `session:{uuid}`, values the JSON-serialized [`Session`]. Expiry
/// is enforced twice: a Redis TTL evicts the key, and `get` checks
/// `expires_at` for the window before eviction lands.
#[derive(Clone)]
pub struct SessionStore {
    redis: ConnectionManager,
    duration_hours: i64,
}

impl SessionStore {
    pub fn new(redis: ConnectionManager, duration_hours: i64) -> Self {
        Self {
            redis,
            duration_hours,
        }
    }

    fn key(id: &Uuid) -> String {
        format!("session:{}", id)
    }

    /// Creates a session for `admin_id` and returns its cookie value.
    pub async fn create(&self, admin_id: &str) -> Result<Uuid> {
        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let session = Session {
            admin_id: admin_id.to_string(),
            created_at: now,
            expires_at: now + chrono::Duration::hours(self.duration_hours),
        };

        let session_json = sonic_rs::to_string(&session)
            .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

        let ttl_seconds = (self.duration_hours * 3600) as u64;
        let mut redis = self.redis.clone();
        let _: () = redis
            .set_ex(Self::key(&session_id), &session_json, ttl_seconds)
            .await?;

        tracing::debug!("Session created for admin {}", admin_id);
        Ok(session_id)
    }

    /// Looks up a session. `None` for unknown, evicted, or expired ids.
    pub async fn get(&self, session_id: &Uuid) -> Result<Option<Session>> {
        let mut redis = self.redis.clone();
        let session_json: Option<String> = redis.get(Self::key(session_id)).await?;

        let Some(session_json) = session_json else {
            return Ok(None);
        };

        let session: Session = sonic_rs::from_str(&session_json)
            .map_err(|e| AppError::Internal(format!("Invalid session JSON: {}", e)))?;

        if session.is_expired(Utc::now()) {
            let _: () = redis.del(Self::key(session_id)).await.unwrap_or(());
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Destroys a session unconditionally. Destroying an unknown id is a no-op.
    pub async fn destroy(&self, session_id: &Uuid) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(Self::key(session_id)).await?;
        tracing::debug!("Session destroyed: {}", session_id);
        Ok(())
    }
}
