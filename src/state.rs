use redis::aio::ConnectionManager;

use crate::{
    config::{Config, StorageBackend},
    error::Result,
    repositories::{postgres::PgStore, sqlite::SqliteStore, store::Store},
    services::mailer::Mailer,
    sessions::SessionStore,
};

/// The application's state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The booking store for the configured backend.
    pub store: Store,
    /// The session store.
    pub sessions: SessionStore,
    /// The best-effort outbound mailer.
    pub mailer: Mailer,
    /// Raw Redis handle, used by the login rate limiter.
    pub redis: ConnectionManager,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`: connects the configured booking backend,
    /// initializes its schema, and wires the session store and mailer.
    pub async fn new(config: &Config) -> Result<Self> {
        let store = match config.storage_backend {
            StorageBackend::Postgres => {
                // from_env guarantees the URL is present for this backend
                let url = config.database_url.as_deref().unwrap_or_default();
                let pool = crate::db::create_pool(url)?;
                let store = PgStore::new(pool);
                store.init_schema().await?;
                tracing::info!("Booking store ready (postgres)");
                Store::Postgres(store)
            }
            StorageBackend::Sqlite => {
                let store = SqliteStore::open(&config.sqlite_path)?;
                tracing::info!("Booking store ready (sqlite at {})", config.sqlite_path);
                Store::Sqlite(store)
            }
        };

        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = ConnectionManager::new(redis_client).await?;
        tracing::info!("Redis connection manager initialized");

        let sessions = SessionStore::new(redis.clone(), config.session_duration_hours);

        let mailer = Mailer::from_config(config);
        if mailer.is_enabled() {
            tracing::info!("Mailer configured (relay {})", config.smtp_relay);
        }

        Ok(AppState {
            store,
            sessions,
            mailer,
            redis,
            config: config.clone(),
        })
    }
}
