use std::env;
use anyhow::{Context, Result};

/// Which persistence backend bookings are stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL via deadpool (string-shaped UUID ids).
    Postgres,
    /// Embedded SQLite (integer rowids).
    Sqlite,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The port the HTTP server listens on.
    pub port: u16,
    /// The booking storage backend to use.
    pub storage_backend: StorageBackend,
    /// The URL of the PostgreSQL database (postgres backend only).
    pub database_url: Option<String>,
    /// The path of the SQLite database file (sqlite backend only).
    pub sqlite_path: String,
    /// The URL of the Redis server holding sessions.
    pub redis_url: String,
    /// The duration of an admin session in hours.
    pub session_duration_hours: i64,
    /// The SMTP relay host used for outbound mail.
    pub smtp_relay: String,
    /// SMTP username. Missing credentials disable the mailer.
    pub smtp_username: Option<String>,
    /// SMTP password. Missing credentials disable the mailer.
    pub smtp_password: Option<String>,
    /// The From address for outbound mail. Defaults to `smtp_username`.
    pub mail_from: Option<String>,
    /// The operator address contact messages are forwarded to.
    pub contact_to: Option<String>,
    /// The directory static assets are served from.
    pub public_dir: String,
    /// Whether the session cookie carries the Secure flag.
    /// Set when `APP_ENV=production`.
    pub secure_cookies: bool,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "sqlite" => StorageBackend::Sqlite,
            other => anyhow::bail!("Unknown STORAGE_BACKEND '{}' (expected postgres or sqlite)", other),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }

        let smtp_username = env::var("SMTP_USERNAME").ok().filter(|v| !v.is_empty());
        let smtp_password = env::var("SMTP_PASSWORD").ok().filter(|v| !v.is_empty());

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,
            storage_backend,
            database_url,
            sqlite_path: env::var("SQLITE_PATH")
                .unwrap_or_else(|_| "./bookline.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            session_duration_hours: env::var("SESSION_DURATION_HOURS")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_HOURS")?,
            smtp_relay: env::var("SMTP_RELAY")
                .unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            mail_from: env::var("MAIL_FROM").ok().or_else(|| smtp_username.clone()),
            contact_to: env::var("CONTACT_TO").ok().or_else(|| smtp_username.clone()),
            smtp_username,
            smtp_password,
            public_dir: env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),
            secure_cookies: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                == "production",
        })
    }
}
