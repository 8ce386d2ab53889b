//! One-shot setup tool that seeds the admin account.
//!
//! Admins are never created over HTTP; this binary is the only write path
//! into the admins table. Usage: `seed-admin <username> <password>`.

use anyhow::Context;

use bookline::{
    config::{Config, StorageBackend},
    repositories::{postgres::PgStore, sqlite::SqliteStore, store::Store},
    services::auth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let username = args.next().context("usage: seed-admin <username> <password>")?;
    let password = args.next().context("usage: seed-admin <username> <password>")?;

    let config = Config::from_env()?;

    let store = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pg = PgStore::new(bookline::db::create_pool(url)?);
            pg.init_schema().await?;
            Store::Postgres(pg)
        }
        StorageBackend::Sqlite => Store::Sqlite(SqliteStore::open(&config.sqlite_path)?),
    };

    if store.find_admin(&username).await?.is_some() {
        anyhow::bail!("Admin '{}' already exists; refusing to overwrite", username);
    }

    let hash = auth::hash_password(&password)?;
    let admin = store.create_admin(&username, &hash).await?;

    tracing::info!("Admin '{}' created with id {}", admin.username, admin.id);
    println!("Admin user created successfully");
    println!("Username: {}", admin.username);
    println!("Change the password after first login if it was a placeholder.");

    Ok(())
}
