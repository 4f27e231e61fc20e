//! Database migration command.
//!
//! Runs the shop migrations from `crates/shop/migrations/`, then lets the
//! session store create its own table. The server never migrates at startup;
//! this command is the only migration path.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions_sqlx_store::PostgresStore;

use super::CommandError;

/// Run all database migrations.
pub async fn run() -> Result<(), CommandError> {
    let database_url = bramble_shop::config::database_url_from_env()?;

    tracing::info!("Connecting to shop database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../shop/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete");
    Ok(())
}
