//! Database operations for the shop `PostgreSQL` database.
//!
//! # Schema: `shop`
//!
//! - `shop.user` - Storefront accounts (email + argon2 password hash)
//! - `shop.product` - Catalog managed through the `/admin` routes
//! - session table - Managed by tower-sessions (created by its own migration)
//!
//! # Migrations
//!
//! Migrations live in `crates/shop/migrations/` and run via:
//! ```bash
//! cargo run -p bramble-cli -- migrate
//! ```
//! They are never run at startup.

pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Opening the pool establishes the minimum connections, so a bad connection
/// string or unreachable server fails here rather than on the first request.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
