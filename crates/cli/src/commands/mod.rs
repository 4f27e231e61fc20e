//! CLI commands.

pub mod migrate;
pub mod seed;

use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration (environment) error.
    #[error("configuration error: {0}")]
    Config(#[from] bramble_shop::config::ConfigError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository error while seeding.
    #[error("repository error: {0}")]
    Repository(#[from] bramble_shop::db::RepositoryError),

    /// Authentication service error while seeding.
    #[error("auth error: {0}")]
    Auth(#[from] bramble_shop::services::AuthError),

    /// Inconsistent seed data or state.
    #[error("seed error: {0}")]
    Seed(String),
}
