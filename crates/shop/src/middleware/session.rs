//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions, with the cookie
//! signed by the configured session secret.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ShopConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bramble_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Errors that can occur while assembling the session layer.
#[derive(Debug, Error)]
pub enum SessionSetupError {
    /// The configured secret cannot be used as signing key material.
    #[error("session secret is not usable as a signing key (needs at least 64 bytes)")]
    InvalidKey,
}

/// Create the session layer with a `PostgreSQL` store and signed cookies.
///
/// The sessions table is created by the CLI migration step, never here.
///
/// # Errors
///
/// Returns `SessionSetupError` if the session secret cannot be turned into a
/// signing key. Config validation makes this unreachable in practice.
pub fn create_session_layer(
    pool: &PgPool,
    config: &ShopConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, SessionSetupError> {
    let store = PostgresStore::new(pool.clone());

    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|_| SessionSetupError::InvalidKey)?;

    // Only mark the cookie Secure when the site is actually served over TLS
    let is_secure = config.base_url.starts_with("https://");

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
