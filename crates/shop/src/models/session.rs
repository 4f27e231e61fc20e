//! Session-related types.
//!
//! Types stored in the session for authentication state. The session holds a
//! weak reference to the user (id + email), never the full record; identity
//! resolution re-reads the store on every request.

use serde::{Deserialize, Serialize};

use bramble_core::{Email, UserId};

/// Session-stored user reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the logged-in flag. This flag - not the presence of a user
    /// record - is what the rendering layer sees as `is_authenticated`.
    pub const IS_LOGGED_IN: &str = "is_logged_in";

    /// Key for the current user reference.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the per-session CSRF token.
    pub const CSRF_TOKEN: &str = "csrf_token";
}
