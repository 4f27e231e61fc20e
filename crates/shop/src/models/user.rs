//! User domain type.

use chrono::{DateTime, Utc};

use bramble_core::{Email, UserId};

/// A shop account.
///
/// Deliberately does not carry the password hash; credential lookups go
/// through the user repository's dedicated query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
