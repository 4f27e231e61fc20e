//! Business services for the shop.

pub mod auth;

pub use auth::{AuthError, AuthService};
