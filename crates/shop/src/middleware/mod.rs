//! HTTP middleware stack for the shop.
//!
//! # Middleware Order (outermost first, fixed for every request)
//!
//! 1. Upload interception (multipart normalize + store; before sessions, so
//!    static-free file handling never creates session records)
//! 2. Session layer (tower-sessions, signed cookie, `PostgreSQL` store)
//! 3. Failure rendering (rewrites any bare 500 into the failure view)
//! 4. Panic catcher (panics become plain 500s for the failure renderer)
//! 5. CSRF (issue per-session token; validate state-changing methods)
//! 6. Page context capture (login flag + CSRF token for the views)
//! 7. Identity resolution (session reference -> full user record)
//!
//! No stage is skipped except through its own short-circuit: CSRF rejection
//! (403), identity store failure (failure view), malformed upload (redirect
//! to `/500`). The stack itself is assembled once in [`crate::app::build`].

pub mod auth;
pub mod context;
pub mod csrf;
pub mod failure;
pub mod identity;
pub mod session;
pub mod upload;

pub use auth::{OptionalUser, RequireUser, establish_login};
pub use context::PageContext;
pub use csrf::CsrfToken;
pub use session::create_session_layer;
pub use upload::{MaybeUploaded, UploadedImage};
