//! Per-request view context capture.
//!
//! Runs after CSRF issuance and before identity resolution, mirroring what
//! the views are allowed to observe: the session's logged-in flag and the
//! CSRF token. The flag is copied from the session here - it is never
//! derived from the identity lookup, which may legitimately come up empty
//! for a logged-in session whose account was deleted.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use super::csrf::CsrfToken;
use crate::models::session_keys;

/// Per-request bag handed to the rendering layer.
#[derive(Clone, Debug)]
pub struct PageContext {
    /// The session's logged-in flag, as of context capture.
    pub is_authenticated: bool,
    /// The session's CSRF token, for form rendering.
    pub csrf_token: String,
    /// The request path, for the error views.
    pub path: String,
}

/// Capture the page context into request extensions.
pub async fn capture(session: Session, mut request: Request, next: Next) -> Response {
    let is_authenticated = match session.get::<bool>(session_keys::IS_LOGGED_IN).await {
        Ok(flag) => flag.unwrap_or(false),
        Err(e) => {
            tracing::error!(error = %e, "session store failure while reading login flag");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    let csrf_token = request.extensions().get::<CsrfToken>().map_or_else(
        || {
            tracing::warn!(
                "CSRF token not found in request extensions - middleware may be misconfigured"
            );
            String::new()
        },
        |token| token.value().to_owned(),
    );

    let context = PageContext {
        is_authenticated,
        csrf_token,
        path: request.uri().path().to_owned(),
    };
    request.extensions_mut().insert(context);

    next.run(request).await
}

/// Extractor to get the page context from request extensions.
///
/// # Example
///
/// ```ignore
/// async fn handler(context: PageContext) -> impl IntoResponse {
///     MyTemplate { is_authenticated: context.is_authenticated, /* ... */ }
/// }
/// ```
impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!(
                "page context not found in request extensions - middleware may be misconfigured"
            );
            Self {
                is_authenticated: false,
                csrf_token: String::new(),
                path: String::new(),
            }
        }))
    }
}
