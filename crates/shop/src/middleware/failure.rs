//! Centralized failure rendering.
//!
//! The single point where any unhandled error becomes a user-visible
//! response. Anything below this stage that produces a bare 500 - an aborted
//! identity resolution, a panicking handler, an `AppError` from a route -
//! is rewritten into the generic failure view. Responses that already carry
//! the rendered view (the `/500` diagnostic route) pass through untouched.

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::models::session_keys;
use crate::routes::errors;

/// Rewrite bare 500 responses into the rendered failure view.
pub async fn render_failures(request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    if response.status() != StatusCode::INTERNAL_SERVER_ERROR
        || response.extensions().get::<errors::FailureView>().is_some()
    {
        return response;
    }

    // The login flag is re-read at response time, so the view reflects the
    // session as it stands when the response is produced.
    let is_authenticated = match session {
        Some(session) => session
            .get::<bool>(session_keys::IS_LOGGED_IN)
            .await
            .ok()
            .flatten()
            .unwrap_or(false),
        None => false,
    };

    errors::failure_view(&path, is_authenticated)
}
