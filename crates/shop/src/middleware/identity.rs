//! Identity resolution middleware.
//!
//! Maps the session's user reference to the full user record and attaches it
//! to the request for the route groups. This is the only pipeline stage with
//! a true error edge: a store failure aborts the request rather than letting
//! routes run with a half-resolved identity.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Resolve the session's user reference, if any.
///
/// - No session user: continue anonymously.
/// - Record gone (stale reference, e.g. a deleted account): continue
///   anonymously; this must not fail the request.
/// - Store failure: abort; the failure middleware renders the response.
pub async fn resolve(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(reference) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await?
    else {
        return Ok(next.run(request).await);
    };

    match UserRepository::new(state.pool())
        .get_by_id(reference.id)
        .await
    {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
        }
        Ok(None) => {
            tracing::debug!(user_id = %reference.id, "session references a deleted user");
        }
        Err(e) => return Err(AppError::Database(e)),
    }

    Ok(next.run(request).await)
}
