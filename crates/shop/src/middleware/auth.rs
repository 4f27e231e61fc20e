//! Authentication extractors and session helpers.
//!
//! Route handlers consume the identity the pipeline resolved; these
//! extractors are the seam between the two.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, User, session_keys};

/// Extractor that requires a resolved user.
///
/// If the request is anonymous, redirects to the login page.
///
/// # Example
///
/// ```ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireUser(pub User);

/// Rejection when authentication is required but the request is anonymous.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(Self)
            .ok_or(AuthRejection)
    }
}

/// Extractor that optionally gets the resolved user.
///
/// Unlike `RequireUser`, this never rejects the request.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<User>().cloned()))
    }
}

/// Establish a logged-in session for the user.
///
/// The session id is rotated first so a cookie issued before login cannot be
/// fixated onto the authenticated session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn establish_login(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::IS_LOGGED_IN, true).await?;
    session
        .insert(
            session_keys::CURRENT_USER,
            CurrentUser {
                id: user.id,
                email: user.email.clone(),
            },
        )
        .await?;
    Ok(())
}
