//! CSRF protection middleware.
//!
//! One anti-forgery token per session: issued (or re-read) on every request
//! before any handler runs, exposed to the views through the page context,
//! and required on state-changing methods via the `_csrf` form field or the
//! `x-csrf-token` header. The token is stable for the whole session, so
//! issuing it twice yields values that both validate until the session is
//! replaced.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tower_sessions::Session;

use crate::models::session_keys;

/// Form field checked for the token on state-changing requests.
pub const FORM_FIELD: &str = "_csrf";

/// Header checked for the token before falling back to the form field.
pub const HEADER_NAME: &str = "x-csrf-token";

/// Token size before base64 encoding.
const TOKEN_BYTES: usize = 32;

/// Upper bound when buffering a form body to look for the token.
const FORM_BODY_LIMIT: usize = 1024 * 1024;

/// The session's CSRF token, exposed to later stages via request extensions.
#[derive(Clone, Debug)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Generate a new random token (256-bit, URL-safe base64).
    ///
    /// URL-safe so the token survives urlencoded form bodies verbatim.
    #[must_use]
    fn issue() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the token value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Issue the per-session token, then validate state-changing requests.
///
/// Validation failure short-circuits with a dedicated 403 before any business
/// route runs; it must never surface as a generic server error.
pub async fn protect(session: Session, mut request: Request, next: Next) -> Response {
    let token = match session.get::<String>(session_keys::CSRF_TOKEN).await {
        Ok(Some(token)) => CsrfToken(token),
        Ok(None) => {
            let token = CsrfToken::issue();
            if let Err(e) = session.insert(session_keys::CSRF_TOKEN, token.value()).await {
                tracing::error!(error = %e, "failed to persist CSRF token");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response();
            }
            token
        }
        Err(e) => {
            tracing::error!(error = %e, "session store failure while loading CSRF token");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    request.extensions_mut().insert(token.clone());

    if !requires_token(request.method()) {
        return next.run(request).await;
    }

    let (request, presented) = match presented_token(request).await {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    match presented.as_deref() {
        Some(presented) if presented == token.value() => next.run(request).await,
        _ => rejection(),
    }
}

/// Safe methods are never validated.
fn requires_token(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// The dedicated rejection: a 403, never a 500.
fn rejection() -> Response {
    (StatusCode::FORBIDDEN, "invalid CSRF token").into_response()
}

/// Extract the presented token from the header or a urlencoded form body.
///
/// The body is buffered and handed back untouched so the route's own form
/// extraction still works.
async fn presented_token(request: Request) -> Result<(Request, Option<String>), Response> {
    if let Some(header) = request
        .headers()
        .get(HEADER_NAME)
        .and_then(|value| value.to_str().ok())
    {
        let header = header.to_owned();
        return Ok((request, Some(header)));
    }

    if !is_urlencoded(&request) {
        return Ok((request, None));
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, FORM_BODY_LIMIT)
        .await
        .map_err(|_| (StatusCode::BAD_REQUEST, "invalid request body").into_response())?;

    let token = url::form_urlencoded::parse(&bytes)
        .find(|(key, _)| key == FORM_FIELD)
        .map(|(_, value)| value.into_owned());

    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

fn is_urlencoded(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_produces_distinct_tokens() {
        let a = CsrfToken::issue();
        let b = CsrfToken::issue();
        assert_ne!(a.value(), b.value());
        // 32 bytes encode to 43 characters without padding
        assert_eq!(a.value().len(), 43);
        assert!(
            a.value().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "token must survive urlencoded form bodies verbatim"
        );
    }

    #[test]
    fn test_safe_methods_skip_validation() {
        for method in [Method::GET, Method::HEAD, Method::OPTIONS, Method::TRACE] {
            assert!(!requires_token(&method), "{method} must not be validated");
        }
    }

    #[test]
    fn test_state_changing_methods_require_token() {
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(requires_token(&method), "{method} must be validated");
        }
    }

    #[test]
    fn test_rejection_is_distinguishable_from_server_error() {
        assert_eq!(rejection().status(), StatusCode::FORBIDDEN);
    }
}
