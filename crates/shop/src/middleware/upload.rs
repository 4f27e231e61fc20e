//! Uniform multipart upload interception.
//!
//! Every multipart request passes through here, not just upload-designated
//! routes. A single file part under the fixed `image` field is checked
//! against the accept-list and, if accepted, written to the upload directory
//! under a timestamped name. Rejected types are dropped silently: the file is
//! not stored, no flag is set, and the request continues as if the part had
//! never been sent. Transport-level multipart failures redirect to the
//! diagnostic endpoint instead of failing the pipeline.
//!
//! Surviving text fields are re-encoded as an ordinary urlencoded body so the
//! CSRF stage and route-level `Form` extraction see a uniform request shape.

use std::path::Path;

use axum::{
    body::Body,
    extract::{FromRequest, FromRequestParts, Multipart, Request, State},
    http::{
        HeaderValue,
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        request::Parts,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::state::AppState;

/// Form field inspected for a file part.
pub const FILE_FIELD: &str = "image";

/// Declared content types accepted for storage. Everything else is dropped.
const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

/// Fixed diagnostic endpoint malformed uploads are redirected to.
const FAILURE_REDIRECT: &str = "/500";

/// An accepted, stored upload, exposed to handlers via request extensions.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    /// Public URL the stored file is served from (under `/images`).
    pub url: String,
    /// Client-supplied original filename.
    pub original_name: String,
}

/// Extractor for the intercepted upload, if any.
///
/// Handlers cannot tell an absent file from a rejected one; rejection is
/// silent by design.
pub struct MaybeUploaded(pub Option<UploadedImage>);

impl<S> FromRequestParts<S> for MaybeUploaded
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<UploadedImage>().cloned()))
    }
}

/// Intercept multipart requests; pass everything else through untouched.
pub async fn intercept(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !is_multipart(&request) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    // Carried over to the rebuilt request; Multipart only needs headers + body
    let extensions = std::mem::take(&mut parts.extensions);
    let method = parts.method.clone();
    let uri = parts.uri.clone();
    let version = parts.version;
    let headers = parts.headers.clone();

    let mut multipart = match Multipart::from_request(Request::from_parts(parts, body), &()).await {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::warn!(error = %e, "malformed multipart request");
            return Redirect::to(FAILURE_REDIRECT).into_response();
        }
    };

    let mut fields: Vec<(String, String)> = Vec::new();
    let mut uploaded: Option<UploadedImage> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "multipart transport failure");
                return Redirect::to(FAILURE_REDIRECT).into_response();
            }
        };

        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(ToOwned::to_owned);
        let accepted = field.content_type().is_some_and(is_accepted_mime);

        let Some(original_name) = file_name else {
            // Ordinary text field: keep for the rebuilt form body
            match field.text().await {
                Ok(value) => fields.push((name, value)),
                Err(e) => {
                    tracing::warn!(error = %e, "multipart transport failure");
                    return Redirect::to(FAILURE_REDIRECT).into_response();
                }
            }
            continue;
        };

        // A single file part under the fixed field; anything else is a
        // malformed request, same as an undeclared part
        if name != FILE_FIELD || uploaded.is_some() {
            tracing::warn!(field = %name, "unexpected file part");
            return Redirect::to(FAILURE_REDIRECT).into_response();
        }

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "multipart transport failure");
                return Redirect::to(FAILURE_REDIRECT).into_response();
            }
        };

        if !accepted {
            // Silent drop: no error, no marker for downstream stages
            tracing::debug!(field = %name, "dropping upload with unaccepted content type");
            continue;
        }

        let filename = stored_filename(Utc::now(), &original_name);
        let destination = state.config().upload_dir.join(&filename);
        if let Err(e) = tokio::fs::write(&destination, &data).await {
            tracing::error!(error = %e, path = %destination.display(), "failed to store upload");
            return Redirect::to(FAILURE_REDIRECT).into_response();
        }

        uploaded = Some(UploadedImage {
            url: format!("/images/{filename}"),
            original_name,
        });
    }

    // Rebuild the request as an ordinary urlencoded form. The serializer is
    // scoped so it is dropped before the `.await` below: it is not `Send`, and
    // holding it across the await would make this middleware's future non-Send.
    let encoded = {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &fields {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    };

    let mut rebuilt = Request::new(Body::from(encoded));
    *rebuilt.method_mut() = method;
    *rebuilt.uri_mut() = uri;
    *rebuilt.version_mut() = version;
    *rebuilt.headers_mut() = headers;
    *rebuilt.extensions_mut() = extensions;
    rebuilt.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    rebuilt.headers_mut().remove(CONTENT_LENGTH);
    if let Some(image) = uploaded {
        rebuilt.extensions_mut().insert(image);
    }

    next.run(rebuilt).await
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

fn is_accepted_mime(content_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&content_type)
}

/// Generated name: ISO-8601 timestamp with `:` replaced (illegal in common
/// filesystem names), a separator, then the client's basename. No collision
/// handling beyond timestamp granularity: two uploads of the same name in
/// the same millisecond overwrite each other.
fn stored_filename(now: DateTime<Utc>, original: &str) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    let base = Path::new(original)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload");
    format!("{stamp}-{base}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_accept_list_is_exact() {
        assert!(is_accepted_mime("image/png"));
        assert!(is_accepted_mime("image/jpg"));
        assert!(is_accepted_mime("image/jpeg"));

        assert!(!is_accepted_mime("image/gif"));
        assert!(!is_accepted_mime("image/svg+xml"));
        assert!(!is_accepted_mime("application/pdf"));
        assert!(!is_accepted_mime("image/PNG"));
    }

    #[test]
    fn test_stored_filename_replaces_colons() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 14, 30, 5).unwrap();
        let name = stored_filename(now, "photo.png");
        assert_eq!(name, "2026-08-07T14-30-05.000Z-photo.png");
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_stored_filename_strips_path_components() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 14, 30, 5).unwrap();
        let name = stored_filename(now, "../../etc/passwd");
        assert_eq!(name, "2026-08-07T14-30-05.000Z-passwd");
    }

    #[test]
    fn test_stored_filename_same_tick_collides() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 14, 30, 5).unwrap();
        assert_eq!(
            stored_filename(now, "photo.png"),
            stored_filename(now, "photo.png")
        );
    }
}
