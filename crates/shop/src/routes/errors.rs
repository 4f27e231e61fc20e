//! Error presentation: the not-found and generic failure views.
//!
//! Both views are terminal: a request either ends in one of them or in a
//! route group's own response, never in a chain of the two.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::filters;
use crate::middleware::PageContext;

/// Marker inserted into responses that already carry the rendered failure
/// view, so the failure middleware does not render it a second time.
#[derive(Clone, Copy, Debug)]
pub struct FailureView;

/// Not-found view.
#[derive(Template, WebTemplate)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
}

/// Generic failure view.
#[derive(Template, WebTemplate)]
#[template(path = "500.html")]
pub struct ServerErrorTemplate {
    pub page_title: String,
    pub path: String,
    pub is_authenticated: bool,
}

/// Render the generic failure view with its fixed status.
#[must_use]
pub fn failure_view(path: &str, is_authenticated: bool) -> Response {
    let template = ServerErrorTemplate {
        page_title: "Error!".to_owned(),
        path: path.to_owned(),
        is_authenticated,
    };
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, template).into_response();
    response.extensions_mut().insert(FailureView);
    response
}

/// Render the not-found view for the given request context.
#[must_use]
pub fn not_found_view(path: &str, is_authenticated: bool) -> Response {
    let template = NotFoundTemplate {
        page_title: "Page Not Found".to_owned(),
        path: path.to_owned(),
        is_authenticated,
    };
    (StatusCode::NOT_FOUND, template).into_response()
}

/// Router fallback: any request no route group claimed.
pub async fn not_found(context: PageContext) -> Response {
    not_found_view(&context.path, context.is_authenticated)
}

/// Diagnostic endpoint: deliberately renders the failure view.
pub async fn server_error(context: PageContext) -> Response {
    failure_view(&context.path, context.is_authenticated)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_view_has_fixed_status_and_marker() {
        let response = failure_view("/broken", false);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<FailureView>().is_some());
    }

    #[test]
    fn test_not_found_view_status() {
        let response = not_found_view("/does-not-exist", true);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_templates_render_request_state() {
        let rendered = ServerErrorTemplate {
            page_title: "Error!".to_owned(),
            path: "/500".to_owned(),
            is_authenticated: true,
        }
        .render()
        .unwrap();
        assert!(rendered.contains("Error!"));

        let rendered = NotFoundTemplate {
            page_title: "Page Not Found".to_owned(),
            path: "/does-not-exist".to_owned(),
            is_authenticated: false,
        }
        .render()
        .unwrap();
        assert!(rendered.contains("Page Not Found"));
    }
}
