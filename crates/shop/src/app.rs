//! Request pipeline assembly.
//!
//! The middleware stack is constructed here, once, as an explicit ordered
//! list; per-request execution follows this order for every request (see
//! [`crate::middleware`] for the stage-by-stage contract). The session layer
//! is injected by the caller so tests can run the identical pipeline over an
//! in-memory store.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore, service::SignedCookie};

use crate::middleware::{context, csrf, failure, identity, upload};
use crate::realtime;
use crate::routes;
use crate::state::AppState;

/// Build the complete application router.
///
/// Static assets (`/static`, `/images`), the health endpoints and the
/// realtime channel sit outside the per-request pipeline; everything else
/// runs through it, including the not-found fallback and the `/500`
/// diagnostic route.
pub fn build<Store>(
    state: AppState,
    session_layer: SessionManagerLayer<Store, SignedCookie>,
) -> Router
where
    Store: SessionStore + Clone,
{
    let pipeline = ServiceBuilder::new()
        .layer(from_fn_with_state(state.clone(), upload::intercept))
        .layer(session_layer)
        .layer(from_fn(failure::render_failures))
        .layer(CatchPanicLayer::new())
        .layer(from_fn(csrf::protect))
        .layer(from_fn(context::capture))
        .layer(from_fn_with_state(state.clone(), identity::resolve));

    let pages = Router::new()
        .route("/500", get(routes::errors::server_error))
        .nest("/admin", routes::admin_routes())
        .merge(routes::shop_routes())
        .merge(routes::auth_routes())
        .fallback(routes::errors::not_found)
        .layer(pipeline);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/ws", get(realtime::upgrade))
        .nest_service("/static", ServeDir::new(&state.config().static_dir))
        .nest_service("/images", ServeDir::new(&state.config().upload_dir))
        .merge(pages)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
