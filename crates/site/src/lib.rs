//! Volta Generators site library.
//!
//! The public marketing pages, the auth pages and the admin dashboard,
//! rendered server-side from content held in the CMS API. Exposed as a
//! library so the integration tests can build the same router as the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod branding;
pub mod cms;
pub mod config;
pub mod error;
pub mod filters;
pub mod layout;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{
    Router,
    extract::{OriginalUri, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router.
///
/// Health checks sit outside the route guard; everything else passes
/// through it. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let guarded = routes::routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(from_fn(middleware::route_guard_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(guarded)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::security_headers_middleware,
        ))
        .layer(from_fn(middleware::csp_nonce_middleware))
        .layer(from_fn(middleware::request_id_middleware))
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
/// Returns 503 Service Unavailable if the CMS cannot list sections.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.cms().fetch_sections().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
