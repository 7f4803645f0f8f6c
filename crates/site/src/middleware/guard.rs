//! Route guard.
//!
//! Every request passes through [`route_guard_middleware`], which classifies
//! the path and checks the session cookies:
//!
//! 1. Public paths (the allow-list, `/_next*`, `/static*`, anything with a
//!    `.`) need no login.
//! 2. Anything else without an access token redirects to `/login`.
//! 3. A logged-in visitor asking for `/login` or `/register` goes to `/`.
//! 4. `/dashboard*` and `/admin*` require the `admin` role, else `/`.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::models::SessionCookies;

/// Paths reachable without logging in.
pub const PUBLIC_PATHS: [&str; 7] = [
    "/",
    "/login",
    "/register",
    "/about",
    "/contact",
    "/api",
    "/forgot-password",
];

/// Path prefixes for framework assets.
const ASSET_PREFIXES: [&str; 2] = ["/_next", "/static"];

/// Path prefixes restricted to admins.
const ADMIN_PREFIXES: [&str; 2] = ["/dashboard", "/admin"];

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where everyone else is sent.
pub const HOME_PATH: &str = "/";

/// Outcome of the guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    Redirect(&'static str),
}

/// Whether `path` is reachable without a session.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
        || ASSET_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || path.contains('.')
}

/// Whether `path` requires the admin role.
#[must_use]
pub fn is_admin_path(path: &str) -> bool {
    ADMIN_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Decide what to do with a request for `path`.
#[must_use]
pub fn decide(path: &str, session: &SessionCookies) -> GuardDecision {
    let authenticated = session.is_authenticated();

    if !authenticated && !is_public_path(path) {
        return GuardDecision::Redirect(LOGIN_PATH);
    }

    if authenticated && (path == "/login" || path == "/register") {
        return GuardDecision::Redirect(HOME_PATH);
    }

    if is_admin_path(path) && !session.is_admin() {
        return GuardDecision::Redirect(HOME_PATH);
    }

    GuardDecision::Continue
}

/// Middleware applying [`decide`] to every request.
///
/// The parsed cookies are stored in request extensions for the auth
/// extractors.
pub async fn route_guard_middleware(mut request: Request, next: Next) -> Response {
    let session = SessionCookies::from_headers(request.headers());

    match decide(request.uri().path(), &session) {
        GuardDecision::Continue => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        GuardDecision::Redirect(to) => {
            debug!(path = %request.uri().path(), redirect = to, "Route guard redirect");
            Redirect::to(to).into_response()
        }
    }
}
