//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about, /about-us       - About page
//! GET  /contact                - Contact details
//! GET  /gallery, /news         - Placeholder pages
//! GET  /calculator             - kW / kVA calculator
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action (sets session cookies)
//! GET  /register               - Register page
//! POST /register               - Register action
//! POST /logout                 - Logout action (clears session cookies)
//!
//! # Profile (requires auth)
//! GET  /profile                - Profile page
//! POST /profile                - Update name / phone / date of birth
//!
//! # Dashboard (requires admin)
//! GET  /dashboard                          - Overview
//! GET  /dashboard/settings                 - Settings by section
//! POST /dashboard/settings                 - Create setting
//! GET  /dashboard/settings/{id}/edit       - Shape-aware editor
//! POST /dashboard/settings/{id}/edit       - Editor action (add / remove / save)
//! GET  /dashboard/settings/{id}/delete     - Confirm delete
//! POST /dashboard/settings/{id}/delete     - Delete setting
//! GET  /dashboard/settings/uploads         - Upload form
//! POST /dashboard/settings/uploads         - Upload one file
//! POST /dashboard/settings/uploads/multiple - Upload several files
//! GET  /dashboard/sections                 - Section list
//! POST /dashboard/sections                 - Create section
//! GET  /dashboard/sections/{id}/edit       - Edit section
//! POST /dashboard/sections/{id}/edit       - Update section
//! GET  /dashboard/sections/{id}/delete     - Confirm delete
//! POST /dashboard/sections/{id}/delete     - Delete section
//! GET  /dashboard/users                    - User list (sortable)
//! POST /dashboard/users                    - Create user
//! GET  /dashboard/users/{id}/edit          - Edit user
//! POST /dashboard/users/{id}/edit          - Update user
//! GET  /dashboard/users/{id}/delete        - Confirm delete
//! POST /dashboard/users/{id}/delete        - Delete user
//! ```

pub mod auth;
pub mod dashboard;
pub mod home;
pub mod pages;
pub mod profile;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Largest accepted upload request.
const UPLOAD_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect to `path` carrying a flash message in the query string.
pub(crate) fn redirect_with(path: &str, kind: &str, message: &str) -> Redirect {
    let separator = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{path}{separator}{kind}={}",
        urlencoding::encode(message)
    ))
}

/// Trimmed form value, or `None` when left blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Create the public page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/about-us", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/gallery", get(pages::gallery))
        .route("/news", get(pages::news))
        .route("/calculator", get(pages::calculator))
}

/// Create the auth routes router.
///
/// Login and register posts are rate limited per client IP.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/logout", post(auth::logout))
        .merge(limited)
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(profile::show).post(profile::update))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    use dashboard::{sections, settings, users};

    Router::new()
        .route("/", get(dashboard::overview))
        // Settings
        .route("/settings", get(settings::index).post(settings::create))
        .route("/settings/{id}/edit", get(settings::edit).post(settings::submit))
        .route(
            "/settings/{id}/delete",
            get(settings::confirm_delete).post(settings::delete),
        )
        .route(
            "/settings/uploads",
            get(settings::uploads).post(settings::upload_single),
        )
        .route(
            "/settings/uploads/multiple",
            post(settings::upload_multiple),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        // Sections
        .route("/sections", get(sections::index).post(sections::create))
        .route("/sections/{id}/edit", get(sections::edit).post(sections::update))
        .route(
            "/sections/{id}/delete",
            get(sections::confirm_delete).post(sections::delete),
        )
        // Users
        .route("/users", get(users::index).post(users::create))
        .route("/users/{id}/edit", get(users::edit).post(users::update))
        .route(
            "/users/{id}/delete",
            get(users::confirm_delete).post(users::delete),
        )
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .merge(auth_routes())
        .nest("/profile", profile_routes())
        .nest("/dashboard", dashboard_routes())
}
