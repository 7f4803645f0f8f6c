//! Authentication extractors.
//!
//! The route guard already keeps anonymous visitors out of protected pages;
//! these extractors hand handlers the decoded user and access token.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;

use volta_core::User;

use crate::middleware::guard::{HOME_PATH, LOGIN_PATH};
use crate::models::SessionCookies;

/// A logged-in user together with their CMS access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    token: SecretString,
}

impl CurrentUser {
    /// Token to pass to authenticated CMS calls.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        Some(&self.token)
    }
}

/// Session cookies, as parsed by the route guard or read from the headers.
impl<S> FromRequestParts<S> for SessionCookies
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| Self::from_headers(&parts.headers)))
    }
}

fn current_user(session: &SessionCookies) -> Option<CurrentUser> {
    let token = session.access_token()?.clone();
    let user = session.user()?;
    Some(CurrentUser { user, token })
}

/// Error returned when a handler needs a user the request does not carry.
#[derive(Debug)]
pub enum AuthRejection {
    /// No usable session: log in first.
    RedirectToLogin,
    /// Logged in, but not an admin.
    NotAdmin,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::NotAdmin => Redirect::to(HOME_PATH).into_response(),
        }
    }
}

/// Extractor that requires a logged-in user.
///
/// A token without a decodable `user_data` cookie also counts as logged out.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(RequireAuth(current): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", current.user.display_name())
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(session) = SessionCookies::from_request_parts(parts, state).await;
        current_user(&session)
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that requires a logged-in admin.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(current) = RequireAuth::from_request_parts(parts, state).await?;
        if current.user.is_admin() {
            Ok(Self(current))
        } else {
            Err(AuthRejection::NotAdmin)
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(session) = SessionCookies::from_request_parts(parts, state).await;
        Ok(Self(current_user(&session)))
    }
}
