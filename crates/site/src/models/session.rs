//! Cookie-held session.
//!
//! There is no server-side session object. A login sets two cookies:
//! `access_token` (the CMS bearer token) and `user_data` (the user record as
//! JSON). Every request reads them back from the `Cookie` header.

use axum::http::{HeaderMap, header::COOKIE};
use cookie::{Cookie, SameSite};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use volta_core::User;

/// Cookie holding the CMS bearer token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie holding the JSON-serialized user record.
pub const USER_DATA_COOKIE: &str = "user_data";

/// The two session cookies as sent by the browser.
#[derive(Debug, Clone, Default)]
pub struct SessionCookies {
    access_token: Option<SecretString>,
    user_data: Option<String>,
}

impl SessionCookies {
    /// Build from raw cookie values.
    #[must_use]
    pub fn new(access_token: Option<&str>, user_data: Option<&str>) -> Self {
        Self {
            access_token: access_token.map(|t| SecretString::from(t.to_owned())),
            user_data: user_data.map(str::to_owned),
        }
    }

    /// Read the session cookies from every `Cookie` header of a request.
    ///
    /// Unparseable cookie pairs are skipped.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut session = Self::default();

        let pairs = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse_encoded)
            .filter_map(Result::ok);

        for cookie in pairs {
            match cookie.name() {
                ACCESS_TOKEN_COOKIE => {
                    session.access_token = Some(SecretString::from(cookie.value().to_owned()));
                }
                USER_DATA_COOKIE => session.user_data = Some(cookie.value().to_owned()),
                _ => {}
            }
        }

        session
    }

    /// A non-empty access token means the visitor is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// The access token, if present and non-empty.
    #[must_use]
    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
    }

    /// Decode the full user record. Malformed data yields `None` and a warning.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        let raw = self.user_data.as_deref().filter(|raw| !raw.is_empty())?;
        serde_json::from_str(raw)
            .inspect_err(|e| warn!(error = %e, "Error parsing user data cookie"))
            .ok()
    }

    /// Whether the `user_data` cookie carries `"role": "admin"`.
    ///
    /// Only the role is consulted, so a partial record still counts.
    /// Anything unreadable is treated as not admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        let Some(raw) = self.user_data.as_deref().filter(|raw| !raw.is_empty()) else {
            return false;
        };
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => value.get("role").and_then(serde_json::Value::as_str) == Some("admin"),
            Err(e) => {
                warn!(error = %e, "Error parsing user data cookie");
                false
            }
        }
    }
}

// =============================================================================
// Set-Cookie helpers
// =============================================================================

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Strict)
        .secure(secure)
        .http_only(true)
        .build()
}

/// Cookie carrying the bearer token.
#[must_use]
pub fn access_token_cookie(token: &str, secure: bool) -> Cookie<'static> {
    session_cookie(ACCESS_TOKEN_COOKIE, token.to_owned(), secure)
}

/// Cookie carrying the user record.
///
/// # Errors
///
/// Returns an error if the user cannot be serialized.
pub fn user_data_cookie(user: &User, secure: bool) -> Result<Cookie<'static>, serde_json::Error> {
    Ok(session_cookie(
        USER_DATA_COOKIE,
        serde_json::to_string(user)?,
        secure,
    ))
}

/// Cookies that clear both session values.
#[must_use]
pub fn removal_cookies() -> [Cookie<'static>; 2] {
    [ACCESS_TOKEN_COOKIE, USER_DATA_COOKIE].map(|name| {
        let mut cookie = Cookie::build((name, "")).path("/").build();
        cookie.make_removal();
        cookie
    })
}

/// Render cookies as `Set-Cookie` header values, percent-encoding the values.
#[must_use]
pub fn set_cookie_values<'a>(cookies: impl IntoIterator<Item = &'a Cookie<'static>>) -> Vec<String> {
    cookies
        .into_iter()
        .map(|cookie| cookie.encoded().to_string())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use volta_core::{Role, UserId};

    fn admin() -> User {
        User {
            id: UserId::new("17"),
            email: "admin@voltagenerators.com".to_string(),
            full_name: Some("Site Admin".to_string()),
            phone_number: None,
            date_of_birth: None,
            role: Role::Admin,
            created_at: None,
            updated_at: None,
        }
    }

    fn headers_from(set_cookies: &[String]) -> HeaderMap {
        // A browser echoes back only name=value pairs.
        let pairs: Vec<&str> = set_cookies
            .iter()
            .map(|c| c.split(';').next().unwrap())
            .collect();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&pairs.join("; ")).unwrap());
        headers
    }

    #[test]
    fn test_cookie_round_trip_for_real_user() {
        let user = admin();
        let cookies = [
            access_token_cookie("tok.en", false),
            user_data_cookie(&user, false).unwrap(),
        ];
        let values = set_cookie_values(&cookies);
        assert!(values[1].starts_with("user_data="));
        assert!(!values[1].contains('"'));

        let session = SessionCookies::from_headers(&headers_from(&values));
        assert!(session.is_authenticated());
        assert_eq!(session.access_token().unwrap().expose_secret(), "tok.en");
        assert_eq!(session.user().unwrap(), user);
        assert!(session.is_admin());
    }

    #[test]
    fn test_cookie_attributes() {
        let values = set_cookie_values(&[access_token_cookie("t", true)]);
        let header = &values[0];
        assert!(header.contains("Path=/"));
        assert!(header.contains("SameSite=Strict"));
        assert!(header.contains("Secure"));
        assert!(header.contains("HttpOnly"));

        let values = set_cookie_values(&[access_token_cookie("t", false)]);
        assert!(!values[0].contains("Secure"));
    }

    #[test]
    fn test_removal_cookies_expire() {
        let values = set_cookie_values(&removal_cookies());
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.contains("Max-Age=0")));
    }

    #[test]
    fn test_missing_cookies() {
        let session = SessionCookies::from_headers(&HeaderMap::new());
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let session = SessionCookies::new(Some(""), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_malformed_user_data_is_not_admin() {
        let session = SessionCookies::new(Some("t"), Some("{not json"));
        assert!(session.is_authenticated());
        assert!(session.user().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_partial_user_data_role_is_read() {
        let session = SessionCookies::new(Some("t"), Some(r#"{"role":"admin"}"#));
        assert!(session.is_admin());
        assert!(session.user().is_none());

        let session = SessionCookies::new(Some("t"), Some(r#"{"role":"manager"}"#));
        assert!(!session.is_admin());
    }

    #[test]
    fn test_other_cookies_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc; _ga=GA1.2"),
        );
        let session = SessionCookies::from_headers(&headers);
        assert!(session.is_authenticated());
        assert!(session.user().is_none());
    }
}
