//! Authentication route handlers.
//!
//! Login and registration go through the CMS auth endpoints. A successful
//! login stores the bearer token and the user record in cookies; logout
//! expires both.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use volta_core::{Email, EmailError, LoginPayload, RegisterPayload};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::layout::Chrome;
use crate::middleware::CspNonce;
use crate::middleware::guard::{HOME_PATH, LOGIN_PATH};
use crate::models::{access_token_cookie, removal_cookies, set_cookie_values, user_data_cookie};
use crate::routes::{MessageQuery, redirect_with};
use crate::state::AppState;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

const DASHBOARD_PATH: &str = "/dashboard";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Per-field registration errors.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegisterErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

impl RegisterErrors {
    const fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.confirm_password.is_none()
    }
}

impl RegisterForm {
    /// Validate the form into an API payload.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<RegisterPayload, RegisterErrors> {
        let mut errors = RegisterErrors::default();

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => {
                errors.email = Some("Email is required");
                None
            }
            Err(_) => {
                errors.email = Some("Invalid email address");
                None
            }
        };

        if self.password.is_empty() {
            errors.password = Some("Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.password = Some("Password must be at least 6 characters");
        }

        if self.confirm_password.is_empty() {
            errors.confirm_password = Some("Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.confirm_password = Some("Passwords do not match");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(RegisterPayload {
                email: email.into_inner(),
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub chrome: Chrome,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub chrome: Chrome,
    pub email: String,
    pub errors: RegisterErrors,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    nonce: CspNonce,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        chrome: Chrome::load(&state, LOGIN_PATH, None, &nonce).await,
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// On success sets the `access_token` and `user_data` cookies and sends
/// admins to the dashboard, everyone else home.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let payload = LoginPayload {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let data = match state.cms().login(&payload).await {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            return redirect_with(LOGIN_PATH, "error", &e.message).into_response();
        }
    };

    let secure = state.config().secure_cookies();
    let user_cookie = match user_data_cookie(&data.user, secure) {
        Ok(cookie) => cookie,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode user cookie");
            return redirect_with(LOGIN_PATH, "error", "Login failed").into_response();
        }
    };
    let token_cookie = access_token_cookie(&data.access_token, secure);

    set_sentry_user(&data.user.id, Some(&data.user.email));
    tracing::info!(user_id = %data.user.id, "User logged in");

    let target = if data.user.is_admin() {
        DASHBOARD_PATH
    } else {
        HOME_PATH
    };
    let cookies = set_cookie_values([&token_cookie, &user_cookie])
        .into_iter()
        .map(|value| (SET_COOKIE, value));

    (AppendHeaders(cookies), Redirect::to(target)).into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(State(state): State<AppState>, nonce: CspNonce) -> impl IntoResponse {
    RegisterTemplate {
        chrome: Chrome::load(&state, "/register", None, &nonce).await,
        email: String::new(),
        errors: RegisterErrors::default(),
        error: None,
    }
}

/// Handle registration form submission.
///
/// Invalid input or an API failure re-renders the form; success sends the
/// visitor to the login page.
pub async fn register(
    State(state): State<AppState>,
    nonce: CspNonce,
    Form(form): Form<RegisterForm>,
) -> Response {
    let (errors, error) = match form.validate() {
        Ok(payload) => match state.cms().register(&payload).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User registered");
                return redirect_with(
                    LOGIN_PATH,
                    "success",
                    "Registration successful. Please log in.",
                )
                .into_response();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                (RegisterErrors::default(), Some(e.message))
            }
        },
        Err(errors) => (errors, None),
    };

    let template = RegisterTemplate {
        chrome: Chrome::load(&state, "/register", None, &nonce).await,
        email: form.email,
        errors,
        error,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout: expire both session cookies.
pub async fn logout() -> Response {
    clear_sentry_user();
    let cookies = removal_cookies();
    let headers = set_cookie_values(&cookies)
        .into_iter()
        .map(|value| (SET_COOKIE, value));
    (AppendHeaders(headers), Redirect::to(LOGIN_PATH)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let payload = form("owner@voltagenerators.com", "secret1", "secret1")
            .validate()
            .unwrap_or_else(|e| panic!("unexpected errors: {e:?}"));
        assert_eq!(payload.email, "owner@voltagenerators.com");
        assert_eq!(payload.password, "secret1");
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = form("", "", "").validate().err();
        assert_eq!(
            errors,
            Some(RegisterErrors {
                email: Some("Email is required"),
                password: Some("Password is required"),
                confirm_password: Some("Please confirm your password"),
            })
        );
    }

    #[test]
    fn test_field_rules() {
        let errors = form("not-an-email", "12345", "54321").validate().err();
        assert_eq!(
            errors,
            Some(RegisterErrors {
                email: Some("Invalid email address"),
                password: Some("Password must be at least 6 characters"),
                confirm_password: Some("Passwords do not match"),
            })
        );
    }

    #[test]
    fn test_mismatch_alone_fails() {
        let errors = form("a@volta.ae", "secret1", "secret2").validate().err();
        assert_eq!(
            errors.and_then(|e| e.confirm_password),
            Some("Passwords do not match")
        );
    }

    #[tokio::test]
    async fn test_logout_clears_cookies() {
        let response = logout().await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cleared: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cleared.len(), 2);
    }
}
