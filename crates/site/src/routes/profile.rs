//! Profile page for the logged-in user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;

use volta_core::{UpdateUserPayload, User};

use crate::error::add_breadcrumb;
use crate::filters;
use crate::filters::short_date;
use crate::layout::Chrome;
use crate::middleware::{CspNonce, RequireAuth};
use crate::models::{set_cookie_values, user_data_cookie};
use crate::routes::{MessageQuery, non_blank, redirect_with};
use crate::state::AppState;

const PROFILE_PATH: &str = "/profile";

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub chrome: Chrome,
    pub user: User,
    pub created: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Profile update form. Blank fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
}

impl From<ProfileForm> for UpdateUserPayload {
    fn from(form: ProfileForm) -> Self {
        Self {
            full_name: non_blank(form.full_name),
            phone_number: non_blank(form.phone_number),
            date_of_birth: non_blank(form.date_of_birth),
            ..Self::default()
        }
    }
}

/// Display the profile page.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    nonce: CspNonce,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let chrome = Chrome::load(&state, PROFILE_PATH, Some(&current.user), &nonce).await;
    ProfileTemplate {
        chrome,
        created: short_date(current.user.created_at.as_ref()),
        user: current.user,
        error: query.error,
        success: query.success,
    }
}

/// Update the profile and refresh the `user_data` cookie.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Response {
    let payload = UpdateUserPayload::from(form);

    let updated = match state
        .cms()
        .update_user(current.token(), &current.user.id, &payload)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %current.user.id, "Profile update failed");
            return redirect_with(PROFILE_PATH, "error", &e.message).into_response();
        }
    };

    add_breadcrumb("profile", "Updated profile", None);

    match user_data_cookie(&updated, state.config().secure_cookies()) {
        Ok(cookie) => {
            let headers = set_cookie_values([&cookie])
                .into_iter()
                .map(|value| (SET_COOKIE, value));
            (
                AppendHeaders(headers),
                redirect_with(PROFILE_PATH, "success", "Profile updated"),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode user cookie");
            redirect_with(PROFILE_PATH, "error", "Failed to update profile").into_response()
        }
    }
}
