//! Admin dashboard.
//!
//! Every handler here takes [`RequireAdmin`]; the route guard already keeps
//! non-admins out, the extractor hands over the token for CMS calls.

pub mod sections;
pub mod settings;
pub mod users;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::filters;
use crate::layout::Chrome;
use crate::middleware::{CspNonce, CurrentUser, RequireAdmin};
use crate::state::AppState;

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Sidebar entries as `(label, href)`.
pub const SIDEBAR: [(&str, &str); 4] = [
    ("Overview", "/dashboard"),
    ("Settings", "/dashboard/settings"),
    ("Sections", "/dashboard/sections"),
    ("Users", "/dashboard/users"),
];

/// A dashboard sidebar link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarLink {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Sidebar with the entry for `current_path` marked active.
#[must_use]
pub fn sidebar(current_path: &str) -> Vec<SidebarLink> {
    SIDEBAR
        .iter()
        .map(|&(label, href)| SidebarLink {
            label,
            href,
            active: if href == DASHBOARD_PATH {
                current_path == DASHBOARD_PATH
            } else {
                current_path.starts_with(href)
            },
        })
        .collect()
}

/// Page chrome plus sidebar for a dashboard page.
pub(crate) async fn frame(
    state: &AppState,
    current_path: &str,
    current: &CurrentUser,
    nonce: &CspNonce,
) -> (Chrome, Vec<SidebarLink>) {
    let chrome = Chrome::load(state, current_path, Some(&current.user), nonce).await;
    (chrome, sidebar(current_path))
}

/// Dashboard overview template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/overview.html")]
pub struct OverviewTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub section_count: Option<usize>,
    pub setting_count: Option<usize>,
    pub user_count: Option<usize>,
}

/// Delete confirmation shared by settings, sections and users.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub title: String,
    pub message: String,
    pub action: String,
    pub cancel: &'static str,
}

/// Display the dashboard overview.
pub async fn overview(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
) -> impl IntoResponse {
    let (chrome, sidebar) = frame(&state, DASHBOARD_PATH, &current, &nonce).await;

    let sections = state.cms().fetch_sections().await.ok();
    let users = state.cms().list_users(current.token()).await.ok();

    OverviewTemplate {
        chrome,
        sidebar,
        section_count: sections.as_ref().map(Vec::len),
        setting_count: sections.map(|s| s.iter().map(|section| section.settings.len()).sum()),
        user_count: users.map(|u| u.len()),
    }
}
