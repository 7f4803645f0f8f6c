//! User management dashboard: sortable list, create, edit, delete.

use std::cmp::Ordering;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use volta_core::{CreateUserPayload, Email, Role, UpdateUserPayload, User, UserId};

use super::{ConfirmDeleteTemplate, SidebarLink, frame};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::filters::short_date;
use crate::layout::Chrome;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::routes::{non_blank, redirect_with};
use crate::state::AppState;

const USERS_PATH: &str = "/dashboard/users";

// =============================================================================
// Sorting
// =============================================================================

/// Column the user table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Position in the API response.
    #[default]
    Index,
    Id,
    Email,
    Name,
    Role,
    Created,
}

impl SortColumn {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "index" => Some(Self::Index),
            "id" => Some(Self::Id),
            "email" => Some(Self::Email),
            "name" => Some(Self::Name),
            "role" => Some(Self::Role),
            "created" => Some(Self::Created),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Id => "id",
            Self::Email => "email",
            Self::Name => "name",
            Self::Role => "role",
            Self::Created => "created",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// `?sort=&dir=` on the user list.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// The current sort. Unknown values fall back to index, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl UserSort {
    #[must_use]
    pub fn from_query(query: &UsersQuery) -> Self {
        Self {
            column: query
                .sort
                .as_deref()
                .and_then(SortColumn::parse)
                .unwrap_or_default(),
            direction: match query.dir.as_deref() {
                Some("desc") => SortDirection::Desc,
                _ => SortDirection::Asc,
            },
        }
    }

    /// Header link for `column`: clicking the active column flips direction.
    #[must_use]
    pub fn link(&self, column: &str) -> String {
        let direction = if self.column.as_str() == column {
            self.direction.flipped()
        } else {
            SortDirection::Asc
        };
        format!("{USERS_PATH}?sort={column}&dir={}", direction.as_str())
    }

    /// Arrow shown next to the active column header.
    #[must_use]
    pub fn indicator(&self, column: &str) -> &'static str {
        match (self.column.as_str() == column, self.direction) {
            (false, _) => "",
            (true, SortDirection::Asc) => "▲",
            (true, SortDirection::Desc) => "▼",
        }
    }
}

/// One row of the user table.
#[derive(Debug, Clone)]
pub struct UserRow {
    /// 1-based position in the API response.
    pub index: usize,
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub role_class: &'static str,
    pub created: String,
    created_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn new(index: usize, user: User) -> Self {
        let role_class = match user.role {
            Role::Admin => "chip-primary",
            Role::Manager => "chip-secondary",
            Role::User | Role::Other(_) => "chip-default",
        };
        Self {
            index,
            created: short_date(user.created_at.as_ref()),
            created_at: user.created_at,
            name: user
                .full_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_default(),
            role: user.role.as_str().to_string(),
            role_class,
            email: user.email,
            id: user.id,
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Number the users in API order, then sort.
#[must_use]
pub fn sort_users(users: Vec<User>, sort: UserSort) -> Vec<UserRow> {
    let mut rows: Vec<UserRow> = users
        .into_iter()
        .zip(1..)
        .map(|(user, index)| UserRow::new(index, user))
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match sort.column {
            SortColumn::Index => a.index.cmp(&b.index),
            SortColumn::Id => compare_text(a.id.as_str(), b.id.as_str()),
            SortColumn::Email => compare_text(&a.email, &b.email),
            SortColumn::Name => compare_text(&a.name, &b.name),
            SortColumn::Role => compare_text(&a.role, &b.role),
            SortColumn::Created => a.created_at.cmp(&b.created_at),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    rows
}

// =============================================================================
// Templates
// =============================================================================

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/users.html")]
pub struct UsersTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub users: Vec<UserRow>,
    pub sort: UserSort,
    pub roles: Vec<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// User edit template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/user_edit.html")]
pub struct UserEditTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub user: User,
    pub roles: Vec<String>,
    pub error: Option<String>,
}

fn assignable_roles() -> Vec<String> {
    Role::ASSIGNABLE.iter().map(ToString::to_string).collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the user list.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Query(query): Query<UsersQuery>,
) -> impl IntoResponse {
    let (chrome, sidebar) = frame(&state, USERS_PATH, &current, &nonce).await;
    let sort = UserSort::from_query(&query);

    let (users, fetch_error) = match state.cms().list_users(current.token()).await {
        Ok(users) => (sort_users(users, sort), None),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch users");
            (Vec::new(), Some(e.message))
        }
    };

    UsersTemplate {
        chrome,
        sidebar,
        users,
        sort,
        roles: assignable_roles(),
        error: fetch_error.or(query.error),
        success: query.success,
    }
}

/// New user form.
#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

impl CreateUserForm {
    /// Validate into an API payload.
    ///
    /// # Errors
    ///
    /// Returns the message to show for invalid input.
    pub fn validate(self) -> std::result::Result<CreateUserPayload, &'static str> {
        let email = Email::parse(&self.email).map_err(|_| "Invalid email address")?;
        if self.password.is_empty() {
            return Err("Password is required");
        }
        Ok(CreateUserPayload {
            email: email.into_inner(),
            password: self.password,
            full_name: non_blank(self.full_name),
            role: non_blank(self.role).map(|r| Role::from(r.as_str())),
        })
    }
}

/// Create a user.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Form(form): Form<CreateUserForm>,
) -> Redirect {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(message) => return redirect_with(USERS_PATH, "error", message),
    };

    match state.cms().create_user(current.token(), &payload).await {
        Ok(user) => {
            add_breadcrumb("dashboard", "Created user", Some(&[("user_id", user.id.as_str())]));
            redirect_with(USERS_PATH, "success", "User created")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create user");
            redirect_with(USERS_PATH, "error", &e.message)
        }
    }
}

/// Display the edit form for a user.
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Path(id): Path<String>,
    Query(query): Query<UsersQuery>,
) -> Result<UserEditTemplate> {
    let user = state
        .cms()
        .get_user(current.token(), &UserId::new(id))
        .await?;
    let (chrome, sidebar) = frame(&state, USERS_PATH, &current, &nonce).await;

    Ok(UserEditTemplate {
        chrome,
        sidebar,
        user,
        roles: assignable_roles(),
        error: query.error,
    })
}

/// Edit user form.
#[derive(Debug, Deserialize)]
pub struct UpdateUserForm {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

impl From<UpdateUserForm> for UpdateUserPayload {
    fn from(form: UpdateUserForm) -> Self {
        Self {
            email: non_blank(form.email),
            full_name: non_blank(form.full_name),
            role: non_blank(form.role).map(|r| Role::from(r.as_str())),
            ..Self::default()
        }
    }
}

/// Update a user's email, name or role.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<UpdateUserForm>,
) -> Redirect {
    let id = UserId::new(id);
    let payload = UpdateUserPayload::from(form);

    match state.cms().update_user(current.token(), &id, &payload).await {
        Ok(_) => {
            add_breadcrumb("dashboard", "Updated user", Some(&[("user_id", id.as_str())]));
            redirect_with(USERS_PATH, "success", "User updated")
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %id, "Failed to update user");
            redirect_with(&format!("{USERS_PATH}/{id}/edit"), "error", &e.message)
        }
    }
}

/// Ask before deleting a user.
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Path(id): Path<String>,
) -> Result<ConfirmDeleteTemplate> {
    let user = state
        .cms()
        .get_user(current.token(), &UserId::new(id))
        .await?;
    let (chrome, sidebar) = frame(&state, USERS_PATH, &current, &nonce).await;

    Ok(ConfirmDeleteTemplate {
        chrome,
        sidebar,
        title: "Delete user".to_string(),
        message: format!("Are you sure you want to delete {}?", user.email),
        action: format!("{USERS_PATH}/{}/delete", user.id),
        cancel: USERS_PATH,
    })
}

/// Delete a user. Admins cannot delete themselves.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Redirect {
    let id = UserId::new(id);
    if id == current.user.id {
        return redirect_with(USERS_PATH, "error", "You cannot delete your own account");
    }

    match state.cms().delete_user(current.token(), &id).await {
        Ok(()) => {
            add_breadcrumb("dashboard", "Deleted user", Some(&[("user_id", id.as_str())]));
            redirect_with(USERS_PATH, "success", "User deleted")
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %id, "Failed to delete user");
            redirect_with(USERS_PATH, "error", &e.message)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn users() -> Vec<User> {
        serde_json::from_str(
            r#"[
            {"id":"u-2","email":"zara@volta.ae","fullName":"Zara","role":"manager","createdAt":"2024-02-01T00:00:00Z"},
            {"id":"u-1","email":"adam@volta.ae","fullName":null,"role":"admin","createdAt":"2024-03-01T00:00:00Z"},
            {"id":"u-3","email":"Mona@volta.ae","fullName":"mona","role":"user","createdAt":"2024-01-01T00:00:00Z"}
        ]"#,
        )
        .unwrap()
    }

    fn emails(rows: &[UserRow]) -> Vec<&str> {
        rows.iter().map(|r| r.email.as_str()).collect()
    }

    fn query(sort: &str, dir: &str) -> UsersQuery {
        UsersQuery {
            sort: Some(sort.to_string()),
            dir: Some(dir.to_string()),
            ..UsersQuery::default()
        }
    }

    #[test]
    fn test_default_sort_keeps_api_order() {
        let rows = sort_users(users(), UserSort::default());
        assert_eq!(
            emails(&rows),
            vec!["zara@volta.ae", "adam@volta.ae", "Mona@volta.ae"]
        );
        assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_by_email_ignores_case() {
        let rows = sort_users(users(), UserSort::from_query(&query("email", "asc")));
        assert_eq!(
            emails(&rows),
            vec!["adam@volta.ae", "Mona@volta.ae", "zara@volta.ae"]
        );
    }

    #[test]
    fn test_sort_by_created_desc() {
        let rows = sort_users(users(), UserSort::from_query(&query("created", "desc")));
        assert_eq!(
            emails(&rows),
            vec!["adam@volta.ae", "zara@volta.ae", "Mona@volta.ae"]
        );
        // Index stays the API position
        assert_eq!(rows.first().unwrap().index, 2);
    }

    #[test]
    fn test_missing_name_sorts_first() {
        let rows = sort_users(users(), UserSort::from_query(&query("name", "asc")));
        assert_eq!(rows.first().unwrap().email, "adam@volta.ae");
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        let sort = UserSort::from_query(&query("password", "sideways"));
        assert_eq!(sort, UserSort::default());
    }

    #[test]
    fn test_header_links_toggle() {
        let sort = UserSort::from_query(&query("email", "asc"));
        assert_eq!(sort.link("email"), "/dashboard/users?sort=email&dir=desc");
        assert_eq!(sort.link("role"), "/dashboard/users?sort=role&dir=asc");
        assert_eq!(sort.indicator("email"), "▲");
        assert_eq!(sort.indicator("role"), "");
    }

    #[test]
    fn test_role_chip_class() {
        let rows = sort_users(users(), UserSort::default());
        let classes: Vec<&str> = rows.iter().map(|r| r.role_class).collect();
        assert_eq!(classes, vec!["chip-secondary", "chip-primary", "chip-default"]);
    }

    #[test]
    fn test_create_form_validation() {
        let form = CreateUserForm {
            email: "new@volta.ae".to_string(),
            password: "secret1".to_string(),
            full_name: Some(String::new()),
            role: Some("manager".to_string()),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.role, Some(Role::Manager));
        assert!(payload.full_name.is_none());

        let form = CreateUserForm {
            email: "nope".to_string(),
            password: String::new(),
            full_name: None,
            role: None,
        };
        assert_eq!(form.validate().err(), Some("Invalid email address"));
    }
}
