//! In-memory CMS API speaking the same envelope as the real one.
//!
//! Seeded with one admin, one regular user and a handful of sections. Tokens
//! are `token-{user id}`. Any path can be made to fail with
//! [`MockCms::fail`].

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::{Next, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tokio::net::TcpListener;

use volta_core::{
    ApiEnvelope, ApiErrorBody, CreateSectionPayload, CreateSettingPayload, CreateUserPayload,
    LoginPayload, LoginResponseData, RegisterPayload, Role, SectionId, SectionRef, SettingId,
    SiteSection, SiteSetting, UpdateSectionPayload, UpdateSettingPayload, UpdateUserPayload,
    UploadedFile, User, UserId,
};

pub const ADMIN_EMAIL: &str = "admin@voltagenerators.com";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const ADMIN_ID: &str = "1";
pub const USER_EMAIL: &str = "rami@example.com";
pub const USER_PASSWORD: &str = "user-pass";
pub const USER_ID: &str = "2";

/// Hero title stored in the seeded `hero` section.
pub const HERO_TITLE: &str = "POWER FOR EVERY SITE";
/// Id of the seeded slider setting.
pub const SLIDES_SETTING_ID: &str = "2";
/// Id of the seeded FAQ setting.
pub const FAQ_SETTING_ID: &str = "3";
/// Id of the seeded footer contact info setting.
pub const CONTACT_SETTING_ID: &str = "4";
/// Id of the seeded "why we are best" reasons setting.
pub const REASONS_SETTING_ID: &str = "5";

const SLIDES: &str = r#"[{"image":"/public/uploads/hero-1.jpg","description":"Diesel range"},{"image":"/public/uploads/hero-2.jpg","description":"Gas range"}]"#;
const FAQ: &str = r#"[{"question":"Do you ship worldwide?","answer":"Yes, to over 50 countries."}]"#;
const CONTACT: &str = r#"{"email":"sales@volta.test","phone":"+971 4 000 0000","address":"Jebel Ali, Dubai","social":{"facebook":"voltagenerators"},"branches":3}"#;
const REASONS: &str = r#"[{"reason_id":1,"title":"Quality","description":"Tested units."},{"reason_id":2,"title":"Support","description":"Around the clock."},{"reason_id":3,"title":"Price","description":"Direct from the factory."}]"#;

#[derive(Debug)]
struct MockData {
    users: Vec<(User, String)>,
    sections: Vec<SiteSection>,
    next_id: u64,
    failures: HashMap<String, (u16, String)>,
}

/// Handle to a running mock CMS.
#[derive(Debug, Clone)]
pub struct MockCms {
    pub base_url: String,
    data: Arc<Mutex<MockData>>,
}

impl MockCms {
    /// Start the mock on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock CMS");
        let addr: SocketAddr = listener.local_addr().expect("Mock CMS has no address");

        let cms = Self {
            base_url: format!("http://{addr}"),
            data: Arc::new(Mutex::new(seed())),
        };

        let app = router(cms.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        cms
    }

    fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().expect("Mock CMS lock poisoned")
    }

    /// Make every request to `path` fail with `status` and `message`.
    pub fn fail(&self, path: &str, status: u16, message: &str) {
        self.data()
            .failures
            .insert(path.to_string(), (status, message.to_string()));
    }

    /// Current value of a setting.
    #[must_use]
    pub fn setting_value(&self, id: &str) -> Option<String> {
        self.data()
            .sections
            .iter()
            .flat_map(|section| &section.settings)
            .find(|setting| setting.id.as_str() == id)
            .map(|setting| setting.value.clone())
    }

    /// Stored user by email.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.data()
            .users
            .iter()
            .find(|(user, _)| user.email == email)
            .map(|(user, _)| user.clone())
    }

    /// Stored section by title.
    #[must_use]
    pub fn section_by_title(&self, title: &str) -> Option<SiteSection> {
        self.data()
            .sections
            .iter()
            .find(|section| section.title == title)
            .cloned()
    }
}

// =============================================================================
// Seed data
// =============================================================================

fn user(id: &str, email: &str, full_name: Option<&str>, role: Role) -> User {
    User {
        id: UserId::new(id),
        email: email.to_string(),
        full_name: full_name.map(str::to_string),
        phone_number: None,
        date_of_birth: None,
        role,
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}

fn setting(id: &str, section_id: &str, key: &str, value: &str) -> SiteSetting {
    SiteSetting {
        id: SettingId::new(id),
        section_id: SectionId::new(section_id),
        section_title: None,
        key: key.to_string(),
        value: value.to_string(),
        section: None,
    }
}

fn section(id: &str, title: &str, settings: Vec<SiteSetting>) -> SiteSection {
    SiteSection {
        id: SectionId::new(id),
        title: title.to_string(),
        description: format!("{title} content"),
        settings,
        created_at: None,
        updated_at: None,
    }
}

fn seed() -> MockData {
    MockData {
        users: vec![
            (
                user(ADMIN_ID, ADMIN_EMAIL, Some("Site Admin"), Role::Admin),
                ADMIN_PASSWORD.to_string(),
            ),
            (
                user(USER_ID, USER_EMAIL, None, Role::User),
                USER_PASSWORD.to_string(),
            ),
        ],
        sections: vec![
            section(
                "1",
                "hero",
                vec![
                    setting("1", "1", "title", HERO_TITLE),
                    setting(SLIDES_SETTING_ID, "1", "slides", SLIDES),
                ],
            ),
            section("2", "faq", vec![setting(FAQ_SETTING_ID, "2", "faq", FAQ)]),
            section(
                "3",
                "footer",
                vec![setting(CONTACT_SETTING_ID, "3", "contact_info", CONTACT)],
            ),
            section(
                "4",
                "why_we_are_best",
                vec![setting(REASONS_SETTING_ID, "4", "reasons", REASONS)],
            ),
        ],
        next_id: 100,
        failures: HashMap::new(),
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(cms: MockCms) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route(
            "/api/site-sections",
            get(list_sections).post(create_section),
        )
        .route(
            "/api/site-sections/{id}",
            get(get_section)
                .patch(update_section)
                .delete(delete_section),
        )
        .route("/api/settings", get(list_settings).post(create_setting))
        .route("/api/settings/upload-single", post(upload_single))
        .route("/api/settings/upload-multiple", post(upload_multiple))
        .route(
            "/api/settings/{id}",
            axum::routing::patch(update_setting).delete(delete_setting),
        )
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .layer(from_fn_with_state(cms.clone(), inject_failures))
        .with_state(cms)
}

async fn inject_failures(State(cms): State<MockCms>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let failure = cms.data().failures.get(&path).cloned();
    match failure {
        Some((status, message)) => fail(status, &message, &path),
        None => next.run(request).await,
    }
}

fn ok<T: Serialize>(status: StatusCode, path: &str, data: T) -> Response {
    (status, Json(ApiEnvelope::ok(status.as_u16(), path, data))).into_response()
}

fn fail(status: u16, message: &str, path: &str) -> Response {
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, Json(ApiErrorBody::new(status, message, path))).into_response()
}

impl MockData {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn caller(&self, headers: &HeaderMap) -> Option<&User> {
        let token = headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer token-")?;
        self.users
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.id.as_str() == token)
    }

    /// 401 without a valid token, 403 for non-admins.
    fn require_admin(&self, headers: &HeaderMap, path: &str) -> Result<(), Response> {
        match self.caller(headers) {
            None => Err(fail(401, "Unauthorized", path)),
            Some(user) if !user.is_admin() => Err(fail(403, "Forbidden resource", path)),
            Some(_) => Ok(()),
        }
    }

    fn settings(&self) -> Vec<SiteSetting> {
        self.sections
            .iter()
            .flat_map(|section| {
                section.settings.iter().map(|setting| SiteSetting {
                    section_title: Some(section.title.clone()),
                    section: Some(SectionRef {
                        id: section.id.clone(),
                        title: section.title.clone(),
                        description: section.description.clone(),
                    }),
                    ..setting.clone()
                })
            })
            .collect()
    }

    fn setting_mut(&mut self, id: &str) -> Option<&mut SiteSetting> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.settings.iter_mut())
            .find(|setting| setting.id.as_str() == id)
    }
}

// =============================================================================
// Auth
// =============================================================================

async fn login(State(cms): State<MockCms>, Json(payload): Json<LoginPayload>) -> Response {
    let path = "/api/auth/login";
    let data = cms.data();
    let found = data
        .users
        .iter()
        .find(|(user, password)| user.email == payload.email && *password == payload.password);

    match found {
        Some((user, _)) => ok(
            StatusCode::OK,
            path,
            LoginResponseData {
                access_token: format!("token-{}", user.id),
                user: user.clone(),
            },
        ),
        None => fail(401, "Invalid credentials", path),
    }
}

async fn register(State(cms): State<MockCms>, Json(payload): Json<RegisterPayload>) -> Response {
    let path = "/api/auth/register";
    let mut data = cms.data();
    if data.users.iter().any(|(user, _)| user.email == payload.email) {
        return fail(409, "Email already exists", path);
    }
    let id = data.next_id();
    let created = user(&id, &payload.email, None, Role::User);
    data.users.push((created.clone(), payload.password));
    ok(StatusCode::CREATED, path, created)
}

// =============================================================================
// Sections
// =============================================================================

async fn list_sections(State(cms): State<MockCms>) -> Response {
    ok(StatusCode::OK, "/api/site-sections", cms.data().sections.clone())
}

async fn get_section(State(cms): State<MockCms>, Path(id): Path<String>) -> Response {
    let path = format!("/api/site-sections/{id}");
    let data = cms.data();
    match data.sections.iter().find(|s| s.id.as_str() == id) {
        Some(section) => ok(StatusCode::OK, &path, section.clone()),
        None => fail(404, "Section not found", &path),
    }
}

async fn create_section(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Json(payload): Json<CreateSectionPayload>,
) -> Response {
    let path = "/api/site-sections";
    let mut data = cms.data();
    if let Err(response) = data.require_admin(&headers, path) {
        return response;
    }
    if data.sections.iter().any(|s| s.title == payload.title) {
        return fail(409, "Section title already exists", path);
    }
    let id = data.next_id();
    let mut created = section(&id, &payload.title, Vec::new());
    created.description = payload.description;
    data.sections.push(created.clone());
    ok(StatusCode::CREATED, path, created)
}

async fn update_section(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSectionPayload>,
) -> Response {
    let path = format!("/api/site-sections/{id}");
    let mut data = cms.data();
    if let Err(response) = data.require_admin(&headers, &path) {
        return response;
    }
    let Some(section) = data.sections.iter_mut().find(|s| s.id.as_str() == id) else {
        return fail(404, "Section not found", &path);
    };
    if let Some(title) = payload.title {
        section.title = title;
    }
    if let Some(description) = payload.description {
        section.description = description;
    }
    let updated = section.clone();
    ok(StatusCode::OK, &path, updated)
}

async fn delete_section(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let path = format!("/api/site-sections/{id}");
    let mut data = cms.data();
    if let Err(response) = data.require_admin(&headers, &path) {
        return response;
    }
    let before = data.sections.len();
    data.sections.retain(|s| s.id.as_str() != id);
    if data.sections.len() == before {
        return fail(404, "Section not found", &path);
    }
    ok(StatusCode::OK, &path, serde_json::json!({}))
}

// =============================================================================
// Settings
// =============================================================================

async fn list_settings(State(cms): State<MockCms>) -> Response {
    ok(StatusCode::OK, "/api/settings", cms.data().settings())
}

async fn create_setting(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Json(payload): Json<CreateSettingPayload>,
) -> Response {
    let path = "/api/settings";
    let mut data = cms.data();
    if let Err(response) = data.require_admin(&headers, path) {
        return response;
    }
    let id = data.next_id();
    let Some(section) = data
        .sections
        .iter_mut()
        .find(|s| s.title == payload.section_title)
    else {
        return fail(404, "Section not found", path);
    };
    let created = setting(&id, section.id.as_str(), &payload.key, &payload.value);
    section.settings.push(created.clone());
    ok(StatusCode::CREATED, path, created)
}

async fn update_setting(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSettingPayload>,
) -> Response {
    let path = format!("/api/settings/{id}");
    let mut data = cms.data();
    if let Err(response) = data.require_admin(&headers, &path) {
        return response;
    }
    let Some(setting) = data.setting_mut(&id) else {
        return fail(404, "Setting not found", &path);
    };
    if let Some(key) = payload.key {
        setting.key = key;
    }
    if let Some(value) = payload.value {
        setting.value = value;
    }
    let updated = setting.clone();
    ok(StatusCode::OK, &path, updated)
}

async fn delete_setting(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let path = format!("/api/settings/{id}");
    let mut data = cms.data();
    if let Err(response) = data.require_admin(&headers, &path) {
        return response;
    }
    let mut removed = false;
    for section in &mut data.sections {
        let before = section.settings.len();
        section.settings.retain(|s| s.id.as_str() != id);
        removed |= section.settings.len() != before;
    }
    if !removed {
        return fail(404, "Setting not found", &path);
    }
    ok(StatusCode::OK, &path, serde_json::json!({}))
}

async fn read_uploads(mut multipart: Multipart, field_name: &str) -> Vec<UploadedFile> {
    let mut files = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some(field_name) {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let size = field.bytes().await.map_or(0, |b| b.len() as u64);
        let filename = format!("{}-{original_name}", files.len() + 1);
        files.push(UploadedFile {
            path: format!("/public/uploads/{filename}"),
            original_name,
            filename,
            size,
            mimetype,
        });
    }
    files
}

async fn upload_single(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let path = "/api/settings/upload-single";
    if let Err(response) = cms.data().require_admin(&headers, path) {
        return response;
    }
    match read_uploads(multipart, "file").await.into_iter().next() {
        Some(file) => ok(StatusCode::CREATED, path, file),
        None => fail(400, "No file uploaded", path),
    }
}

async fn upload_multiple(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let path = "/api/settings/upload-multiple";
    if let Err(response) = cms.data().require_admin(&headers, path) {
        return response;
    }
    let files = read_uploads(multipart, "files").await;
    if files.is_empty() {
        return fail(400, "No files uploaded", path);
    }
    ok(StatusCode::CREATED, path, files)
}

// =============================================================================
// Users
// =============================================================================

async fn list_users(State(cms): State<MockCms>, headers: HeaderMap) -> Response {
    let path = "/api/users";
    let data = cms.data();
    if let Err(response) = data.require_admin(&headers, path) {
        return response;
    }
    let users: Vec<User> = data.users.iter().map(|(user, _)| user.clone()).collect();
    ok(StatusCode::OK, path, users)
}

async fn get_user(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let path = format!("/api/users/{id}");
    let data = cms.data();
    if let Err(response) = data.require_admin(&headers, &path) {
        return response;
    }
    match data.users.iter().find(|(user, _)| user.id.as_str() == id) {
        Some((user, _)) => ok(StatusCode::OK, &path, user.clone()),
        None => fail(404, "User not found", &path),
    }
}

async fn create_user(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserPayload>,
) -> Response {
    let path = "/api/users";
    let mut data = cms.data();
    if let Err(response) = data.require_admin(&headers, path) {
        return response;
    }
    if data.users.iter().any(|(user, _)| user.email == payload.email) {
        return fail(409, "Email already exists", path);
    }
    let id = data.next_id();
    let created = user(
        &id,
        &payload.email,
        payload.full_name.as_deref(),
        payload.role.unwrap_or_default(),
    );
    data.users.push((created.clone(), payload.password));
    ok(StatusCode::CREATED, path, created)
}

/// Users may update themselves; anything else needs an admin.
async fn update_user(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserPayload>,
) -> Response {
    let path = format!("/api/users/{id}");
    let mut data = cms.data();
    let Some(caller) = data.caller(&headers).cloned() else {
        return fail(401, "Unauthorized", &path);
    };
    if caller.id.as_str() != id && !caller.is_admin() {
        return fail(403, "Forbidden resource", &path);
    }
    let Some((user, password)) = data.users.iter_mut().find(|(user, _)| user.id.as_str() == id)
    else {
        return fail(404, "User not found", &path);
    };
    if let Some(full_name) = payload.full_name {
        user.full_name = Some(full_name);
    }
    if let Some(email) = payload.email {
        user.email = email;
    }
    if let Some(phone) = payload.phone_number {
        user.phone_number = Some(phone);
    }
    if let Some(dob) = payload.date_of_birth {
        user.date_of_birth = Some(dob);
    }
    if let Some(new_password) = payload.password {
        *password = new_password;
    }
    if let Some(role) = payload.role {
        user.role = role;
    }
    user.updated_at = Some(Utc::now());
    let updated = user.clone();
    ok(StatusCode::OK, &path, updated)
}

async fn delete_user(
    State(cms): State<MockCms>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let path = format!("/api/users/{id}");
    let mut data = cms.data();
    if let Err(response) = data.require_admin(&headers, &path) {
        return response;
    }
    let before = data.users.len();
    data.users.retain(|(user, _)| user.id.as_str() != id);
    if data.users.len() == before {
        return fail(404, "User not found", &path);
    }
    ok(StatusCode::OK, &path, serde_json::json!({}))
}
