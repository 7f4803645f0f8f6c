//! Settings dashboard: list by section, shape-aware editor, create, delete
//! and file uploads.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use volta_core::content::{EditorAction, EditorForm, EditorState, FaqItem, ReasonItem};
use volta_core::{
    CreateSettingPayload, SettingContent, SettingId, SiteSection, SiteSetting,
    UpdateSettingPayload, UploadedFile,
};

use super::{ConfirmDeleteTemplate, SidebarLink, frame};
use crate::cms::UploadPart;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::filters::{asset_url, humanize_key, truncate_text};
use crate::layout::Chrome;
use crate::middleware::{CspNonce, CurrentUser, RequireAdmin};
use crate::routes::{MessageQuery, redirect_with};
use crate::state::AppState;

const SETTINGS_PATH: &str = "/dashboard/settings";
const UPLOADS_PATH: &str = "/dashboard/settings/uploads";

/// Longest plain-text value shown in the settings list.
const TEXT_PREVIEW_CHARS: usize = 120;

// =============================================================================
// Display
// =============================================================================

/// A slider image with its URL resolved against the CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySlide {
    pub image_url: String,
    pub description: String,
}

/// How a setting value is shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingDisplay {
    Slider(Vec<DisplaySlide>),
    Faq(Vec<FaqItem>),
    Reasons(Vec<ReasonItem>),
    Contact(Vec<(String, String)>),
    List(String),
    Text(String),
    Image(String),
}

impl SettingDisplay {
    /// Classify a raw value and resolve image paths against `api_base`.
    #[must_use]
    pub fn from_value(raw: &str, api_base: &str) -> Self {
        match SettingContent::classify(raw) {
            SettingContent::Slider(items) => Self::Slider(
                items
                    .into_iter()
                    .map(|item| DisplaySlide {
                        image_url: asset_url(api_base, &item.image),
                        description: item.description,
                    })
                    .collect(),
            ),
            SettingContent::Faq(items) => Self::Faq(items),
            content @ SettingContent::Reasons(_) => {
                Self::Reasons(content.into_reasons().unwrap_or_default())
            }
            SettingContent::Contact(info) => Self::Contact(
                info.fields()
                    .map(|(key, value)| (humanize_key(key), value.to_string()))
                    .collect(),
            ),
            SettingContent::List(joined) => Self::List(joined),
            SettingContent::Text(text) => Self::Text(truncate_text(&text, TEXT_PREVIEW_CHARS)),
            SettingContent::ImagePath(path) => Self::Image(asset_url(api_base, &path)),
        }
    }
}

/// One row in the settings list.
#[derive(Debug, Clone)]
pub struct SettingRow {
    pub id: SettingId,
    pub key: String,
    pub label: String,
    pub shape: &'static str,
    pub display: SettingDisplay,
}

impl SettingRow {
    #[must_use]
    pub fn new(setting: &SiteSetting, api_base: &str) -> Self {
        Self {
            id: setting.id.clone(),
            key: setting.key.clone(),
            label: humanize_key(&setting.key),
            shape: setting.content().shape().as_str(),
            display: SettingDisplay::from_value(&setting.value, api_base),
        }
    }
}

/// A section and its settings as shown in the list.
#[derive(Debug, Clone)]
pub struct SectionGroup {
    pub title: String,
    pub description: String,
    pub settings: Vec<SettingRow>,
}

impl SectionGroup {
    #[must_use]
    pub fn new(section: &SiteSection, api_base: &str) -> Self {
        Self {
            title: section.title.clone(),
            description: section.description.clone(),
            settings: section
                .settings
                .iter()
                .map(|setting| SettingRow::new(setting, api_base))
                .collect(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Settings list template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/settings.html")]
pub struct SettingsTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub sections: Vec<SectionGroup>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Setting editor template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/setting_edit.html")]
pub struct SettingEditTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub setting_id: SettingId,
    pub label: String,
    pub section_title: String,
    pub editor: EditorState,
    pub api_base: String,
    pub error: Option<String>,
}

impl SettingEditTemplate {
    /// Preview URL for an image path typed into the slider editor.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        asset_url(&self.api_base, path)
    }
}

/// An uploaded file as listed after an upload.
#[derive(Debug, Clone)]
pub struct UploadedView {
    pub original_name: String,
    pub path: String,
    pub url: String,
    pub size: u64,
}

impl UploadedView {
    fn new(file: UploadedFile, api_base: &str) -> Self {
        Self {
            url: asset_url(api_base, &file.path),
            original_name: file.original_name,
            path: file.path,
            size: file.size,
        }
    }
}

/// Upload page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/uploads.html")]
pub struct UploadsTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub uploaded: Vec<UploadedView>,
    pub error: Option<String>,
}

// =============================================================================
// List / create / delete
// =============================================================================

/// Display every section with its settings.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let (chrome, sidebar) = frame(&state, SETTINGS_PATH, &current, &nonce).await;
    let api_base = state.cms().base_url();

    let (sections, fetch_error) = match state.cms().fetch_sections().await {
        Ok(sections) => (
            sections
                .iter()
                .map(|section| SectionGroup::new(section, api_base))
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load settings");
            (Vec::new(), Some(e.message))
        }
    };

    SettingsTemplate {
        chrome,
        sidebar,
        sections,
        error: fetch_error.or(query.error),
        success: query.success,
    }
}

/// New setting form.
#[derive(Debug, Deserialize)]
pub struct CreateSettingForm {
    pub section_title: String,
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Create a setting in a section.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Form(form): Form<CreateSettingForm>,
) -> Redirect {
    let key = form.key.trim();
    if key.is_empty() {
        return redirect_with(SETTINGS_PATH, "error", "Setting key is required");
    }

    let payload = CreateSettingPayload {
        section_title: form.section_title.trim().to_string(),
        key: key.to_string(),
        value: form.value,
    };

    match state.cms().create_setting(current.token(), &payload).await {
        Ok(setting) => {
            add_breadcrumb(
                "dashboard",
                "Created setting",
                Some(&[("setting_id", setting.id.as_str())]),
            );
            redirect_with(SETTINGS_PATH, "success", "Setting created")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create setting");
            redirect_with(SETTINGS_PATH, "error", &e.message)
        }
    }
}

/// Ask before deleting a setting.
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Path(id): Path<String>,
) -> Result<ConfirmDeleteTemplate> {
    let setting = find_setting(&state, &SettingId::new(id)).await?;
    let (chrome, sidebar) = frame(&state, SETTINGS_PATH, &current, &nonce).await;

    Ok(ConfirmDeleteTemplate {
        chrome,
        sidebar,
        title: "Delete setting".to_string(),
        message: format!(
            "Are you sure you want to delete the setting \"{}\"?",
            humanize_key(&setting.key)
        ),
        action: format!("{SETTINGS_PATH}/{}/delete", setting.id),
        cancel: SETTINGS_PATH,
    })
}

/// Delete a setting.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Redirect {
    let id = SettingId::new(id);
    match state.cms().delete_setting(current.token(), &id).await {
        Ok(()) => {
            add_breadcrumb("dashboard", "Deleted setting", Some(&[("setting_id", id.as_str())]));
            redirect_with(SETTINGS_PATH, "success", "Setting deleted")
        }
        Err(e) => {
            tracing::warn!(error = %e, setting_id = %id, "Failed to delete setting");
            redirect_with(SETTINGS_PATH, "error", &e.message)
        }
    }
}

// =============================================================================
// Editor
// =============================================================================

async fn find_setting(state: &AppState, id: &SettingId) -> Result<SiteSetting> {
    state
        .cms()
        .list_settings()
        .await?
        .into_iter()
        .find(|setting| &setting.id == id)
        .ok_or_else(|| AppError::NotFound(format!("setting {id}")))
}

fn section_title(setting: &SiteSetting) -> String {
    setting
        .section_title
        .clone()
        .or_else(|| setting.section.as_ref().map(|s| s.title.clone()))
        .unwrap_or_default()
}

async fn render_editor(
    state: &AppState,
    current: &CurrentUser,
    nonce: &CspNonce,
    setting: &SiteSetting,
    editor: EditorState,
    error: Option<String>,
) -> SettingEditTemplate {
    let (chrome, sidebar) = frame(state, SETTINGS_PATH, current, nonce).await;
    SettingEditTemplate {
        chrome,
        sidebar,
        setting_id: setting.id.clone(),
        label: humanize_key(&setting.key),
        section_title: section_title(setting),
        editor,
        api_base: state.cms().base_url().to_string(),
        error,
    }
}

/// Display the editor for one setting.
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Path(id): Path<String>,
) -> Result<SettingEditTemplate> {
    let setting = find_setting(&state, &SettingId::new(id)).await?;
    let editor = EditorState::load(&setting.value);
    Ok(render_editor(&state, &current, &nonce, &setting, editor, None).await)
}

/// Apply an editor action.
///
/// `add` and `remove.{n}` re-render the editor with the changed rows;
/// `save` writes the serialized value back to the CMS.
pub async fn submit(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let setting = find_setting(&state, &SettingId::new(id)).await?;
    let form = EditorForm::parse(pairs)?;
    let editor = EditorState::submit(&setting.value, &form)?;

    if form.action != EditorAction::Save {
        return Ok(render_editor(&state, &current, &nonce, &setting, editor, None)
            .await
            .into_response());
    }

    let payload = UpdateSettingPayload {
        value: Some(editor.to_value_string()?),
        ..UpdateSettingPayload::default()
    };

    match state
        .cms()
        .update_setting(current.token(), &setting.id, &payload)
        .await
    {
        Ok(_) => {
            add_breadcrumb(
                "dashboard",
                "Updated setting",
                Some(&[("setting_id", setting.id.as_str())]),
            );
            Ok(redirect_with(SETTINGS_PATH, "success", "Setting updated").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, setting_id = %setting.id, "Failed to update setting");
            let page =
                render_editor(&state, &current, &nonce, &setting, editor, Some(e.message)).await;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

// =============================================================================
// Uploads
// =============================================================================

/// Display the upload form.
pub async fn uploads(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
) -> impl IntoResponse {
    let (chrome, sidebar) = frame(&state, UPLOADS_PATH, &current, &nonce).await;
    UploadsTemplate {
        chrome,
        sidebar,
        uploaded: Vec::new(),
        error: None,
    }
}

/// Read every non-empty file posted under `field_name`.
async fn read_files(mut multipart: Multipart, field_name: &str) -> Result<Vec<UploadPart>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        files.push(UploadPart {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(files)
}

async fn render_uploads(
    state: &AppState,
    current: &CurrentUser,
    nonce: &CspNonce,
    result: std::result::Result<Vec<UploadedFile>, String>,
) -> Response {
    let (chrome, sidebar) = frame(state, UPLOADS_PATH, current, nonce).await;
    let api_base = state.cms().base_url();
    let (status, uploaded, error) = match result {
        Ok(files) => (
            StatusCode::OK,
            files
                .into_iter()
                .map(|file| UploadedView::new(file, api_base))
                .collect(),
            None,
        ),
        Err(message) => (StatusCode::UNPROCESSABLE_ENTITY, Vec::new(), Some(message)),
    };
    (
        status,
        UploadsTemplate {
            chrome,
            sidebar,
            uploaded,
            error,
        },
    )
        .into_response()
}

/// Upload one file (`file` field).
pub async fn upload_single(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    multipart: Multipart,
) -> Result<Response> {
    let mut files = read_files(multipart, "file").await?;
    let result = match files.pop() {
        None => Err("Choose a file to upload".to_string()),
        Some(file) => state
            .cms()
            .upload_single(current.token(), file)
            .await
            .map(|uploaded| vec![uploaded])
            .map_err(|e| e.message),
    };
    Ok(render_uploads(&state, &current, &nonce, result).await)
}

/// Upload several files at once (`files` field).
pub async fn upload_multiple(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    multipart: Multipart,
) -> Result<Response> {
    let files = read_files(multipart, "files").await?;
    let result = if files.is_empty() {
        Err("Choose at least one file to upload".to_string())
    } else {
        state
            .cms()
            .upload_multiple(current.token(), files)
            .await
            .map_err(|e| e.message)
    };
    Ok(render_uploads(&state, &current, &nonce, result).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const API: &str = "http://localhost:4000";

    #[test]
    fn test_display_slider_resolves_images() {
        let display =
            SettingDisplay::from_value(r#"[{"image":"/public/a.jpg","description":"A"}]"#, API);
        assert_eq!(
            display,
            SettingDisplay::Slider(vec![DisplaySlide {
                image_url: "http://localhost:4000/public/a.jpg".to_string(),
                description: "A".to_string(),
            }])
        );
    }

    #[test]
    fn test_display_reasons_sorted() {
        let display = SettingDisplay::from_value(
            r#"[{"reason_id":2,"title":"B","description":""},{"reason_id":1,"title":"A","description":""}]"#,
            API,
        );
        let SettingDisplay::Reasons(items) = display else {
            panic!("expected reasons");
        };
        assert_eq!(items.first().unwrap().title, "A");
    }

    #[test]
    fn test_display_contact_humanizes_keys() {
        let display = SettingDisplay::from_value(
            r#"{"email":"info@volta.ae","phone_number":"+971"}"#,
            API,
        );
        assert_eq!(
            display,
            SettingDisplay::Contact(vec![
                ("email".to_string(), "info@volta.ae".to_string()),
                ("phone number".to_string(), "+971".to_string()),
            ])
        );
    }

    #[test]
    fn test_display_fallbacks() {
        assert_eq!(
            SettingDisplay::from_value(r#"["Home","News"]"#, API),
            SettingDisplay::List("Home, News".to_string())
        );
        assert_eq!(
            SettingDisplay::from_value("/public/logo.png", API),
            SettingDisplay::Image("http://localhost:4000/public/logo.png".to_string())
        );
        assert_eq!(
            SettingDisplay::from_value("Search...", API),
            SettingDisplay::Text("Search...".to_string())
        );

        let long = "x".repeat(200);
        let SettingDisplay::Text(preview) = SettingDisplay::from_value(&long, API) else {
            panic!("expected text");
        };
        assert_eq!(preview.chars().count(), TEXT_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_row_shape_label() {
        let setting: SiteSetting = serde_json::from_str(
            r#"{"id":9,"sectionId":"2","key":"contact_info","value":"{\"email\":\"a@b.co\"}"}"#,
        )
        .unwrap();
        let row = SettingRow::new(&setting, API);
        assert_eq!(row.label, "contact info");
        assert_eq!(row.shape, "contact");
        assert_eq!(row.id.as_str(), "9");
    }
}
