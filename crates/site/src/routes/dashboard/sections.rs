//! Site sections dashboard: list, create, rename/describe, delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

use volta_core::{CreateSectionPayload, SectionId, SiteSection, UpdateSectionPayload};

use super::{ConfirmDeleteTemplate, SidebarLink, frame};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::layout::Chrome;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::routes::{MessageQuery, non_blank, redirect_with};
use crate::state::AppState;

const SECTIONS_PATH: &str = "/dashboard/sections";

/// Section list template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/sections.html")]
pub struct SectionsTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub sections: Vec<SiteSection>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Section edit template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/section_edit.html")]
pub struct SectionEditTemplate {
    pub chrome: Chrome,
    pub sidebar: Vec<SidebarLink>,
    pub section: SiteSection,
    pub error: Option<String>,
}

/// Section form, used for both create and update.
#[derive(Debug, Deserialize)]
pub struct SectionForm {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Display all sections.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let (chrome, sidebar) = frame(&state, SECTIONS_PATH, &current, &nonce).await;

    let (sections, fetch_error) = match state.cms().fetch_sections().await {
        Ok(sections) => (sections, None),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load sections");
            (Vec::new(), Some(e.message))
        }
    };

    SectionsTemplate {
        chrome,
        sidebar,
        sections,
        error: fetch_error.or(query.error),
        success: query.success,
    }
}

/// Create a section.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Form(form): Form<SectionForm>,
) -> Redirect {
    let Some(title) = non_blank(form.title) else {
        return redirect_with(SECTIONS_PATH, "error", "Section title is required");
    };
    let payload = CreateSectionPayload {
        title,
        description: non_blank(form.description).unwrap_or_default(),
    };

    match state.cms().create_section(current.token(), &payload).await {
        Ok(section) => {
            add_breadcrumb(
                "dashboard",
                "Created section",
                Some(&[("section", section.title.as_str())]),
            );
            redirect_with(SECTIONS_PATH, "success", "Section created")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create section");
            redirect_with(SECTIONS_PATH, "error", &e.message)
        }
    }
}

/// Display the edit form for a section.
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Path(id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<SectionEditTemplate> {
    let section = state.cms().get_section(&SectionId::new(id)).await?;
    let (chrome, sidebar) = frame(&state, SECTIONS_PATH, &current, &nonce).await;
    Ok(SectionEditTemplate {
        chrome,
        sidebar,
        section,
        error: query.error,
    })
}

/// Rename or re-describe a section.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<SectionForm>,
) -> Redirect {
    let id = SectionId::new(id);
    let payload = UpdateSectionPayload {
        title: non_blank(form.title),
        // An emptied description is a real change
        description: form.description.map(|d| d.trim().to_string()),
    };

    match state
        .cms()
        .update_section(current.token(), &id, &payload)
        .await
    {
        Ok(_) => {
            add_breadcrumb("dashboard", "Updated section", Some(&[("section_id", id.as_str())]));
            redirect_with(SECTIONS_PATH, "success", "Section updated")
        }
        Err(e) => {
            tracing::warn!(error = %e, section_id = %id, "Failed to update section");
            redirect_with(&format!("{SECTIONS_PATH}/{id}/edit"), "error", &e.message)
        }
    }
}

/// Ask before deleting a section.
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    nonce: CspNonce,
    Path(id): Path<String>,
) -> Result<ConfirmDeleteTemplate> {
    let section = state.cms().get_section(&SectionId::new(id)).await?;
    let (chrome, sidebar) = frame(&state, SECTIONS_PATH, &current, &nonce).await;

    Ok(ConfirmDeleteTemplate {
        chrome,
        sidebar,
        title: "Delete section".to_string(),
        message: format!(
            "Are you sure you want to delete the section \"{}\" and its {} settings?",
            section.title,
            section.settings.len()
        ),
        action: format!("{SECTIONS_PATH}/{}/delete", section.id),
        cancel: SECTIONS_PATH,
    })
}

/// Delete a section.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Redirect {
    let id = SectionId::new(id);
    match state.cms().delete_section(current.token(), &id).await {
        Ok(()) => {
            add_breadcrumb("dashboard", "Deleted section", Some(&[("section_id", id.as_str())]));
            redirect_with(SECTIONS_PATH, "success", "Section deleted")
        }
        Err(e) => {
            tracing::warn!(error = %e, section_id = %id, "Failed to delete section");
            redirect_with(SECTIONS_PATH, "error", &e.message)
        }
    }
}
