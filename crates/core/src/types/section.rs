//! Site sections and their key/value settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{SectionId, SettingId};
use crate::content::SettingContent;

/// A named group of settings (`"navbar"`, `"footer"`, `"hero"`, ...).
///
/// Page handlers look sections up by `title`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSection {
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: Vec<SiteSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SiteSection {
    /// Find a setting in this section by key.
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&SiteSetting> {
        self.settings.iter().find(|s| s.key == key)
    }

    /// Raw value of the setting with `key`, if present.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.setting(key).map(|s| s.value.as_str())
    }
}

/// Find a section by title in a list returned from the API.
#[must_use]
pub fn find_section<'a>(sections: &'a [SiteSection], title: &str) -> Option<&'a SiteSection> {
    sections.iter().find(|s| s.title == title)
}

/// Minimal section reference embedded in a setting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionRef {
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A single key/value setting. `value` is often JSON-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSetting {
    pub id: SettingId,
    pub section_id: SectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionRef>,
}

impl SiteSetting {
    /// Classify the stored value.
    #[must_use]
    pub fn content(&self) -> SettingContent {
        SettingContent::classify(&self.value)
    }
}

/// Body for `POST /api/site-sections`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSectionPayload {
    pub title: String,
    pub description: String,
}

/// Body for `PATCH /api/site-sections/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSectionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `POST /api/settings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSettingPayload {
    pub section_title: String,
    pub key: String,
    pub value: String,
}

/// Body for `PATCH /api/settings/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Metadata for a file accepted by the upload endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub original_name: String,
    pub filename: String,
    pub path: String,
    pub size: u64,
    pub mimetype: String,
}
