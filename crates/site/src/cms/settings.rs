//! `/api/settings` endpoints, including file uploads.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use tracing::{instrument, warn};

use volta_core::{
    CreateSettingPayload, SettingId, SiteSetting, UpdateSettingPayload, UploadedFile,
};

use super::{ApiError, CmsClient, Surface};

/// A file received from the dashboard, ready to forward to the API.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadPart {
    fn into_part(self, path: &str) -> Result<Part, ApiError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(content_type) => part.mime_str(&content_type).map_err(|e| {
                warn!(error = %e, %content_type, "Rejected upload content type");
                ApiError::new(Surface::Settings, 400, "Invalid file type", path)
            }),
            None => Ok(part),
        }
    }
}

impl CmsClient {
    /// List every setting across all sections.
    ///
    /// # Errors
    ///
    /// Returns the API's error.
    #[instrument(skip(self))]
    pub async fn list_settings(&self) -> Result<Vec<SiteSetting>, ApiError> {
        let path = "/api/settings";
        let request = self.request(Method::GET, path);
        self.send(Surface::Settings, path, request, "Failed to fetch settings")
            .await
    }

    /// Create a setting under the section named in the payload.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token, payload), fields(section = %payload.section_title, key = %payload.key))]
    pub async fn create_setting(
        &self,
        token: Option<&SecretString>,
        payload: &CreateSettingPayload,
    ) -> Result<SiteSetting, ApiError> {
        let path = "/api/settings";
        let request = self
            .authed(Surface::Settings, Method::POST, path, token)?
            .json(payload);
        let setting = self
            .send(Surface::Settings, path, request, "Failed to create setting")
            .await?;
        self.invalidate_sections().await;
        Ok(setting)
    }

    /// Update a setting.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token, payload), fields(setting_id = %id))]
    pub async fn update_setting(
        &self,
        token: Option<&SecretString>,
        id: &SettingId,
        payload: &UpdateSettingPayload,
    ) -> Result<SiteSetting, ApiError> {
        let path = setting_path(id);
        let request = self
            .authed(Surface::Settings, Method::PATCH, &path, token)?
            .json(payload);
        let setting = self
            .send(Surface::Settings, &path, request, "Failed to update setting")
            .await?;
        self.invalidate_sections().await;
        Ok(setting)
    }

    /// Delete a setting.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token), fields(setting_id = %id))]
    pub async fn delete_setting(
        &self,
        token: Option<&SecretString>,
        id: &SettingId,
    ) -> Result<(), ApiError> {
        let path = setting_path(id);
        let request = self.authed(Surface::Settings, Method::DELETE, &path, token)?;
        self.send_unit(Surface::Settings, &path, request, "Failed to delete setting")
            .await?;
        self.invalidate_sections().await;
        Ok(())
    }

    /// Upload one file as multipart field `file`.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, 400 for an unusable content type, or the
    /// API's error.
    #[instrument(skip(self, token, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload_single(
        &self,
        token: Option<&SecretString>,
        file: UploadPart,
    ) -> Result<UploadedFile, ApiError> {
        let path = "/api/settings/upload-single";
        let request = self.authed(Surface::Settings, Method::POST, path, token)?;
        let form = Form::new().part("file", file.into_part(path)?);
        self.send(
            Surface::Settings,
            path,
            request.multipart(form),
            "Failed to upload file",
        )
        .await
    }

    /// Upload several files, each as multipart field `files`.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, 400 for an unusable content type, or the
    /// API's error.
    #[instrument(skip(self, token, files), fields(count = files.len()))]
    pub async fn upload_multiple(
        &self,
        token: Option<&SecretString>,
        files: Vec<UploadPart>,
    ) -> Result<Vec<UploadedFile>, ApiError> {
        let path = "/api/settings/upload-multiple";
        let request = self.authed(Surface::Settings, Method::POST, path, token)?;
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file.into_part(path)?);
        }
        self.send(
            Surface::Settings,
            path,
            request.multipart(form),
            "Failed to upload files",
        )
        .await
    }
}

fn setting_path(id: &SettingId) -> String {
    format!("/api/settings/{}", urlencoding::encode(id.as_str()))
}
