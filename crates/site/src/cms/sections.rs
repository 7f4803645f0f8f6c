//! `/api/site-sections` endpoints.
//!
//! Reads are public. The full list backs every public page, so it is cached.

use std::sync::Arc;

use reqwest::Method;
use secrecy::SecretString;
use tracing::{debug, instrument};

use volta_core::{CreateSectionPayload, SectionId, SiteSection, UpdateSectionPayload};

use super::{ApiError, CmsClient, SECTIONS_CACHE_KEY, Surface};

impl CmsClient {
    /// List all sections with their settings, served from cache when fresh.
    ///
    /// Failures are not cached.
    ///
    /// # Errors
    ///
    /// Returns the API's error when the cache is cold and the call fails.
    #[instrument(skip(self))]
    pub async fn list_sections(&self) -> Result<Arc<Vec<SiteSection>>, ApiError> {
        if let Some(cached) = self.inner.sections_cache.get(SECTIONS_CACHE_KEY).await {
            debug!("Cache hit for site sections");
            return Ok(cached);
        }

        let sections = Arc::new(self.fetch_sections().await?);
        self.inner
            .sections_cache
            .insert(SECTIONS_CACHE_KEY, Arc::clone(&sections))
            .await;
        Ok(sections)
    }

    /// List sections bypassing the cache (dashboard views).
    ///
    /// # Errors
    ///
    /// Returns the API's error.
    #[instrument(skip(self))]
    pub async fn fetch_sections(&self) -> Result<Vec<SiteSection>, ApiError> {
        let path = "/api/site-sections";
        let request = self.request(Method::GET, path);
        self.send(
            Surface::SiteSections,
            path,
            request,
            "Failed to fetch site sections",
        )
        .await
    }

    /// Fetch one section.
    ///
    /// # Errors
    ///
    /// Returns the API's error.
    #[instrument(skip(self), fields(section_id = %id))]
    pub async fn get_section(&self, id: &SectionId) -> Result<SiteSection, ApiError> {
        let path = section_path(id);
        let request = self.request(Method::GET, &path);
        self.send(
            Surface::SiteSections,
            &path,
            request,
            "Failed to fetch site section",
        )
        .await
    }

    /// Create a section.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token, payload), fields(title = %payload.title))]
    pub async fn create_section(
        &self,
        token: Option<&SecretString>,
        payload: &CreateSectionPayload,
    ) -> Result<SiteSection, ApiError> {
        let path = "/api/site-sections";
        let request = self
            .authed(Surface::SiteSections, Method::POST, path, token)?
            .json(payload);
        let section = self
            .send(
                Surface::SiteSections,
                path,
                request,
                "Failed to create site section",
            )
            .await?;
        self.invalidate_sections().await;
        Ok(section)
    }

    /// Rename or re-describe a section.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token, payload), fields(section_id = %id))]
    pub async fn update_section(
        &self,
        token: Option<&SecretString>,
        id: &SectionId,
        payload: &UpdateSectionPayload,
    ) -> Result<SiteSection, ApiError> {
        let path = section_path(id);
        let request = self
            .authed(Surface::SiteSections, Method::PATCH, &path, token)?
            .json(payload);
        let section = self
            .send(
                Surface::SiteSections,
                &path,
                request,
                "Failed to update site section",
            )
            .await?;
        self.invalidate_sections().await;
        Ok(section)
    }

    /// Delete a section and, on the API side, its settings.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token), fields(section_id = %id))]
    pub async fn delete_section(
        &self,
        token: Option<&SecretString>,
        id: &SectionId,
    ) -> Result<(), ApiError> {
        let path = section_path(id);
        let request = self.authed(Surface::SiteSections, Method::DELETE, &path, token)?;
        self.send_unit(
            Surface::SiteSections,
            &path,
            request,
            "Failed to delete site section",
        )
        .await?;
        self.invalidate_sections().await;
        Ok(())
    }
}

fn section_path(id: &SectionId) -> String {
    format!("/api/site-sections/{}", urlencoding::encode(id.as_str()))
}
