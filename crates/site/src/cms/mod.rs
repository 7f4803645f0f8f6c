//! Client for the CMS JSON API.
//!
//! Every endpoint wraps its payload in the `{success, statusCode, message,
//! path, timestamp, data}` envelope. Failures are flattened into
//! [`ApiError`], which carries the API surface that produced it, the
//! message to show the user and the HTTP status.
//!
//! The public section list is cached with `moka`; any section or setting
//! mutation made through this client invalidates it.

mod auth;
mod sections;
mod settings;
mod users;

pub use settings::UploadPart;

use std::fmt;
use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use volta_core::{ApiEnvelope, ApiErrorBody, SiteSection};

use crate::config::SiteConfig;

/// Message used when the API could not be reached or answered garbage.
pub const NETWORK_ERROR: &str = "Network error";

/// Which part of the API an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Auth,
    Users,
    Settings,
    SiteSections,
}

impl Surface {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Users => "users",
            Self::Settings => "settings",
            Self::SiteSections => "site_sections",
        }
    }

    /// Message for a call made without an access token.
    const fn unauthenticated_message(self) -> &'static str {
        match self {
            Self::Users => "Not authenticated",
            _ => "Unauthorized",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed CMS call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{surface} API error ({status}): {message}")]
pub struct ApiError {
    pub surface: Surface,
    pub message: String,
    pub status: u16,
    pub path: String,
}

impl ApiError {
    fn new(surface: Surface, status: u16, message: impl Into<String>, path: &str) -> Self {
        Self {
            surface,
            message: message.into(),
            status,
            path: path.to_string(),
        }
    }

    /// Transport failure or an unreadable response.
    fn network(surface: Surface, path: &str) -> Self {
        Self::new(surface, 500, NETWORK_ERROR, path)
    }

    /// Call attempted without an access token.
    fn unauthenticated(surface: Surface, path: &str) -> Self {
        Self::new(surface, 401, surface.unauthenticated_message(), path)
    }

    /// Whether the API rejected the caller's credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}

// =============================================================================
// CmsClient
// =============================================================================

const SECTIONS_CACHE_KEY: &str = "site-sections";

/// Client for the CMS API.
#[derive(Clone)]
pub struct CmsClient {
    inner: Arc<CmsClientInner>,
}

struct CmsClientInner {
    client: reqwest::Client,
    base_url: Url,
    sections_cache: Cache<&'static str, Arc<Vec<SiteSection>>>,
}

impl CmsClient {
    /// Create a new CMS client from the site configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SiteConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.cms.timeout)
            .build()?;

        let sections_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.sections_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CmsClientInner {
                client,
                base_url: config.cms.api_url.clone(),
                sections_cache,
            }),
        })
    }

    /// Base URL of the API, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str().trim_end_matches('/')
    }

    /// Drop the cached section list so the next read hits the API.
    pub async fn invalidate_sections(&self) {
        self.inner.sections_cache.invalidate(SECTIONS_CACHE_KEY).await;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.client.request(method, self.url(path))
    }

    fn authed(
        &self,
        surface: Surface,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<RequestBuilder, ApiError> {
        let token = token
            .filter(|t| !t.expose_secret().is_empty())
            .ok_or_else(|| ApiError::unauthenticated(surface, path))?;
        Ok(self
            .request(method, path)
            .bearer_auth(token.expose_secret()))
    }

    /// Send a request and unwrap the envelope's `data`.
    async fn send<T: DeserializeOwned>(
        &self,
        surface: Surface,
        path: &str,
        request: RequestBuilder,
        default_message: &str,
    ) -> Result<T, ApiError> {
        let envelope: ApiEnvelope<T> = self.send_envelope(surface, path, request, default_message).await?;
        envelope.data.ok_or_else(|| {
            warn!(surface = %surface, path, "CMS response had no data");
            ApiError::network(surface, path)
        })
    }

    /// Send a request whose response `data` is not needed.
    async fn send_unit(
        &self,
        surface: Surface,
        path: &str,
        request: RequestBuilder,
        default_message: &str,
    ) -> Result<(), ApiError> {
        self.send_envelope::<serde_json::Value>(surface, path, request, default_message)
            .await
            .map(|_| ())
    }

    async fn send_envelope<T: DeserializeOwned>(
        &self,
        surface: Surface,
        path: &str,
        request: RequestBuilder,
        default_message: &str,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(surface = %surface, path, error = %e, "CMS request failed");
            ApiError::network(surface, path)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(surface = %surface, path, error = %e, "Failed to read CMS response");
            ApiError::network(surface, path)
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| default_message.to_string());
            debug!(surface = %surface, path, status = status.as_u16(), %message, "CMS returned error");
            return Err(ApiError::new(surface, status.as_u16(), message, path));
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            warn!(surface = %surface, path, error = %e, body = %preview, "Failed to decode CMS response");
            ApiError::network(surface, path)
        })
    }
}
