//! Application state shared across handlers.

use std::sync::Arc;

use crate::cms::CmsClient;
use crate::config::SiteConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the CMS client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    cms: CmsClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS HTTP client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self, reqwest::Error> {
        let cms = CmsClient::new(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, cms }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the CMS API client.
    #[must_use]
    pub fn cms(&self) -> &CmsClient {
        &self.inner.cms
    }
}
