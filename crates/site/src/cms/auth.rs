//! `/api/auth` endpoints.

use reqwest::Method;
use tracing::instrument;

use volta_core::{LoginPayload, LoginResponseData, RegisterPayload, User};

use super::{ApiError, CmsClient, Surface};

impl CmsClient {
    /// Exchange credentials for an access token and the user record.
    ///
    /// # Errors
    ///
    /// Returns the API's message (default "Login failed") on rejection.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn login(&self, payload: &LoginPayload) -> Result<LoginResponseData, ApiError> {
        let path = "/api/auth/login";
        let request = self.request(Method::POST, path).json(payload);
        self.send(Surface::Auth, path, request, "Login failed").await
    }

    /// Create a new account. The caller still has to log in afterwards.
    ///
    /// # Errors
    ///
    /// Returns the API's message (default "Registration failed") on rejection.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: &RegisterPayload) -> Result<User, ApiError> {
        let path = "/api/auth/register";
        let request = self.request(Method::POST, path).json(payload);
        self.send(Surface::Auth, path, request, "Registration failed")
            .await
    }
}
