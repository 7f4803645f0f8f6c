//! `/api/users` endpoints. All of them require an access token.

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use volta_core::{CreateUserPayload, UpdateUserPayload, User, UserId};

use super::{ApiError, CmsClient, Surface};

impl CmsClient {
    /// List every user.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token))]
    pub async fn list_users(&self, token: Option<&SecretString>) -> Result<Vec<User>, ApiError> {
        let path = "/api/users";
        let request = self.authed(Surface::Users, Method::GET, path, token)?;
        self.send(Surface::Users, path, request, "Failed to fetch users")
            .await
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn get_user(
        &self,
        token: Option<&SecretString>,
        id: &UserId,
    ) -> Result<User, ApiError> {
        let path = user_path(id);
        let request = self.authed(Surface::Users, Method::GET, &path, token)?;
        self.send(Surface::Users, &path, request, "Failed to fetch user")
            .await
    }

    /// Create a user (admin only on the API side).
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token, payload), fields(email = %payload.email))]
    pub async fn create_user(
        &self,
        token: Option<&SecretString>,
        payload: &CreateUserPayload,
    ) -> Result<User, ApiError> {
        let path = "/api/users";
        let request = self
            .authed(Surface::Users, Method::POST, path, token)?
            .json(payload);
        self.send(Surface::Users, path, request, "Failed to create user")
            .await
    }

    /// Update the given fields of a user.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token, payload), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        token: Option<&SecretString>,
        id: &UserId,
        payload: &UpdateUserPayload,
    ) -> Result<User, ApiError> {
        let path = user_path(id);
        let request = self
            .authed(Surface::Users, Method::PATCH, &path, token)?
            .json(payload);
        self.send(Surface::Users, &path, request, "Failed to update user")
            .await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns 401 without a token, or the API's error.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn delete_user(
        &self,
        token: Option<&SecretString>,
        id: &UserId,
    ) -> Result<(), ApiError> {
        let path = user_path(id);
        let request = self.authed(Surface::Users, Method::DELETE, &path, token)?;
        self.send_unit(Surface::Users, &path, request, "Failed to delete user")
            .await
    }
}

fn user_path(id: &UserId) -> String {
    format!("/api/users/{}", urlencoding::encode(id.as_str()))
}
