//! End-to-end tests for the Volta site.
//!
//! Each test starts an in-memory CMS ([`MockCms`]) and the real site router
//! on ephemeral ports, then drives the site over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p volta-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `guard` - Route guard redirects and public pages
//! - `auth` - Login, registration, logout and profile
//! - `dashboard` - Settings editor, sections and users

pub mod mock_cms;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};

use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
use reqwest::{Client, Response, redirect::Policy};
use tokio::net::TcpListener;
use url::Url;

use volta_site::config::SiteConfig;
use volta_site::state::AppState;

pub use mock_cms::MockCms;

/// Gives every client its own address so the login rate limiter never
/// groups tests together.
static NEXT_CLIENT: AtomicU8 = AtomicU8::new(1);

/// A running site backed by a mock CMS.
pub struct TestApp {
    pub base_url: String,
    pub cms: MockCms,
}

impl TestApp {
    /// Start the mock CMS and the site.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot start.
    pub async fn spawn() -> Self {
        let cms = MockCms::spawn().await;

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind site");
        let addr = listener.local_addr().expect("Site has no address");
        let base_url = format!("http://{addr}");

        let cms_url = Url::parse(&cms.base_url).expect("Mock CMS URL is valid");
        let config = SiteConfig::new(base_url.clone(), cms_url);
        let state = AppState::new(config).expect("Failed to build app state");
        let app = volta_site::app(state);

        tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        Self { base_url, cms }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A client with a cookie jar that does not follow redirects.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> Client {
        let n = NEXT_CLIENT.fetch_add(1, Ordering::Relaxed);
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_str(&format!("10.0.0.{n}")).expect("Valid header value"),
        );

        Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// A client that has logged in with the given credentials.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails or is rejected.
    pub async fn logged_in(&self, email: &str, password: &str) -> Client {
        let client = self.client();
        let response = self.login(&client, email, password).await;
        let location = location(&response);
        assert!(
            !location.starts_with("/login"),
            "login rejected, redirected to {location}"
        );
        client
    }

    /// A client logged in as the seeded admin.
    pub async fn admin(&self) -> Client {
        self.logged_in(mock_cms::ADMIN_EMAIL, mock_cms::ADMIN_PASSWORD)
            .await
    }

    /// A client logged in as the seeded regular user.
    pub async fn user(&self) -> Client {
        self.logged_in(mock_cms::USER_EMAIL, mock_cms::USER_PASSWORD)
            .await
    }

    /// Post the login form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn login(&self, client: &Client, email: &str, password: &str) -> Response {
        client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Failed to post login")
    }

    /// GET `path` and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, client: &Client, path: &str) -> Response {
        client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Post a form to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, client: &Client, path: &str, form: &[(&str, &str)]) -> Response {
        client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to post form")
    }
}

/// `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Every `Set-Cookie` header on a response.
#[must_use]
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}
