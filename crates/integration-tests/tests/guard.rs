//! Route guard and public page tests.

use reqwest::StatusCode;

use volta_integration_tests::{TestApp, location, mock_cms};

// ============================================================================
// Public pages
// ============================================================================

#[tokio::test]
async fn test_home_renders_cms_content() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let resp = app.get(&client, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let csp = resp
        .headers()
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(csp.contains(&app.cms.base_url), "CSP should allow CMS images: {csp}");
    assert!(csp.contains("'nonce-"), "slider script needs a nonce: {csp}");

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains(mock_cms::HERO_TITLE));
    // Slider images resolve against the CMS
    assert!(body.contains(&format!("{}/public/uploads/hero-2.jpg", app.cms.base_url)));
    // FAQ and contact details come from their sections
    assert!(body.contains("Do you ship worldwide?"));
    assert!(body.contains("sales@volta.test"));
}

#[tokio::test]
async fn test_home_falls_back_when_cms_is_down() {
    let app = TestApp::spawn().await;
    app.cms.fail("/api/site-sections", 500, "Database unavailable");
    let client = app.client();

    let resp = app.get(&client, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("YOUR GLOBAL POWER SOLUTION PARTNER"));
}

#[tokio::test]
async fn test_public_pages_need_no_login() {
    let app = TestApp::spawn().await;
    let client = app.client();

    for path in ["/", "/about", "/contact", "/login", "/register"] {
        let resp = app.get(&client, path).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }

    let resp = app.get(&client, "/static/css/main.css").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_checks() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let resp = app.get(&client, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.get(&client, "/health/ready").await;
    assert_eq!(resp.status(), StatusCode::OK);

    app.cms.fail("/api/site-sections", 503, "Maintenance");
    let resp = app.get(&client, "/health/ready").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Redirects
// ============================================================================

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let app = TestApp::spawn().await;
    let client = app.client();

    for path in [
        "/profile",
        "/about-us",
        "/gallery",
        "/news",
        "/calculator",
        "/dashboard",
        "/dashboard/users",
    ] {
        let resp = app.get(&client, path).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/login", "{path}");
    }
}

#[tokio::test]
async fn test_logged_in_user_is_sent_home_from_auth_pages() {
    let app = TestApp::spawn().await;
    let client = app.user().await;

    for path in ["/login", "/register"] {
        let resp = app.get(&client, path).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/", "{path}");
    }
}

#[tokio::test]
async fn test_dashboard_requires_admin_role() {
    let app = TestApp::spawn().await;

    let user = app.user().await;
    let resp = app.get(&user, "/dashboard/settings").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let admin = app.admin().await;
    let resp = app.get(&admin, "/dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logged_in_user_reaches_member_pages() {
    let app = TestApp::spawn().await;
    let client = app.user().await;

    for path in ["/gallery", "/news", "/about-us", "/calculator"] {
        let resp = app.get(&client, path).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_calculator_converts() {
    let app = TestApp::spawn().await;
    let client = app.user().await;

    let resp = app
        .get(&client, "/calculator?value=100&unit=kva&pf=0.8")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("80.00 kW"));

    let resp = app.get(&client, "/calculator?value=abc&unit=kw").await;
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("alert-error"));
}

#[tokio::test]
async fn test_unknown_public_path_is_not_found() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let resp = app.get(&client, "/forgot-password").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
