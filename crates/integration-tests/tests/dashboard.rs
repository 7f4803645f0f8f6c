//! Admin dashboard tests: settings editor, sections and users.

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};

use volta_integration_tests::{TestApp, location, mock_cms};

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_settings_list_groups_by_section() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app.get(&admin, "/dashboard/settings").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");

    assert!(body.contains("why we are best"));
    assert!(body.contains("Do you ship worldwide?"));
    // Contact info is shown field by field
    assert!(body.contains("sales@volta.test"));
    assert!(body.contains(&format!(
        "/dashboard/settings/{}/edit",
        mock_cms::SLIDES_SETTING_ID
    )));
}

#[tokio::test]
async fn test_slider_editor_add_then_save() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let path = format!("/dashboard/settings/{}/edit", mock_cms::SLIDES_SETTING_ID);

    let resp = app.get(&admin, &path).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("name=\"image.1\""));
    assert!(!body.contains("name=\"image.2\""));

    // Adding re-renders with a blank third slide and does not save
    let resp = app
        .post_form(
            &admin,
            &path,
            &[
                ("image.0", "/public/uploads/hero-1.jpg"),
                ("description.0", "Diesel range"),
                ("image.1", "/public/uploads/hero-2.jpg"),
                ("description.1", "Gas range"),
                ("action", "add"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("name=\"image.2\""));
    assert!(body.contains("Slide 3"));
    let stored = app
        .cms
        .setting_value(mock_cms::SLIDES_SETTING_ID)
        .expect("slides setting");
    assert!(!stored.contains("Slide 3"));

    // Saving drops the first slide and writes the JSON back
    let resp = app
        .post_form(
            &admin,
            &path,
            &[
                ("image.0", "/public/uploads/hero-2.jpg"),
                ("description.0", "Gas range"),
                ("image.1", "/public/uploads/hero-3.jpg"),
                ("description.1", "Hybrid range"),
                ("action", "save"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/dashboard/settings?success=Setting%20updated"
    );

    let stored = app
        .cms
        .setting_value(mock_cms::SLIDES_SETTING_ID)
        .expect("slides setting");
    let slides: serde_json::Value = serde_json::from_str(&stored).expect("slider JSON");
    assert_eq!(slides.as_array().map(Vec::len), Some(2));
    assert_eq!(slides[1]["description"], "Hybrid range");
    assert!(!stored.contains("Diesel range"));
}

#[tokio::test]
async fn test_faq_editor_remove() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let path = format!("/dashboard/settings/{}/edit", mock_cms::FAQ_SETTING_ID);

    let resp = app
        .post_form(
            &admin,
            &path,
            &[
                ("question.0", "Do you ship worldwide?"),
                ("answer.0", "Yes, to over 50 countries."),
                ("action", "remove.0"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(!body.contains("name=\"question.0\""));

    // Removing a row that was never posted is a bad request
    let resp = app
        .post_form(&admin, &path, &[("action", "remove.5")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reasons_editor_remove_then_reorder() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let path = format!("/dashboard/settings/{}/edit", mock_cms::REASONS_SETTING_ID);

    let resp = app.get(&admin, &path).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("name=\"reason_id.2\""));

    // Removing the first reason re-renders the remaining two
    let resp = app
        .post_form(
            &admin,
            &path,
            &[
                ("reason_id.0", "1"),
                ("title.0", "Quality"),
                ("description.0", "Tested units."),
                ("reason_id.1", "2"),
                ("title.1", "Support"),
                ("description.1", "Around the clock."),
                ("reason_id.2", "3"),
                ("title.2", "Price"),
                ("description.2", "Direct from the factory."),
                ("action", "remove.0"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(!body.contains("value=\"Quality\""));
    assert!(body.contains("value=\"Support\""));
    assert!(!body.contains("name=\"reason_id.2\""));

    // Support moves to the top; the blank order box leaves Price last
    let resp = app
        .post_form(
            &admin,
            &path,
            &[
                ("reason_id.0", "2"),
                ("title.0", "Quality"),
                ("description.0", "Tested units."),
                ("reason_id.1", "1"),
                ("title.1", "Support"),
                ("description.1", "Around the clock."),
                ("reason_id.2", ""),
                ("title.2", "Price"),
                ("description.2", "Direct from the factory."),
                ("action", "save"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/dashboard/settings?success=Setting%20updated"
    );

    let stored = app
        .cms
        .setting_value(mock_cms::REASONS_SETTING_ID)
        .expect("reasons setting");
    let reasons: serde_json::Value = serde_json::from_str(&stored).expect("reasons JSON");
    let order: Vec<(u64, &str)> = reasons
        .as_array()
        .expect("reasons array")
        .iter()
        .map(|r| {
            (
                r["reason_id"].as_u64().unwrap_or_default(),
                r["title"].as_str().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(order, [(1, "Support"), (2, "Quality"), (3, "Price")]);
}

#[tokio::test]
async fn test_contact_editor_keeps_untouched_fields() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let path = format!("/dashboard/settings/{}/edit", mock_cms::CONTACT_SETTING_ID);

    let resp = app.get(&admin, &path).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("name=\"contact.social\""));
    assert!(body.contains("name=\"contact.branches\""));

    // Every field is posted back as rendered; only the phone changes
    let resp = app
        .post_form(
            &admin,
            &path,
            &[
                ("contact.email", "sales@volta.test"),
                ("contact.phone", "+971 4 555 0101"),
                ("contact.address", "Jebel Ali, Dubai"),
                ("contact.social", r#"{"facebook":"voltagenerators"}"#),
                ("contact.branches", "3"),
                ("contact.fax", "not a stored field"),
                ("action", "save"),
            ],
        )
        .await;
    assert_eq!(
        location(&resp),
        "/dashboard/settings?success=Setting%20updated"
    );

    let stored = app
        .cms
        .setting_value(mock_cms::CONTACT_SETTING_ID)
        .expect("contact setting");
    let contact: serde_json::Value = serde_json::from_str(&stored).expect("contact JSON");
    assert_eq!(
        contact,
        serde_json::json!({
            "email": "sales@volta.test",
            "phone": "+971 4 555 0101",
            "address": "Jebel Ali, Dubai",
            "social": {"facebook": "voltagenerators"},
            "branches": 3
        })
    );

    // The footer shows the new phone number
    let visitor = app.client();
    let body = app
        .get(&visitor, "/")
        .await
        .text()
        .await
        .expect("Failed to read body");
    assert!(body.contains("+971 4 555 0101"));
}

#[tokio::test]
async fn test_editor_rejects_index_over_limit() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app
        .post_form(
            &admin,
            &format!("/dashboard/settings/{}/edit", mock_cms::FAQ_SETTING_ID),
            &[
                ("question.0", "Do you ship worldwide?"),
                ("answer.0", "Yes."),
                ("question.500", "Overflow"),
                ("answer.500", "Overflow"),
                ("action", "save"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let stored = app
        .cms
        .setting_value(mock_cms::FAQ_SETTING_ID)
        .expect("faq setting");
    assert!(!stored.contains("Overflow"));
}

#[tokio::test]
async fn test_failed_save_keeps_edits_and_shows_error() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let setting_path = format!("/api/settings/{}", mock_cms::FAQ_SETTING_ID);
    app.cms.fail(&setting_path, 400, "Value is too long");

    let resp = app
        .post_form(
            &admin,
            &format!("/dashboard/settings/{}/edit", mock_cms::FAQ_SETTING_ID),
            &[
                ("question.0", "Edited question"),
                ("answer.0", "Edited answer"),
                ("action", "save"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Value is too long"));
    assert!(body.contains("Edited question"));
}

#[tokio::test]
async fn test_unknown_setting_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app.get(&admin, "/dashboard/settings/999/edit").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_and_delete_setting() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app
        .post_form(
            &admin,
            "/dashboard/settings",
            &[
                ("section_title", "hero"),
                ("key", "button_text"),
                ("value", "CALL US"),
            ],
        )
        .await;
    assert_eq!(
        location(&resp),
        "/dashboard/settings?success=Setting%20created"
    );
    let hero = app.cms.section_by_title("hero").expect("hero section");
    let created = hero
        .settings
        .iter()
        .find(|s| s.key == "button_text")
        .expect("new setting");

    // The public home page picks it up after the cache is invalidated
    let visitor = app.client();
    let body = app.get(&visitor, "/").await.text().await.expect("Failed to read body");
    assert!(body.contains("CALL US"));

    let delete_path = format!("/dashboard/settings/{}/delete", created.id);
    let resp = app.get(&admin, &delete_path).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.post_form(&admin, &delete_path, &[]).await;
    assert_eq!(
        location(&resp),
        "/dashboard/settings?success=Setting%20deleted"
    );
    assert!(app.cms.setting_value(created.id.as_str()).is_none());
}

#[tokio::test]
async fn test_upload_single_file() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let part = Part::bytes(b"fake image bytes".to_vec())
        .file_name("hero-4.jpg")
        .mime_str("image/jpeg")
        .expect("valid mime");
    let resp = admin
        .post(app.url("/dashboard/settings/uploads"))
        .multipart(Form::new().part("file", part))
        .send()
        .await
        .expect("Failed to upload");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("/public/uploads/1-hero-4.jpg"));
    assert!(body.contains("16 bytes"));
}

// ============================================================================
// Sections
// ============================================================================

#[tokio::test]
async fn test_section_lifecycle() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app
        .post_form(
            &admin,
            "/dashboard/sections",
            &[("title", "gallery"), ("description", "Photos")],
        )
        .await;
    assert_eq!(
        location(&resp),
        "/dashboard/sections?success=Section%20created"
    );
    let section = app.cms.section_by_title("gallery").expect("created");

    let edit_path = format!("/dashboard/sections/{}/edit", section.id);
    let resp = app
        .post_form(
            &admin,
            &edit_path,
            &[("title", "projects"), ("description", "")],
        )
        .await;
    assert_eq!(
        location(&resp),
        "/dashboard/sections?success=Section%20updated"
    );
    let renamed = app.cms.section_by_title("projects").expect("renamed");
    assert_eq!(renamed.description, "");

    let resp = app
        .post_form(
            &admin,
            &format!("/dashboard/sections/{}/delete", section.id),
            &[],
        )
        .await;
    assert_eq!(
        location(&resp),
        "/dashboard/sections?success=Section%20deleted"
    );
    assert!(app.cms.section_by_title("projects").is_none());
}

#[tokio::test]
async fn test_section_requires_title() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app
        .post_form(&admin, "/dashboard/sections", &[("title", "  ")])
        .await;
    assert_eq!(
        location(&resp),
        "/dashboard/sections?error=Section%20title%20is%20required"
    );
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_users_sorted_by_email_desc() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app.get(&admin, "/dashboard/users?sort=email&dir=desc").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");

    let rami = body.find(mock_cms::USER_EMAIL).expect("user row");
    let admin_row = body.rfind(mock_cms::ADMIN_EMAIL).expect("admin row");
    assert!(rami < admin_row, "rami@ sorts after admin@ descending");
    assert!(body.contains("chip-primary"));
    // Clicking the active column flips direction
    assert!(body.contains("/dashboard/users?sort=email&amp;dir=asc"));
}

#[tokio::test]
async fn test_users_api_error_is_shown() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    app.cms.fail("/api/users", 500, "Failed to fetch users");

    let resp = app.get(&admin, "/dashboard/users").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Failed to fetch users"));
    assert!(body.contains("No users found"));
}

#[tokio::test]
async fn test_create_and_promote_user() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app
        .post_form(
            &admin,
            "/dashboard/users",
            &[
                ("email", "ops@volta.test"),
                ("password", "secret1"),
                ("full_name", "Ops Team"),
                ("role", "user"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/dashboard/users?success=User%20created");
    let created = app.cms.user_by_email("ops@volta.test").expect("created");

    let resp = app
        .post_form(
            &admin,
            &format!("/dashboard/users/{}/edit", created.id),
            &[
                ("email", "ops@volta.test"),
                ("full_name", "Ops Team"),
                ("role", "manager"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/dashboard/users?success=User%20updated");
    let updated = app.cms.user_by_email("ops@volta.test").expect("updated");
    assert_eq!(updated.role.as_str(), "manager");
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;

    let resp = app
        .post_form(
            &admin,
            &format!("/dashboard/users/{}/delete", mock_cms::ADMIN_ID),
            &[],
        )
        .await;
    assert!(location(&resp).contains("error="));
    assert!(app.cms.user_by_email(mock_cms::ADMIN_EMAIL).is_some());

    let resp = app
        .post_form(
            &admin,
            &format!("/dashboard/users/{}/delete", mock_cms::USER_ID),
            &[],
        )
        .await;
    assert_eq!(location(&resp), "/dashboard/users?success=User%20deleted");
    assert!(app.cms.user_by_email(mock_cms::USER_EMAIL).is_none());
}
