//! Page chrome: the navbar, top contact bar and footer.
//!
//! Content comes from the `navbar` section (`nav_text`, `menu_items`,
//! `search_placeholder`, `logo`) and the `footer` section (`contact_info`).
//! Every field falls back to the brand defaults on its own.

use std::sync::Arc;

use tracing::warn;

use volta_core::content::ContactInfo;
use volta_core::{SettingContent, SiteSection, User, find_section};

use crate::branding;
use crate::filters::asset_url;
use crate::middleware::CspNonce;
use crate::state::AppState;

pub const NAVBAR_SECTION: &str = "navbar";
pub const FOOTER_SECTION: &str = "footer";

/// A rendered navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Contact details shown in the top bar and footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactBar {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub facebook: String,
    pub instagram: String,
    pub youtube: String,
    pub whatsapp: String,
}

impl Default for ContactBar {
    fn default() -> Self {
        Self {
            email: branding::CONTACT_EMAIL.to_string(),
            phone: branding::CONTACT_PHONE.to_string(),
            address: branding::CONTACT_ADDRESS.to_string(),
            facebook: branding::FACEBOOK_URL.to_string(),
            instagram: branding::INSTAGRAM_URL.to_string(),
            youtube: branding::YOUTUBE_URL.to_string(),
            whatsapp: branding::WHATSAPP_URL.to_string(),
        }
    }
}

impl ContactBar {
    /// Overlay stored contact info on the defaults. Blank fields keep the
    /// default. The CMS has no WhatsApp field, so `tiktok` fills that slot.
    #[must_use]
    pub fn from_contact_info(info: &ContactInfo) -> Self {
        let fallback = Self::default();
        let pick = |key: &str, default: String| info.non_empty(key).map_or(default, str::to_string);
        Self {
            email: pick("email", fallback.email),
            phone: pick("phone", fallback.phone),
            address: pick("address", fallback.address),
            facebook: pick("facebook", fallback.facebook),
            instagram: pick("instagram", fallback.instagram),
            youtube: pick("youtube", fallback.youtube),
            whatsapp: pick("tiktok", fallback.whatsapp),
        }
    }

    /// Contact details from the `footer` section, or the defaults.
    #[must_use]
    pub fn from_sections(sections: &[SiteSection]) -> Self {
        find_section(sections, FOOTER_SECTION)
            .and_then(|footer| footer.value("contact_info"))
            .and_then(|raw| SettingContent::classify(raw).into_contact())
            .map_or_else(Self::default, |info| Self::from_contact_info(&info))
    }

    /// `tel:` link target with spaces removed.
    #[must_use]
    pub fn phone_href(&self) -> String {
        self.phone.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// The logged-in user as shown in the navbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBadge {
    pub name: String,
    pub is_admin: bool,
}

impl From<&User> for UserBadge {
    fn from(user: &User) -> Self {
        Self {
            name: user.display_name().to_string(),
            is_admin: user.is_admin(),
        }
    }
}

/// Everything `base.html` needs around the page body.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub nav_text: String,
    pub logo_url: String,
    pub search_placeholder: String,
    pub nav_items: Vec<NavLink>,
    pub contact: ContactBar,
    pub services: &'static [&'static str],
    pub user: Option<UserBadge>,
    pub nonce: String,
}

impl Chrome {
    /// Build the chrome from the section list.
    #[must_use]
    pub fn new(
        sections: &[SiteSection],
        api_base: &str,
        current_path: &str,
        user: Option<&User>,
        nonce: &str,
    ) -> Self {
        let navbar = find_section(sections, NAVBAR_SECTION);
        let setting = |key: &str| navbar.and_then(|section| section.value(key));

        let labels = setting("menu_items").and_then(menu_labels);
        let nav_items = match labels {
            Some(labels) => labels
                .iter()
                .map(|label| nav_link(label, href_for_label(label), current_path))
                .collect(),
            None => branding::NAV_ITEMS
                .iter()
                .map(|item| nav_link(item.label, item.href.to_string(), current_path))
                .collect(),
        };

        Self {
            nav_text: setting("nav_text").unwrap_or(branding::NAV_TEXT).to_string(),
            logo_url: setting("logo").map_or_else(
                || branding::LOGO_PATH.to_string(),
                |logo| logo_url(api_base, logo),
            ),
            search_placeholder: setting("search_placeholder")
                .unwrap_or(branding::SEARCH_PLACEHOLDER)
                .to_string(),
            nav_items,
            contact: ContactBar::from_sections(sections),
            services: &branding::FOOTER_SERVICES,
            user: user.map(UserBadge::from),
            nonce: nonce.to_string(),
        }
    }

    /// Build the chrome for a request, fetching sections through the cache.
    pub async fn load(
        state: &AppState,
        current_path: &str,
        user: Option<&User>,
        nonce: &CspNonce,
    ) -> Self {
        let sections = load_sections(state).await;
        Self::new(
            &sections,
            state.cms().base_url(),
            current_path,
            user,
            nonce.value(),
        )
    }
}

/// Logos uploaded to the CMS are stored as `/public/...` paths on the API
/// server; anything else is used as given.
#[must_use]
pub fn logo_url(api_base: &str, logo: &str) -> String {
    if logo.starts_with("/public/") {
        asset_url(api_base, logo)
    } else {
        logo.to_string()
    }
}

/// Parse `menu_items`: a non-empty JSON array of labels.
fn menu_labels(raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(labels) if !labels.is_empty() => Some(labels),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "Error parsing menu items");
            None
        }
    }
}

/// Known labels keep their route; unknown ones map to `/{label}` lowercased.
fn href_for_label(label: &str) -> String {
    branding::NAV_ITEMS
        .iter()
        .find(|item| item.label.eq_ignore_ascii_case(label))
        .map_or_else(
            || format!("/{}", label.to_lowercase()),
            |item| item.href.to_string(),
        )
}

fn nav_link(label: &str, href: String, current_path: &str) -> NavLink {
    let active = if href == "/" {
        current_path == "/"
    } else {
        current_path == href || current_path.starts_with(&format!("{href}/"))
    };
    NavLink {
        label: label.to_string(),
        href,
        active,
    }
}

/// Fetch the (cached) section list, or an empty one if the CMS is down.
pub async fn load_sections(state: &AppState) -> Arc<Vec<SiteSection>> {
    match state.cms().list_sections().await {
        Ok(sections) => sections,
        Err(e) => {
            warn!(error = %e, "Using default content, site sections unavailable");
            Arc::new(Vec::new())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const API: &str = "http://localhost:4000";

    fn sections(json: &str) -> Vec<SiteSection> {
        serde_json::from_str(json).unwrap()
    }

    fn navbar_and_footer() -> Vec<SiteSection> {
        sections(
            r#"[
            {"id":"1","title":"navbar","settings":[
                {"id":"10","sectionId":"1","key":"nav_text","value":"Volta FZE"},
                {"id":"11","sectionId":"1","key":"menu_items","value":"[\"home\",\"Products\",\"Contact\"]"},
                {"id":"12","sectionId":"1","key":"logo","value":"/public/uploads/logo.png"}
            ]},
            {"id":"2","title":"footer","settings":[
                {"id":"20","sectionId":"2","key":"contact_info","value":"{\"email\":\"sales@volta.ae\",\"phone\":\"\",\"tiktok\":\"https://tiktok.com/@volta\"}"}
            ]}
        ]"#,
        )
    }

    #[test]
    fn test_defaults_without_sections() {
        let chrome = Chrome::new(&[], API, "/", None, "n");
        assert_eq!(chrome.nav_text, branding::NAV_TEXT);
        assert_eq!(chrome.logo_url, branding::LOGO_PATH);
        assert_eq!(chrome.search_placeholder, branding::SEARCH_PLACEHOLDER);
        assert_eq!(chrome.nav_items.len(), branding::NAV_ITEMS.len());
        assert!(chrome.nav_items[0].active);
        assert_eq!(chrome.contact, ContactBar::default());
        assert!(chrome.user.is_none());
    }

    #[test]
    fn test_navbar_from_section() {
        let chrome = Chrome::new(&navbar_and_footer(), API, "/contact", None, "n");
        assert_eq!(chrome.nav_text, "Volta FZE");
        assert_eq!(chrome.logo_url, "http://localhost:4000/public/uploads/logo.png");
        // Section without search_placeholder keeps the default
        assert_eq!(chrome.search_placeholder, branding::SEARCH_PLACEHOLDER);

        let links: Vec<(&str, &str)> = chrome
            .nav_items
            .iter()
            .map(|l| (l.label.as_str(), l.href.as_str()))
            .collect();
        assert_eq!(
            links,
            vec![("home", "/"), ("Products", "/products"), ("Contact", "/contact")]
        );
        assert!(chrome.nav_items[2].active);
        assert!(!chrome.nav_items[0].active);
    }

    #[test]
    fn test_contact_overlay() {
        let contact = ContactBar::from_sections(&navbar_and_footer());
        assert_eq!(contact.email, "sales@volta.ae");
        assert_eq!(contact.phone, branding::CONTACT_PHONE);
        assert_eq!(contact.whatsapp, "https://tiktok.com/@volta");
        assert_eq!(contact.facebook, branding::FACEBOOK_URL);
    }

    #[test]
    fn test_bad_menu_items_fall_back() {
        assert!(menu_labels("not json").is_none());
        assert!(menu_labels("[]").is_none());
        assert_eq!(menu_labels(r#"["News"]"#).unwrap(), vec!["News"]);
    }

    #[test]
    fn test_logo_url() {
        assert_eq!(logo_url(API, "/static/images/logo.png"), "/static/images/logo.png");
        assert_eq!(logo_url(API, "/public/logo.png"), "http://localhost:4000/public/logo.png");
    }

    #[test]
    fn test_phone_href() {
        let contact = ContactBar {
            phone: "+971 50 363 5488".to_string(),
            ..ContactBar::default()
        };
        assert_eq!(contact.phone_href(), "+971503635488");
    }
}
