//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, Utc};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Turns a setting key into a label: `menu_items` becomes `menu items`.
///
/// Usage in templates: `{{ setting.key|humanize }}`
#[askama::filter_fn]
pub fn humanize(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(humanize_key(&value.to_string()))
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

pub(crate) fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
}

/// Resolve a stored image path against the CMS.
///
/// Paths starting with `/` live on the API server; absolute URLs are kept.
#[must_use]
pub fn asset_url(api_base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{path}", api_base.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

/// Date shown in tables and on the profile page, `-` when unknown.
#[must_use]
pub fn short_date(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |dt| dt.format("%b %-d, %Y").to_string())
}

/// Shorten `text` to `max` characters, adding `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", text.get(..cut).unwrap_or(text)),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("search_placeholder"), "search placeholder");
        assert_eq!(humanize_key("logo"), "logo");
    }

    #[test]
    fn test_asset_url() {
        assert_eq!(
            asset_url("http://localhost:4000/", "/public/uploads/a.png"),
            "http://localhost:4000/public/uploads/a.png"
        );
        assert_eq!(
            asset_url("http://localhost:4000", "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_short_date() {
        let dt = DateTime::parse_from_rfc3339("2024-03-05T10:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .ok();
        assert_eq!(short_date(dt.as_ref()), "Mar 5, 2024");
        assert_eq!(short_date(None), "-");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("abc", 3), "abc");
        assert_eq!(truncate_text("مولدات فولتا", 6), "مولدات...");
    }
}
