//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use volta_core::content::{FaqItem, ReasonItem, SliderImage};
use volta_core::{SettingContent, SiteSection, find_section};

use crate::branding;
use crate::filters;
use crate::filters::asset_url;
use crate::layout::{Chrome, load_sections};
use crate::middleware::{CspNonce, OptionalAuth};
use crate::state::AppState;

pub const HERO_SECTION: &str = "hero";
pub const WHO_WE_ARE_SECTION: &str = "who_we_are";
pub const WHY_WE_ARE_BEST_SECTION: &str = "why_we_are_best";
pub const FAQ_SECTION: &str = "faq";

/// One hero slide with its image resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub image_url: String,
    pub description: String,
}

/// The CMS-driven parts of the home page.
#[derive(Debug, Clone)]
pub struct HomeContent {
    pub hero_title: String,
    pub hero_button: String,
    pub slides: Vec<Slide>,
    pub who_we_are: String,
    pub vision: String,
    pub mission: String,
    pub reasons: Vec<ReasonItem>,
    pub faq: Vec<FaqItem>,
}

impl HomeContent {
    /// Read the home page content from the section list.
    ///
    /// Structured blocks use the first setting of the right shape in their
    /// section; each piece falls back to the built-in copy on its own.
    #[must_use]
    pub fn from_sections(sections: &[SiteSection], api_base: &str) -> Self {
        let hero = find_section(sections, HERO_SECTION);
        let who = find_section(sections, WHO_WE_ARE_SECTION);
        let text = |section: Option<&SiteSection>, key: &str, default: &str| {
            section
                .and_then(|s| s.value(key))
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let slides = first_of_shape(hero, SettingContent::into_slider)
            .filter(|items| !items.is_empty())
            .map_or_else(default_slides, |items| resolve_slides(api_base, items));

        Self {
            hero_title: text(hero, "title", branding::HERO_TITLE),
            hero_button: text(hero, "button_text", branding::HERO_BUTTON),
            slides,
            who_we_are: text(who, "content", branding::WHO_WE_ARE),
            vision: text(who, "vision", branding::VISION),
            mission: text(who, "mission", branding::MISSION),
            reasons: first_of_shape(
                find_section(sections, WHY_WE_ARE_BEST_SECTION),
                SettingContent::into_reasons,
            )
            .filter(|items| !items.is_empty())
            .unwrap_or_else(branding::default_reasons),
            faq: first_of_shape(find_section(sections, FAQ_SECTION), SettingContent::into_faq)
                .filter(|items| !items.is_empty())
                .unwrap_or_else(branding::default_faq),
        }
    }
}

/// First setting in `section` that classifies into the wanted shape.
fn first_of_shape<T>(
    section: Option<&SiteSection>,
    extract: impl Fn(SettingContent) -> Option<T>,
) -> Option<T> {
    section?
        .settings
        .iter()
        .find_map(|setting| extract(setting.content()))
}

fn resolve_slides(api_base: &str, items: Vec<SliderImage>) -> Vec<Slide> {
    items
        .into_iter()
        .map(|item| Slide {
            image_url: asset_url(api_base, &item.image),
            description: item.description,
        })
        .collect()
}

fn default_slides() -> Vec<Slide> {
    vec![Slide {
        image_url: branding::HERO_IMAGE.to_string(),
        description: branding::SITE_NAME.to_string(),
    }]
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub content: HomeContent,
    pub stats: &'static [(&'static str, &'static str)],
    pub core_values: &'static [(&'static str, &'static str)],
    pub products: &'static [(&'static str, &'static str)],
    pub coverage: &'static [&'static str],
    pub testimonials: &'static [(&'static str, &'static str)],
    pub brands: &'static [&'static str],
}

/// Display the home page.
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
    nonce: CspNonce,
) -> impl IntoResponse {
    let sections = load_sections(&state).await;
    let api_base = state.cms().base_url();

    HomeTemplate {
        chrome: Chrome::new(
            &sections,
            api_base,
            "/",
            current.as_ref().map(|c| &c.user),
            nonce.value(),
        ),
        content: HomeContent::from_sections(&sections, api_base),
        stats: &branding::STATS,
        core_values: &branding::CORE_VALUES,
        products: &branding::PRODUCTS,
        coverage: &branding::COVERAGE,
        testimonials: &branding::TESTIMONIALS,
        brands: &branding::BRANDS,
    }
}
