//! Static and lightly dynamic page handlers: about, contact, gallery, news
//! and the power calculator.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use thiserror::Error;

use crate::branding;
use crate::filters;
use crate::layout::Chrome;
use crate::middleware::{CspNonce, OptionalAuth};
use crate::state::AppState;

/// Power factor assumed when none is given.
pub const DEFAULT_POWER_FACTOR: f64 = 0.8;

// =============================================================================
// Templates
// =============================================================================

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub chrome: Chrome,
    pub body: &'static str,
    pub vision: &'static str,
    pub mission: &'static str,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub chrome: Chrome,
}

/// Placeholder template for pages without content yet.
#[derive(Template, WebTemplate)]
#[template(path = "pages/placeholder.html")]
pub struct PlaceholderTemplate {
    pub chrome: Chrome,
    pub title: &'static str,
}

/// Calculator page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/calculator.html")]
pub struct CalculatorTemplate {
    pub chrome: Chrome,
    pub value: String,
    pub unit: String,
    pub power_factor: String,
    pub result: Option<Conversion>,
    pub error: Option<String>,
}

async fn chrome(state: &AppState, uri: &OriginalUri, auth: &OptionalAuth, nonce: &CspNonce) -> Chrome {
    Chrome::load(
        state,
        uri.path(),
        auth.0.as_ref().map(|c| &c.user),
        nonce,
    )
    .await
}

// =============================================================================
// Pages
// =============================================================================

/// Display the about page (`/about` and `/about-us`).
pub async fn about(
    State(state): State<AppState>,
    uri: OriginalUri,
    auth: OptionalAuth,
    nonce: CspNonce,
) -> impl IntoResponse {
    AboutTemplate {
        chrome: chrome(&state, &uri, &auth, &nonce).await,
        body: branding::ABOUT_US,
        vision: branding::VISION,
        mission: branding::MISSION,
    }
}

/// Display the contact page.
pub async fn contact(
    State(state): State<AppState>,
    uri: OriginalUri,
    auth: OptionalAuth,
    nonce: CspNonce,
) -> impl IntoResponse {
    ContactTemplate {
        chrome: chrome(&state, &uri, &auth, &nonce).await,
    }
}

/// Display the gallery page.
pub async fn gallery(
    State(state): State<AppState>,
    uri: OriginalUri,
    auth: OptionalAuth,
    nonce: CspNonce,
) -> impl IntoResponse {
    PlaceholderTemplate {
        chrome: chrome(&state, &uri, &auth, &nonce).await,
        title: "Gallery",
    }
}

/// Display the news page.
pub async fn news(
    State(state): State<AppState>,
    uri: OriginalUri,
    auth: OptionalAuth,
    nonce: CspNonce,
) -> impl IntoResponse {
    PlaceholderTemplate {
        chrome: chrome(&state, &uri, &auth, &nonce).await,
        title: "News",
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Which quantity the visitor entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUnit {
    Kw,
    Kva,
}

/// A completed kW / kVA conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub kw: f64,
    pub kva: f64,
    pub power_factor: f64,
}

impl Conversion {
    #[must_use]
    pub fn kw_display(&self) -> String {
        format!("{:.2}", self.kw)
    }

    #[must_use]
    pub fn kva_display(&self) -> String {
        format!("{:.2}", self.kva)
    }
}

/// Invalid calculator input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculatorError {
    #[error("Enter a positive power value")]
    InvalidPower,
    #[error("Power factor must be between 0 and 1")]
    InvalidPowerFactor,
    #[error("Choose kW or kVA")]
    InvalidUnit,
}

/// Convert between real power (kW) and apparent power (kVA).
///
/// `kW = kVA × power factor`.
///
/// # Errors
///
/// Returns an error for a non-positive power or a power factor outside `(0, 1]`.
pub fn convert(value: f64, unit: PowerUnit, power_factor: f64) -> Result<Conversion, CalculatorError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalculatorError::InvalidPower);
    }
    if !power_factor.is_finite() || power_factor <= 0.0 || power_factor > 1.0 {
        return Err(CalculatorError::InvalidPowerFactor);
    }
    Ok(match unit {
        PowerUnit::Kva => Conversion {
            kw: value * power_factor,
            kva: value,
            power_factor,
        },
        PowerUnit::Kw => Conversion {
            kw: value,
            kva: value / power_factor,
            power_factor,
        },
    })
}

/// Calculator form, submitted with GET.
#[derive(Debug, Default, Deserialize)]
pub struct CalculatorQuery {
    pub value: Option<String>,
    pub unit: Option<String>,
    pub pf: Option<String>,
}

impl CalculatorQuery {
    /// `None` until the form has been submitted with a value.
    fn evaluate(&self) -> Option<Result<Conversion, CalculatorError>> {
        let value = self.value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        Some(self.evaluate_value(value))
    }

    fn evaluate_value(&self, value: &str) -> Result<Conversion, CalculatorError> {
        let value = value
            .parse::<f64>()
            .map_err(|_| CalculatorError::InvalidPower)?;
        let unit = match self.unit.as_deref().unwrap_or("kva") {
            "kva" => PowerUnit::Kva,
            "kw" => PowerUnit::Kw,
            _ => return Err(CalculatorError::InvalidUnit),
        };
        let power_factor = match self.pf.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_POWER_FACTOR,
            Some(pf) => pf
                .parse::<f64>()
                .map_err(|_| CalculatorError::InvalidPowerFactor)?,
        };
        convert(value, unit, power_factor)
    }
}

/// Display the calculator, with a result when the form was submitted.
pub async fn calculator(
    State(state): State<AppState>,
    uri: OriginalUri,
    auth: OptionalAuth,
    nonce: CspNonce,
    Query(query): Query<CalculatorQuery>,
) -> impl IntoResponse {
    let (result, error) = match query.evaluate() {
        Some(Ok(conversion)) => (Some(conversion), None),
        Some(Err(e)) => (None, Some(e.to_string())),
        None => (None, None),
    };

    CalculatorTemplate {
        chrome: chrome(&state, &uri, &auth, &nonce).await,
        value: query.value.unwrap_or_default(),
        unit: query.unit.unwrap_or_else(|| "kva".to_string()),
        power_factor: query
            .pf
            .filter(|pf| !pf.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_POWER_FACTOR.to_string()),
        result,
        error,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_kva_to_kw() {
        let c = convert(100.0, PowerUnit::Kva, 0.8).unwrap();
        assert!(close(c.kw, 80.0));
        assert_eq!(c.kw_display(), "80.00");
    }

    #[test]
    fn test_kw_to_kva() {
        let c = convert(80.0, PowerUnit::Kw, 0.8).unwrap();
        assert!(close(c.kva, 100.0));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            convert(0.0, PowerUnit::Kw, 0.8),
            Err(CalculatorError::InvalidPower)
        );
        assert_eq!(
            convert(10.0, PowerUnit::Kw, 1.2),
            Err(CalculatorError::InvalidPowerFactor)
        );
        assert_eq!(
            convert(10.0, PowerUnit::Kw, 0.0),
            Err(CalculatorError::InvalidPowerFactor)
        );
    }

    #[test]
    fn test_query_defaults() {
        let unsubmitted = CalculatorQuery::default();
        assert!(unsubmitted.evaluate().is_none());

        let query = CalculatorQuery {
            value: Some("500".to_string()),
            unit: None,
            pf: Some(String::new()),
        };
        let c = query.evaluate().unwrap().unwrap();
        assert!(close(c.kw, 400.0));
        assert!(close(c.power_factor, DEFAULT_POWER_FACTOR));
    }

    #[test]
    fn test_query_errors() {
        let query = CalculatorQuery {
            value: Some("lots".to_string()),
            ..CalculatorQuery::default()
        };
        assert_eq!(query.evaluate(), Some(Err(CalculatorError::InvalidPower)));

        let query = CalculatorQuery {
            value: Some("10".to_string()),
            unit: Some("hp".to_string()),
            pf: None,
        };
        assert_eq!(query.evaluate(), Some(Err(CalculatorError::InvalidUnit)));
    }
}
