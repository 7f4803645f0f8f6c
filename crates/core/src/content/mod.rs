//! Setting value classification.
//!
//! Setting values are free-form strings. Most of them hold JSON, and the
//! admin dashboard and public pages need to know which of a small, closed
//! set of shapes a value holds before they can render or edit it.
//! [`SettingContent::classify`] sniffs the shape; it never fails, anything
//! unrecognised comes back as [`SettingContent::Text`].
//!
//! # Classification rules
//!
//! | Parsed value | Result |
//! |--------------|--------|
//! | array, first element has a truthy `image` | [`SettingContent::Slider`] |
//! | array, first element has a truthy `question` | [`SettingContent::Faq`] |
//! | array, first element has a truthy `reason_id` | [`SettingContent::Reasons`] |
//! | object with a truthy `email` | [`SettingContent::Contact`] |
//! | any other array | [`SettingContent::List`] |
//! | anything else | [`SettingContent::Text`] |
//! | not JSON, starts with `/` | [`SettingContent::ImagePath`] |
//! | not JSON | [`SettingContent::Text`] |

pub mod editor;
pub mod reasons;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use editor::{EditorAction, EditorForm, EditorState};
pub use reasons::ReasonList;

/// Errors raised while editing structured content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Unknown editor action: {0}")]
    UnknownAction(String),

    #[error("No item at position {0}")]
    NoSuchItem(usize),

    #[error("Item position {0} is over the limit of {limit}", limit = editor::MAX_ITEMS)]
    TooManyItems(usize),

    #[error("Failed to serialize content: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One hero slider image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SliderImage {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// One FAQ entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaqItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// One "why we are best" reason. `reason_id` doubles as the display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReasonItem {
    pub reason_id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Contact details as an ordered list of fields.
///
/// The well-known keys are `email`, `phone`, `address`, `facebook`,
/// `instagram`, `youtube` and `tiktok`, but any extra keys are kept. Field
/// order is the order found in the stored JSON. Every field is shown and
/// edited as text; non-string values are written back unchanged unless
/// their text was edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    fields: Vec<ContactField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ContactField {
    key: String,
    text: String,
    stored: Value,
}

impl ContactInfo {
    fn from_map(map: &serde_json::Map<String, Value>) -> Self {
        let fields = map
            .iter()
            .map(|(key, value)| ContactField {
                key: key.clone(),
                text: value_text(value),
                stored: value.clone(),
            })
            .collect();
        Self { fields }
    }

    /// Value of `key` as text, if the field exists.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.text.as_str())
    }

    /// Value of `key`, or `None` when the field is missing or blank.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Overwrite an existing field. Unknown keys are ignored and reported
    /// with `false`: contact fields are never added from the editor.
    ///
    /// Setting a field to the text it already shows keeps the stored JSON
    /// value as it was.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.key == key) else {
            return false;
        };
        let value = value.into();
        if field.text != value {
            field.stored = Value::String(value.clone());
            field.text = value;
        }
        true
    }

    /// Fields in stored order, as text.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|f| (f.key.as_str(), f.text.as_str()))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|f| (f.key.clone(), f.stored.clone()))
                .collect(),
        )
    }
}

/// The shape of a setting value, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentShape {
    Slider,
    Faq,
    Reasons,
    Contact,
    List,
    Text,
    ImagePath,
}

impl ContentShape {
    /// Lowercase label, used as a CSS modifier and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slider => "slider",
            Self::Faq => "faq",
            Self::Reasons => "reasons",
            Self::Contact => "contact",
            Self::List => "list",
            Self::Text => "text",
            Self::ImagePath => "image",
        }
    }

    /// Which editor handles values of this shape.
    #[must_use]
    pub const fn editor_kind(self) -> EditorKind {
        match self {
            Self::Slider => EditorKind::Slider,
            Self::Faq => EditorKind::Faq,
            Self::Reasons => EditorKind::Reasons,
            Self::Contact => EditorKind::Contact,
            Self::List | Self::Text | Self::ImagePath => EditorKind::Text,
        }
    }
}

/// Editor selected for a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    Slider,
    Faq,
    Reasons,
    Contact,
    Text,
}

/// A classified setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingContent {
    Slider(Vec<SliderImage>),
    Faq(Vec<FaqItem>),
    Reasons(Vec<ReasonItem>),
    Contact(ContactInfo),
    /// A plain array, already joined with `", "`.
    List(String),
    Text(String),
    ImagePath(String),
}

impl SettingContent {
    /// Classify a raw setting value.
    ///
    /// ```
    /// use volta_core::content::{ContentShape, SettingContent};
    ///
    /// let slider = SettingContent::classify(r#"[{"image":"/a.jpg","description":"A"}]"#);
    /// assert_eq!(slider.shape(), ContentShape::Slider);
    ///
    /// let path = SettingContent::classify("/uploads/logo.png");
    /// assert_eq!(path, SettingContent::ImagePath("/uploads/logo.png".into()));
    ///
    /// let list = SettingContent::classify(r#"["Perkins", "Cummins"]"#);
    /// assert_eq!(list, SettingContent::List("Perkins, Cummins".into()));
    /// ```
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let Ok(parsed) = serde_json::from_str::<Value>(raw) else {
            return if raw.starts_with('/') {
                Self::ImagePath(raw.to_owned())
            } else {
                Self::Text(raw.to_owned())
            };
        };

        match parsed {
            Value::Array(items) => Self::classify_array(raw, items),
            Value::Object(map) if map.get("email").is_some_and(is_truthy) => {
                Self::Contact(ContactInfo::from_map(&map))
            }
            _ => Self::Text(raw.to_owned()),
        }
    }

    fn classify_array(raw: &str, items: Vec<Value>) -> Self {
        let first_has = |field: &str| {
            items
                .first()
                .and_then(|first| first.get(field))
                .is_some_and(is_truthy)
        };

        let decoded = if first_has("image") {
            decode_all(items).map(Self::Slider)
        } else if first_has("question") {
            decode_all(items).map(Self::Faq)
        } else if first_has("reason_id") {
            decode_all(items).map(Self::Reasons)
        } else {
            Some(Self::List(join_list(&items)))
        };

        decoded.unwrap_or_else(|| Self::Text(raw.to_owned()))
    }

    #[must_use]
    pub const fn shape(&self) -> ContentShape {
        match self {
            Self::Slider(_) => ContentShape::Slider,
            Self::Faq(_) => ContentShape::Faq,
            Self::Reasons(_) => ContentShape::Reasons,
            Self::Contact(_) => ContentShape::Contact,
            Self::List(_) => ContentShape::List,
            Self::Text(_) => ContentShape::Text,
            Self::ImagePath(_) => ContentShape::ImagePath,
        }
    }

    #[must_use]
    pub const fn editor_kind(&self) -> EditorKind {
        self.shape().editor_kind()
    }

    /// The slider images, if this is a slider.
    #[must_use]
    pub fn into_slider(self) -> Option<Vec<SliderImage>> {
        match self {
            Self::Slider(items) => Some(items),
            _ => None,
        }
    }

    /// The FAQ entries, if this is a FAQ list.
    #[must_use]
    pub fn into_faq(self) -> Option<Vec<FaqItem>> {
        match self {
            Self::Faq(items) => Some(items),
            _ => None,
        }
    }

    /// The reasons sorted by `reason_id`, if this is a reasons list.
    #[must_use]
    pub fn into_reasons(self) -> Option<Vec<ReasonItem>> {
        match self {
            Self::Reasons(mut items) => {
                items.sort_by_key(|r| r.reason_id);
                Some(items)
            }
            _ => None,
        }
    }

    /// The contact details, if this is contact info.
    #[must_use]
    pub fn into_contact(self) -> Option<ContactInfo> {
        match self {
            Self::Contact(info) => Some(info),
            _ => None,
        }
    }

    /// Serialize back to the string stored in the setting.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Serialize`] if JSON encoding fails.
    pub fn to_value_string(&self) -> Result<String, ContentError> {
        Ok(match self {
            Self::Slider(items) => serde_json::to_string(items)?,
            Self::Faq(items) => serde_json::to_string(items)?,
            Self::Reasons(items) => serde_json::to_string(items)?,
            Self::Contact(info) => serde_json::to_string(&info.to_json())?,
            Self::List(s) | Self::Text(s) | Self::ImagePath(s) => s.clone(),
        })
    }
}

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decode every element, or nothing if any element does not fit `T`.
fn decode_all<T: serde::de::DeserializeOwned>(items: Vec<Value>) -> Option<Vec<T>> {
    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .ok()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn join_list(items: &[Value]) -> String {
    items.iter().map(value_text).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_slider() {
        let raw = r#"[{"image":"/uploads/hero-1.jpg","description":"Diesel range"},{"image":"/uploads/hero-2.jpg","description":"Gas range"}]"#;
        let content = SettingContent::classify(raw);
        let slides = content.clone().into_slider().unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].image, "/uploads/hero-2.jpg");
        assert_eq!(content.editor_kind(), EditorKind::Slider);
    }

    #[test]
    fn test_classify_faq() {
        let raw = r#"[{"question":"Do you offer maintenance?","answer":"Yes, 24/7."}]"#;
        let faq = SettingContent::classify(raw).into_faq().unwrap();
        assert_eq!(faq[0].answer, "Yes, 24/7.");
    }

    #[test]
    fn test_classify_reasons_sorted() {
        let raw = r#"[{"reason_id":2,"title":"Support","description":"d2"},{"reason_id":1,"title":"Quality","description":"d1"}]"#;
        let content = SettingContent::classify(raw);
        assert_eq!(content.shape(), ContentShape::Reasons);
        let reasons = content.into_reasons().unwrap();
        assert_eq!(reasons[0].title, "Quality");
    }

    #[test]
    fn test_classify_contact_keeps_order_and_extras() {
        let raw = r#"{"phone":"+971 4 123 4567","email":"info@voltagenerators.com","whatsapp":"+971 50 000 0000"}"#;
        let info = SettingContent::classify(raw).into_contact().unwrap();
        let keys: Vec<_> = info.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, ["phone", "email", "whatsapp"]);
        assert_eq!(info.get("whatsapp"), Some("+971 50 000 0000"));
    }

    #[test]
    fn test_object_without_email_is_text() {
        let raw = r#"{"phone":"123"}"#;
        assert_eq!(
            SettingContent::classify(raw),
            SettingContent::Text(raw.to_string())
        );
        let blank = r#"{"email":""}"#;
        assert_eq!(SettingContent::classify(blank).shape(), ContentShape::Text);
    }

    #[test]
    fn test_plain_array_is_joined_list() {
        assert_eq!(
            SettingContent::classify(r#"["UAE","Oman",3,true,null]"#),
            SettingContent::List("UAE, Oman, 3, true, ".to_string())
        );
    }

    #[test]
    fn test_empty_array_is_empty_list() {
        let content = SettingContent::classify("[]");
        assert_eq!(content, SettingContent::List(String::new()));
        assert_eq!(content.editor_kind(), EditorKind::Text);
    }

    #[test]
    fn test_scalars_are_text() {
        for raw in ["42", "true", "null", r#""quoted""#] {
            assert_eq!(
                SettingContent::classify(raw),
                SettingContent::Text(raw.to_string()),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_non_json_image_path_and_text() {
        assert_eq!(
            SettingContent::classify("/public/logo.svg").shape(),
            ContentShape::ImagePath
        );
        assert_eq!(
            SettingContent::classify("Powering the Gulf since 2009"),
            SettingContent::Text("Powering the Gulf since 2009".to_string())
        );
        assert_eq!(SettingContent::classify("").shape(), ContentShape::Text);
    }

    #[test]
    fn test_falsy_first_element_field_is_not_a_shape() {
        let raw = r#"[{"image":"","description":"no image yet"}]"#;
        assert_eq!(SettingContent::classify(raw).shape(), ContentShape::List);
        let zero = r#"[{"reason_id":0,"title":"t"}]"#;
        assert_eq!(SettingContent::classify(zero).shape(), ContentShape::List);
    }

    #[test]
    fn test_later_element_mismatch_degrades_to_text() {
        let raw = r#"[{"image":"/a.jpg","description":"A"},{"image":5}]"#;
        assert_eq!(
            SettingContent::classify(raw),
            SettingContent::Text(raw.to_string())
        );
        let reasons = r#"[{"reason_id":1,"title":"a"},{"reason_id":"two"}]"#;
        assert_eq!(SettingContent::classify(reasons).shape(), ContentShape::Text);
    }

    #[test]
    fn test_contact_serializes_in_order() {
        let raw = r#"{"email":"a@b.co","phone":"1","address":"Dubai"}"#;
        let mut content = SettingContent::classify(raw);
        if let SettingContent::Contact(info) = &mut content {
            assert!(info.set("phone", "2"));
            assert!(!info.set("fax", "3"));
        }
        assert_eq!(
            content.to_value_string().unwrap(),
            r#"{"email":"a@b.co","phone":"2","address":"Dubai"}"#
        );
    }

    #[test]
    fn test_contact_keeps_untouched_json_types() {
        let raw = r#"{"email":"a@b.co","social":{"fb":"x"},"phone":123,"fax":null}"#;
        let mut content = SettingContent::classify(raw);
        if let SettingContent::Contact(info) = &mut content {
            assert_eq!(info.get("social"), Some(r#"{"fb":"x"}"#));
            assert_eq!(info.get("fax"), Some(""));
            for (key, text) in [
                ("email", "a@b.co"),
                ("social", r#"{"fb":"x"}"#),
                ("phone", "123"),
                ("fax", ""),
            ] {
                assert!(info.set(key, text));
            }
        }
        assert_eq!(content.to_value_string().unwrap(), raw);
    }

    #[test]
    fn test_contact_edited_number_becomes_text() {
        let raw = r#"{"email":"a@b.co","phone":123,"fax":null}"#;
        let mut content = SettingContent::classify(raw);
        if let SettingContent::Contact(info) = &mut content {
            assert!(info.set("phone", "+971 4 555 0101"));
            assert!(info.set("fax", "0"));
        }
        assert_eq!(
            content.to_value_string().unwrap(),
            r#"{"email":"a@b.co","phone":"+971 4 555 0101","fax":"0"}"#
        );
    }

    #[test]
    fn test_text_serializes_verbatim() {
        let content = SettingContent::classify("hello");
        assert_eq!(content.to_value_string().unwrap(), "hello");
    }
}
