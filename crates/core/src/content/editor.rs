//! Editor state for structured settings.
//!
//! The dashboard edits a setting through a plain HTML form. List items are
//! posted as `"{field}.{index}"` pairs (`image.0`, `description.0`, ...),
//! contact fields as `"contact.{key}"`, the text editor as `value`, and the
//! button pressed as `action` (`add`, `remove.{index}` or `save`). Adding or
//! removing re-renders the editor with the new state. Only `save` writes the
//! value back to the CMS.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use super::{
    ContactInfo, ContentError, EditorKind, FaqItem, ReasonItem, ReasonList, SettingContent,
    SliderImage,
};

/// Number of list items a form may post (indices `0..MAX_ITEMS`).
pub const MAX_ITEMS: usize = 200;

/// Prefix of contact field names.
pub const CONTACT_PREFIX: &str = "contact.";

/// Button pressed in the editor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorAction {
    Add,
    Remove(usize),
    #[default]
    Save,
}

impl FromStr for EditorAction {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "save" => Ok(Self::Save),
            other => other
                .strip_prefix("remove.")
                .and_then(|index| index.parse().ok())
                .map(Self::Remove)
                .ok_or_else(|| ContentError::UnknownAction(other.to_owned())),
        }
    }
}

/// A submitted editor form: the action plus every other field.
#[derive(Debug, Clone, Default)]
pub struct EditorForm {
    pub action: EditorAction,
    pub fields: Vec<(String, String)>,
}

impl EditorForm {
    /// Split raw form pairs into the action and the remaining fields.
    /// A form without an `action` field is a save.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::UnknownAction`] for an unrecognised action.
    pub fn parse(pairs: Vec<(String, String)>) -> Result<Self, ContentError> {
        let mut action = EditorAction::default();
        let mut fields = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            if name == "action" {
                action = value.parse()?;
            } else {
                fields.push((name, value));
            }
        }
        Ok(Self { action, fields })
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Group `"{field}.{index}"` pairs into rows keyed by posted index.
    /// Indices need not be contiguous; missing ones produce no row.
    fn rows(&self) -> Result<BTreeMap<usize, HashMap<&str, &str>>, ContentError> {
        let mut rows: BTreeMap<usize, HashMap<&str, &str>> = BTreeMap::new();
        for (name, value) in &self.fields {
            let Some((field, index)) = name.rsplit_once('.') else {
                continue;
            };
            let Ok(index) = index.parse::<usize>() else {
                continue;
            };
            if index >= MAX_ITEMS {
                return Err(ContentError::TooManyItems(index));
            }
            rows.entry(index).or_default().insert(field, value.as_str());
        }
        Ok(rows)
    }

    /// Rows in index order with the action's removal applied.
    fn rows_after_action(&self) -> Result<Vec<HashMap<&str, &str>>, ContentError> {
        let mut rows = self.rows()?;
        if let EditorAction::Remove(index) = self.action {
            rows.remove(&index).ok_or(ContentError::NoSuchItem(index))?;
        }
        Ok(rows.into_values().collect())
    }
}

fn text(row: &HashMap<&str, &str>, field: &str) -> String {
    row.get(field).map(|v| (*v).to_owned()).unwrap_or_default()
}

/// Current contents of a setting editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Slider(Vec<SliderImage>),
    Faq(Vec<FaqItem>),
    Reasons(ReasonList),
    Contact(ContactInfo),
    Text(String),
}

impl EditorState {
    /// Initial editor state for a stored value.
    #[must_use]
    pub fn load(raw: &str) -> Self {
        match SettingContent::classify(raw) {
            SettingContent::Slider(items) => Self::Slider(items),
            SettingContent::Faq(items) => Self::Faq(items),
            SettingContent::Reasons(items) => Self::Reasons(ReasonList::new(items)),
            SettingContent::Contact(info) => Self::Contact(info),
            SettingContent::List(_) | SettingContent::Text(_) | SettingContent::ImagePath(_) => {
                Self::Text(raw.to_owned())
            }
        }
    }

    /// Rebuild the editor from a submitted form and apply its action.
    ///
    /// `original` is the value currently stored in the CMS. It decides which
    /// editor is in use, and for contact info which fields exist.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NoSuchItem`] when removing a row that was not
    /// posted.
    pub fn submit(original: &str, form: &EditorForm) -> Result<Self, ContentError> {
        let mut state = match Self::load(original) {
            Self::Slider(_) => Self::Slider(
                form.rows_after_action()?
                    .iter()
                    .map(|row| SliderImage {
                        image: text(row, "image"),
                        description: text(row, "description"),
                    })
                    .collect(),
            ),
            Self::Faq(_) => Self::Faq(
                form.rows_after_action()?
                    .iter()
                    .map(|row| FaqItem {
                        question: text(row, "question"),
                        answer: text(row, "answer"),
                    })
                    .collect(),
            ),
            Self::Reasons(_) => {
                let rows = form.rows_after_action()?;
                let requested: Vec<Option<u32>> = rows
                    .iter()
                    .map(|row| row.get("reason_id").and_then(|v| v.trim().parse().ok()))
                    .collect();
                let items = rows
                    .iter()
                    .zip(1..)
                    .map(|(row, position)| ReasonItem {
                        reason_id: position,
                        title: text(row, "title"),
                        description: text(row, "description"),
                    })
                    .collect();
                let mut list = ReasonList::new(items);
                list.apply_requested_orders(&requested);
                Self::Reasons(list)
            }
            Self::Contact(mut info) => {
                for (name, value) in &form.fields {
                    if let Some(key) = name.strip_prefix(CONTACT_PREFIX) {
                        info.set(key, value.as_str());
                    }
                }
                Self::Contact(info)
            }
            Self::Text(current) => Self::Text(
                form.value("value")
                    .map_or(current, ToOwned::to_owned),
            ),
        };

        if form.action == EditorAction::Add {
            state.add();
        }
        Ok(state)
    }

    /// Append a blank item. No-op for contact info and text.
    pub fn add(&mut self) {
        match self {
            Self::Slider(items) => {
                let n = items.len() + 1;
                items.push(SliderImage {
                    image: String::new(),
                    description: format!("Slide {n}"),
                });
            }
            Self::Faq(items) => items.push(FaqItem::default()),
            Self::Reasons(list) => list.add(),
            Self::Contact(_) | Self::Text(_) => {}
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EditorKind {
        match self {
            Self::Slider(_) => EditorKind::Slider,
            Self::Faq(_) => EditorKind::Faq,
            Self::Reasons(_) => EditorKind::Reasons,
            Self::Contact(_) => EditorKind::Contact,
            Self::Text(_) => EditorKind::Text,
        }
    }

    /// Serialize to the string stored in the setting.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Serialize`] if JSON encoding fails.
    pub fn to_value_string(&self) -> Result<String, ContentError> {
        match self {
            Self::Slider(items) => SettingContent::Slider(items.clone()).to_value_string(),
            Self::Faq(items) => SettingContent::Faq(items.clone()).to_value_string(),
            Self::Reasons(list) => {
                SettingContent::Reasons(list.items().to_vec()).to_value_string()
            }
            Self::Contact(info) => SettingContent::Contact(info.clone()).to_value_string(),
            Self::Text(value) => Ok(value.clone()),
        }
    }
}
