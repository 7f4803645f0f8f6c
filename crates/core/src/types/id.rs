//! Newtype IDs for type-safe entity references.
//!
//! The CMS hands out string IDs for sections, settings and users, except the
//! login endpoint which returns the user ID as a number. Every ID type
//! therefore accepts either form on input and always serializes as a string.

use serde::{Deserialize, Deserializer};

/// Raw wire form of an ID.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Deserialize an ID from either a JSON string or a JSON number.
///
/// # Errors
///
/// Returns an error if the value is neither a string nor an integer.
pub fn deserialize_flexible<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string, `Deserialize` from a string or a number
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use volta_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new("1");
/// let gadget = GadgetId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget;
/// # let _ = (widget, gadget);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_flexible(deserializer).map(Self)
            }
        }

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(SectionId);
define_id!(SettingId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string() {
        let id: UserId = serde_json::from_str(r#""a1b2""#).unwrap();
        assert_eq!(id.as_str(), "a1b2");
    }

    #[test]
    fn test_id_from_number() {
        let id: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(id, UserId::new("42"));
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = SettingId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""7""#);
    }

    #[test]
    fn test_id_rejects_bool() {
        assert!(serde_json::from_str::<SectionId>("true").is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(SectionId::from("footer-id").to_string(), "footer-id");
    }
}
