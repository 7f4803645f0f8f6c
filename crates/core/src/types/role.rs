//! User roles.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role attached to a site user.
///
/// Role is the only authorization attribute: `admin` unlocks the dashboard.
/// Role strings the site does not know about are kept verbatim so that a
/// round-trip through the `user_data` cookie does not lose them, and they
/// never grant admin access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
    Manager,
    Other(String),
}

impl Role {
    /// Roles an admin can assign from the dashboard.
    pub const ASSIGNABLE: [Self; 3] = [Self::User, Self::Admin, Self::Manager];

    /// Whether this role grants access to the dashboard.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "user" => Self::User,
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}
