//! Role keys and role records.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Role keys the hierarchy and visibility rules know about, plus a catch-all
/// for administratively defined roles.
///
/// Keys are lowercase slugs on the wire (`md_manager`, `sbm`, ...). Unknown
/// keys are preserved verbatim as [`RoleKey::Custom`] so a dynamic role never
/// fails parsing, but they carry no visibility or assignment rights.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleKey {
    SuperAdmin,
    Admin,
    MdManager,
    ObManager,
    Manager,
    Assistant,
    Sbm,
    Rm,
    Am,
    Custom(String),
}

impl RoleKey {
    /// The wire/slug form of the key.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::MdManager => "md_manager",
            Self::ObManager => "ob_manager",
            Self::Manager => "manager",
            Self::Assistant => "assistant",
            Self::Sbm => "sbm",
            Self::Rm => "rm",
            Self::Am => "am",
            Self::Custom(key) => key,
        }
    }

    /// Core roles cannot be created, edited, or deleted through the admin UI.
    pub fn is_core(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::Assistant)
    }

    /// Admin-tier roles (full visibility, allow-list bypass).
    pub fn is_admin_tier(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Manager-tier roles that can have companies assigned to them.
    pub fn is_company_assignable(&self) -> bool {
        matches!(self, Self::MdManager | Self::ObManager | Self::Sbm)
    }
}

impl From<&str> for RoleKey {
    fn from(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "super_admin" => Self::SuperAdmin,
            "admin" => Self::Admin,
            "md_manager" => Self::MdManager,
            "ob_manager" => Self::ObManager,
            "manager" => Self::Manager,
            "assistant" => Self::Assistant,
            "sbm" => Self::Sbm,
            "rm" => Self::Rm,
            "am" => Self::Am,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl FromStr for RoleKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RoleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// A role as administered through the access-control page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub key: RoleKey,
    /// Display name; mutable for non-core roles.
    pub name: String,
}

impl Role {
    pub fn new(key: RoleKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }
}

/// Check a role key against the allowed slug alphabet `[a-z0-9_-]+`.
pub fn is_valid_role_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Generate a role key slug from a display name.
/// Converts to lowercase, replaces spaces and hyphens with underscores,
/// removes invalid characters, and collapses consecutive underscores.
pub fn generate_role_key(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c == ' ' || c == '-' {
                '_'
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut result = String::new();
    let mut prev_underscore = false;
    for c in slug.chars() {
        if c == '_' {
            if !prev_underscore && !result.is_empty() {
                result.push(c);
            }
            prev_underscore = true;
        } else {
            result.push(c);
            prev_underscore = false;
        }
    }

    result.trim_end_matches('_').to_string()
}
