//! Permission values and access modules.
//!
//! The backend has shipped several historical encodings for a permission
//! (`allow`, `deny`, and the legacy scoped values `own`/`team`). Everything
//! that is not literally `allow` normalizes to [`PermissionValue::Deny`]:
//! the resolver is fail-closed and that must not change.

use crate::ids::ModuleId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Effective permission for a (user, module) pair. Two-valued; legacy and
/// unrecognized wire values collapse to `Deny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionValue {
    Allow,
    #[default]
    Deny,
}

impl PermissionValue {
    /// Normalize a raw wire value. `allow` (any casing/whitespace) is the
    /// only value that grants access; `own`, `team`, and anything else deny.
    pub fn normalize(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("allow") {
            Self::Allow
        } else {
            Self::Deny
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl fmt::Display for PermissionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PermissionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PermissionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::normalize(&raw))
    }
}

/// Per-user permission overrides, keyed by module.
pub type PermissionSet = BTreeMap<ModuleId, PermissionValue>;

/// Default permission per core role, used server-side to seed templates.
/// Missing fields deserialize as `Deny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefaults {
    #[serde(default)]
    pub admin: PermissionValue,
    #[serde(default)]
    pub manager: PermissionValue,
    #[serde(default)]
    pub assistant: PermissionValue,
}

/// A permission-gated feature area of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessModule {
    #[serde(alias = "moduleId")]
    pub id: ModuleId,
    pub name: String,
    #[serde(default)]
    pub defaults: RoleDefaults,
}
