//! The user entity.

use crate::ids::{CompanyId, UserId};
use crate::permissions::PermissionSet;
use crate::roles::RoleKey;
use crate::value_types::Email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user as returned by the backend.
///
/// `manager_id` is a weak back-reference for hierarchy lookup; it is never
/// guaranteed to resolve (the referenced user may have been deleted), and
/// cyclic data is tolerated by the chain traversal rather than rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: RoleKey,
    #[serde(default)]
    pub manager_id: Option<UserId>,
    /// Company the user belongs to. The backend has used both `company` and
    /// `companyName` for this field.
    #[serde(default, alias = "companyName")]
    pub company: Option<String>,
    /// Per-user permission overrides. `None` means no overrides were loaded;
    /// the merge resolver treats both `None` and a missing module as deny.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
    /// Companies assigned to manager-tier users (md_manager/ob_manager/sbm).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub assigned_company_ids: BTreeSet<CompanyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user's company matches `filter`, ignoring case and
    /// surrounding whitespace. Users without a company never match.
    pub fn company_matches(&self, filter: &str) -> bool {
        match &self.company {
            Some(company) => {
                company.trim().eq_ignore_ascii_case(filter.trim())
            }
            None => false,
        }
    }
}
