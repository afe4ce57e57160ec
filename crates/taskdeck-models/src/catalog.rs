//! Companies, brands, task types, and brand assignments.

use crate::ids::{BrandId, TaskTypeId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A company. Companies are keyed by name throughout the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    /// Per-company task-type allow-list. Empty means "no restriction data";
    /// the assignment page decides what that implies (see core::assignment).
    #[serde(default, alias = "companyAllowedTaskTypeIds")]
    pub allowed_task_type_ids: BTreeSet<TaskTypeId>,
}

/// A brand, optionally scoped to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    #[serde(default, alias = "companyName")]
    pub company: Option<String>,
}

/// A task type, optionally scoped to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskType {
    pub id: TaskTypeId,
    pub name: String,
    #[serde(default, alias = "companyName")]
    pub company: Option<String>,
}

/// An association of (company, user, brand) to a set of allowed task types.
///
/// Invariant: an assignment with an empty `task_type_ids` set means "brand
/// not assigned". The store never keeps such rows; upserting one is how a
/// brand assignment is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandAssignment {
    pub company_name: String,
    pub user_id: UserId,
    pub brand_id: BrandId,
    pub brand_name: String,
    #[serde(default)]
    pub task_type_ids: BTreeSet<TaskTypeId>,
}
