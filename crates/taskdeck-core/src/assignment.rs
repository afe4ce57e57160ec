//! The assignment resolver: brand/task-type diffs and the per-company
//! task-type constraints.

use std::collections::BTreeSet;
use std::fmt;
use taskdeck_models::{BrandId, TaskType, TaskTypeId};

use crate::company::{BULK_FALLBACK_TASK_TYPE_NAMES, is_task_type_bypass};
use crate::context::ActorContext;

/// The upserts and removals needed to move a user's brand assignments from
/// the loaded snapshot to the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignmentDiff {
    /// Every currently selected brand, upserted with the full current
    /// task-type selection whether or not it changed. Idempotent.
    pub to_upsert: Vec<BrandId>,
    /// Brands assigned before but now unchecked. Upserted with an empty
    /// task-type list, which the store interprets as deletion.
    pub to_remove: Vec<BrandId>,
}

impl AssignmentDiff {
    pub fn is_empty(&self) -> bool {
        self.to_upsert.is_empty() && self.to_remove.is_empty()
    }
}

/// Rejections raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// Nothing selected and nothing to remove.
    NothingToApply,
    /// Brands are selected but no task type is.
    NoTaskTypesSelected,
}

impl std::error::Error for AssignmentError {}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingToApply => write!(f, "Nothing to apply: select at least one brand"),
            Self::NoTaskTypesSelected => {
                write!(f, "Select at least one task type for the chosen brands")
            }
        }
    }
}

/// Compute the upsert/remove sets for an apply operation.
pub fn compute_assignment_diff(
    selected_brand_ids: &BTreeSet<BrandId>,
    initial_assigned_brand_ids: &BTreeSet<BrandId>,
) -> AssignmentDiff {
    AssignmentDiff {
        to_upsert: selected_brand_ids.iter().cloned().collect(),
        to_remove: initial_assigned_brand_ids
            .difference(selected_brand_ids)
            .cloned()
            .collect(),
    }
}

/// Validate an apply operation before anything is sent.
pub fn validate_apply(
    diff: &AssignmentDiff,
    pending_task_type_ids: &BTreeSet<TaskTypeId>,
) -> Result<(), AssignmentError> {
    if diff.is_empty() {
        return Err(AssignmentError::NothingToApply);
    }
    if !diff.to_upsert.is_empty() && pending_task_type_ids.is_empty() {
        return Err(AssignmentError::NoTaskTypesSelected);
    }
    Ok(())
}

/// Whether the actor/company combination bypasses the task-type allow-list.
/// Admin-tier actors and the `speedecom` company see the full catalog.
pub fn bypasses_allow_list(ctx: &ActorContext, company_name: &str) -> bool {
    ctx.is_admin_tier() || is_task_type_bypass(company_name)
}

/// Restrict the task-type catalog to the company allow-list, unless bypassed.
pub fn filter_task_type_catalog<'a>(
    ctx: &ActorContext,
    company_name: &str,
    catalog: &'a [TaskType],
    allow_list: &BTreeSet<TaskTypeId>,
) -> Vec<&'a TaskType> {
    if bypasses_allow_list(ctx, company_name) {
        return catalog.iter().collect();
    }
    catalog
        .iter()
        .filter(|t| allow_list.contains(&t.id))
        .collect()
}

/// Drop pending task-type selections no longer covered by the allow-list,
/// e.g. after a company switch. Bypassed actors/companies keep everything.
/// Dropped silently by design.
pub fn retain_allowed_selection(
    ctx: &ActorContext,
    company_name: &str,
    pending: &mut BTreeSet<TaskTypeId>,
    allow_list: &BTreeSet<TaskTypeId>,
) {
    if bypasses_allow_list(ctx, company_name) {
        return;
    }
    pending.retain(|id| allow_list.contains(id));
}

/// Task types auto-assigned by the bulk brand-creation flow: the company's
/// configured allow-list when it has one, otherwise the three fixed types
/// resolved by name against the catalog.
pub fn resolve_bulk_task_types(
    allow_list: &BTreeSet<TaskTypeId>,
    catalog: &[TaskType],
) -> BTreeSet<TaskTypeId> {
    if !allow_list.is_empty() {
        return allow_list.clone();
    }
    catalog
        .iter()
        .filter(|t| {
            BULK_FALLBACK_TASK_TYPE_NAMES
                .iter()
                .any(|name| t.name.trim().eq_ignore_ascii_case(name))
        })
        .map(|t| t.id.clone())
        .collect()
}
