//! The permission merge resolver.
//!
//! Client-side, a user's access to a module is decided by the per-user
//! override map alone: an explicit override wins, and absence of one is a
//! deny. Role defaults exist only to seed templates server-side; falling
//! back to them here would silently widen access, so we never do.

use taskdeck_models::{ModuleId, PermissionSet, PermissionValue};

/// Effective permission for a module given the user's override map.
///
/// Fail-closed: `None` overrides, or a map without the module, both deny.
pub fn effective_permission(
    overrides: Option<&PermissionSet>,
    module: &ModuleId,
) -> PermissionValue {
    overrides
        .and_then(|map| map.get(module).copied())
        .unwrap_or(PermissionValue::Deny)
}

/// What a template application produces, computed locally.
///
/// With `overwrite` the template replaces the whole override set; without it
/// only modules lacking an existing override are populated. The backend
/// performs the authoritative merge; this mirror exists for previews and
/// tests.
pub fn merge_template(
    existing: &PermissionSet,
    template: &PermissionSet,
    overwrite: bool,
) -> PermissionSet {
    if overwrite {
        return template.clone();
    }
    let mut merged = template.clone();
    for (module, value) in existing {
        merged.insert(module.clone(), *value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, PermissionValue)]) -> PermissionSet {
        pairs
            .iter()
            .map(|(id, v)| (ModuleId::new(*id), *v))
            .collect()
    }

    #[test]
    fn absence_denies() {
        let overrides = set(&[("tasks", PermissionValue::Allow)]);
        assert_eq!(
            effective_permission(Some(&overrides), &ModuleId::new("billing")),
            PermissionValue::Deny
        );
        assert_eq!(
            effective_permission(None, &ModuleId::new("tasks")),
            PermissionValue::Deny
        );
    }

    #[test]
    fn override_wins() {
        let overrides = set(&[
            ("tasks", PermissionValue::Allow),
            ("billing", PermissionValue::Deny),
        ]);
        assert_eq!(
            effective_permission(Some(&overrides), &ModuleId::new("tasks")),
            PermissionValue::Allow
        );
        assert_eq!(
            effective_permission(Some(&overrides), &ModuleId::new("billing")),
            PermissionValue::Deny
        );
    }

    #[test]
    fn merge_without_overwrite_keeps_existing() {
        let existing = set(&[("tasks", PermissionValue::Deny)]);
        let template = set(&[
            ("tasks", PermissionValue::Allow),
            ("billing", PermissionValue::Allow),
        ]);
        let merged = merge_template(&existing, &template, false);
        assert_eq!(merged[&ModuleId::new("tasks")], PermissionValue::Deny);
        assert_eq!(merged[&ModuleId::new("billing")], PermissionValue::Allow);
    }

    #[test]
    fn merge_with_overwrite_replaces() {
        let existing = set(&[("tasks", PermissionValue::Deny)]);
        let template = set(&[("billing", PermissionValue::Allow)]);
        let merged = merge_template(&existing, &template, true);
        assert_eq!(merged, template);
    }
}
