//! The role hierarchy model: who may create which roles, and how the
//! reporting chain is traversed.

use std::collections::HashSet;
use taskdeck_models::{Role, RoleKey, User};

/// Upper bound on reporting-chain length. Bounds pathological or cyclic
/// manager data without raising an error.
pub const MAX_CHAIN_DEPTH: usize = 20;

/// The roles a requester may assign when creating or re-roling users.
///
/// `super_admin` and `admin` assign from the full dynamic role list minus
/// themselves-and-above, so the current role list must be supplied; the
/// manager tiers have fixed target sets.
pub fn assignable_roles(requester: &RoleKey, all_roles: &[Role]) -> Vec<RoleKey> {
    match requester {
        RoleKey::SuperAdmin => all_roles
            .iter()
            .map(|r| r.key.clone())
            .filter(|k| *k != RoleKey::SuperAdmin)
            .collect(),
        RoleKey::Admin => all_roles
            .iter()
            .map(|r| r.key.clone())
            .filter(|k| *k != RoleKey::SuperAdmin && *k != RoleKey::Admin)
            .collect(),
        RoleKey::MdManager => vec![RoleKey::Manager, RoleKey::Assistant],
        RoleKey::ObManager => vec![RoleKey::Assistant],
        RoleKey::Manager => vec![RoleKey::Assistant],
        RoleKey::Sbm => vec![RoleKey::Rm],
        RoleKey::Rm => vec![RoleKey::Am],
        _ => Vec::new(),
    }
}

/// Whether `requester` may assign `target` to a user.
pub fn may_assign_role(requester: &RoleKey, target: &RoleKey) -> bool {
    match requester {
        RoleKey::SuperAdmin => *target != RoleKey::SuperAdmin,
        RoleKey::Admin => *target != RoleKey::SuperAdmin && *target != RoleKey::Admin,
        RoleKey::MdManager => matches!(target, RoleKey::Manager | RoleKey::Assistant),
        RoleKey::ObManager => matches!(target, RoleKey::Assistant),
        RoleKey::Manager => matches!(target, RoleKey::Assistant),
        RoleKey::Sbm => matches!(target, RoleKey::Rm),
        RoleKey::Rm => matches!(target, RoleKey::Am),
        _ => false,
    }
}

/// Follow `manager_id` links upward from `user`, collecting ancestors.
///
/// Traversal stops when there is no further manager, when a user repeats
/// (cycle), or at [`MAX_CHAIN_DEPTH`]. The chain is returned root-first, the
/// order it is displayed in.
pub fn reporting_chain<'a>(user: &User, users: &'a [User]) -> Vec<&'a User> {
    let mut chain: Vec<&'a User> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(user.id.as_str());

    let mut current_manager = user.manager_id.as_ref();
    while let Some(manager_id) = current_manager {
        if chain.len() >= MAX_CHAIN_DEPTH || !seen.insert(manager_id.as_str()) {
            break;
        }
        let Some(manager) = users.iter().find(|u| &u.id == manager_id) else {
            break;
        };
        chain.push(manager);
        current_manager = manager.manager_id.as_ref();
    }

    chain.reverse();
    chain
}
