//! The visibility resolver: which users an actor may see and manage.
//!
//! The per-role rules are deliberately not a uniform tree-descendant walk.
//! `md_manager` sees every assistant company-wide (not only those under its
//! own managers) and `ob_manager` sees its `md_manager` peers; both grants
//! are documented product behavior and preserved exactly.

use std::collections::HashSet;
use taskdeck_models::{RoleKey, User};

use crate::company::CompanyProfile;
use crate::context::ActorContext;

/// Users visible to the actor, before any company or role filter is applied.
pub fn visible_users<'a>(ctx: &ActorContext, all_users: &'a [User]) -> Vec<&'a User> {
    let actor = &ctx.actor;
    match &actor.role {
        RoleKey::SuperAdmin | RoleKey::Admin => all_users.iter().collect(),

        RoleKey::MdManager => all_users
            .iter()
            .filter(|u| {
                u.id == actor.id
                    || (u.role == RoleKey::Manager && u.manager_id.as_ref() == Some(&actor.id))
                    || u.role == RoleKey::Assistant
                    || u.role == RoleKey::ObManager
            })
            .collect(),

        RoleKey::ObManager => all_users
            .iter()
            .filter(|u| {
                u.id == actor.id
                    || matches!(
                        u.role,
                        RoleKey::Assistant
                            | RoleKey::Manager
                            | RoleKey::MdManager
                            | RoleKey::ObManager
                    )
            })
            .collect(),

        RoleKey::Manager => all_users
            .iter()
            .filter(|u| {
                u.id == actor.id || matches!(u.role, RoleKey::Assistant | RoleKey::Manager)
            })
            .collect(),

        RoleKey::Sbm => {
            // Two-level descendant closure: own RMs, then their AMs.
            let rm_ids: HashSet<&str> = all_users
                .iter()
                .filter(|u| u.role == RoleKey::Rm && u.manager_id.as_ref() == Some(&actor.id))
                .map(|u| u.id.as_str())
                .collect();
            all_users
                .iter()
                .filter(|u| {
                    u.id == actor.id
                        || rm_ids.contains(u.id.as_str())
                        || (u.role == RoleKey::Am
                            && u.manager_id
                                .as_ref()
                                .is_some_and(|m| rm_ids.contains(m.as_str())))
                })
                .collect()
        }

        RoleKey::Rm => all_users
            .iter()
            .filter(|u| {
                u.id == actor.id
                    || Some(&u.id) == actor.manager_id.as_ref()
                    || (u.role == RoleKey::Am && u.manager_id.as_ref() == Some(&actor.id))
            })
            .collect(),

        RoleKey::Am => {
            let rm = actor
                .manager_id
                .as_ref()
                .and_then(|id| all_users.iter().find(|u| &u.id == id));
            let sbm = rm
                .and_then(|rm| rm.manager_id.as_ref())
                .and_then(|id| all_users.iter().find(|u| &u.id == id));
            all_users
                .iter()
                .filter(|u| {
                    u.id == actor.id
                        || rm.is_some_and(|r| r.id == u.id)
                        || sbm.is_some_and(|s| s.id == u.id)
                })
                .collect()
        }

        _ => Vec::new(),
    }
}

/// Second-stage filter: restrict to a company, normalizing case/whitespace.
pub fn filter_by_company<'a>(users: Vec<&'a User>, company: &str) -> Vec<&'a User> {
    users
        .into_iter()
        .filter(|u| u.company_matches(company))
        .collect()
}

/// Third-stage filter: apply the company profile's role restriction, if any.
pub fn filter_by_company_profile<'a>(users: Vec<&'a User>, company: &str) -> Vec<&'a User> {
    match CompanyProfile::detect(company).role_filter() {
        Some(roles) => users
            .into_iter()
            .filter(|u| roles.contains(&u.role))
            .collect(),
        None => users,
    }
}

/// The full pipeline used by the assignment page: visibility, then company
/// scoping, then the company profile's role restriction.
pub fn visible_users_for_company<'a>(
    ctx: &ActorContext,
    all_users: &'a [User],
    company: &str,
) -> Vec<&'a User> {
    let visible = visible_users(ctx, all_users);
    let scoped = filter_by_company(visible, company);
    filter_by_company_profile(scoped, company)
}
