//! The acting user, passed explicitly into every resolver.

use taskdeck_models::{ModuleId, PermissionValue, RoleKey, User};

use crate::permissions::effective_permission;

/// Everything the resolvers need to know about the current actor.
///
/// This replaces ambient "current user" state: workflows construct one
/// context per session and thread it through, which keeps the resolvers pure.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub actor: User,
}

impl ActorContext {
    pub fn new(actor: User) -> Self {
        Self { actor }
    }

    pub fn role(&self) -> &RoleKey {
        &self.actor.role
    }

    /// Admin-tier actors see all users and bypass the task-type allow-list.
    pub fn is_admin_tier(&self) -> bool {
        self.actor.role.is_admin_tier()
    }

    /// Effective permission of the actor for a module, from the actor's own
    /// override set. Fail-closed: no override means deny.
    pub fn module_permission(&self, module: &ModuleId) -> PermissionValue {
        effective_permission(self.actor.permissions.as_ref(), module)
    }

    /// Whether an operation targets the actor's own account. Self-affecting
    /// destructive actions require interactive confirmation.
    pub fn is_self(&self, user_id: &taskdeck_models::UserId) -> bool {
        &self.actor.id == user_id
    }
}
