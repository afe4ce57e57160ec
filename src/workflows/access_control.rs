//! The access-control page: modules, roles, per-user overrides, templates.

use anyhow::anyhow;
use tracing::{info, instrument, warn};

use taskdeck_api::AccessBackend;
use taskdeck_core::{ActorContext, effective_permission};
use taskdeck_models::{
    AccessModule, ModuleId, PermissionSet, PermissionValue, Role, RoleKey, User,
    roles::{generate_role_key, is_valid_role_key},
};

use crate::utils::errors::AppError;

/// Callback for the interactive confirmation steps. Returning `false`
/// aborts the operation before any request is sent.
pub type Confirm<'a> = &'a mut dyn FnMut(&str) -> bool;

/// State for the access-control admin page.
///
/// Holds the snapshot loaded from the backend plus the per-operation
/// in-flight flag that serializes permission saves.
pub struct AccessControlPage<B> {
    backend: B,
    ctx: ActorContext,
    pub modules: Vec<AccessModule>,
    pub roles: Vec<Role>,
    /// Role whose defaults the template picker currently points at.
    pub selected_template: RoleKey,
    pub selected_user: Option<User>,
    /// Overrides of the selected user, last known good.
    pub overrides: PermissionSet,
    saving_permission: bool,
}

impl<B: AccessBackend> AccessControlPage<B> {
    pub fn new(backend: B, ctx: ActorContext) -> Self {
        Self {
            backend,
            ctx,
            modules: Vec::new(),
            roles: Vec::new(),
            selected_template: RoleKey::Assistant,
            selected_user: None,
            overrides: PermissionSet::new(),
            saving_permission: false,
        }
    }

    pub fn ctx(&self) -> &ActorContext {
        &self.ctx
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the page snapshot: modules and roles.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), AppError> {
        self.modules = self.backend.list_modules().await.map_err(AppError::api)?;
        self.roles = self.backend.list_roles().await.map_err(AppError::api)?;
        Ok(())
    }

    /// Select a user and fetch their override set.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn select_user(&mut self, user: User) -> Result<(), AppError> {
        self.overrides = self
            .backend
            .user_permissions(&user.id)
            .await
            .map_err(AppError::api)?;
        self.selected_user = Some(user);
        Ok(())
    }

    /// Effective permission of the selected user for a module. Fail-closed.
    pub fn effective(&self, module: &ModuleId) -> PermissionValue {
        effective_permission(Some(&self.overrides), module)
    }

    /// Set one override on the selected user.
    ///
    /// Changing one's own permissions requires confirmation. On backend
    /// failure the override set reloads to last known good.
    #[instrument(skip(self, confirm))]
    pub async fn set_permission(
        &mut self,
        module: &ModuleId,
        value: PermissionValue,
        confirm: Confirm<'_>,
    ) -> Result<(), AppError> {
        if self.saving_permission {
            return Err(AppError::validation(anyhow!("a permission save is already in flight")));
        }
        let user = self
            .selected_user
            .clone()
            .ok_or_else(|| AppError::validation(anyhow!("no user selected")))?;
        if !self.modules.iter().any(|m| &m.id == module) {
            return Err(AppError::not_found(anyhow!("unknown module: {}", module)));
        }
        if self.ctx.is_self(&user.id)
            && !confirm(&format!(
                "You are changing your own access to '{}'. Continue?",
                module
            ))
        {
            info!(module = %module, "self permission change cancelled");
            return Ok(());
        }

        self.saving_permission = true;
        let result = self
            .backend
            .set_user_permission(&user.id, module, value)
            .await;
        self.saving_permission = false;

        match result {
            Ok(()) => {
                self.overrides.insert(module.clone(), value);
                Ok(())
            }
            Err(err) => {
                warn!(module = %module, error = %err, "permission save failed, reloading");
                self.reload_overrides(&user).await;
                Err(AppError::api(err))
            }
        }
    }

    /// Copy a role's default permission set onto the selected user.
    ///
    /// `overwrite` replaces every existing override; otherwise only modules
    /// without one are populated. Overwriting, and any self-application,
    /// require confirmation.
    #[instrument(skip(self, confirm))]
    pub async fn apply_template(
        &mut self,
        template_role: &RoleKey,
        overwrite: bool,
        confirm: Confirm<'_>,
    ) -> Result<(), AppError> {
        let user = self
            .selected_user
            .clone()
            .ok_or_else(|| AppError::validation(anyhow!("no user selected")))?;
        if !self.roles.iter().any(|r| &r.key == template_role) {
            return Err(AppError::not_found(anyhow!(
                "unknown template role: {}",
                template_role
            )));
        }

        if self.ctx.is_self(&user.id) {
            if !confirm(&format!(
                "Applying the '{}' template to your own account may revoke your access. Continue?",
                template_role
            )) {
                info!("self template application cancelled");
                return Ok(());
            }
        } else if overwrite
            && !confirm(&format!(
                "Overwrite all of {}'s permissions with the '{}' template?",
                user.name, template_role
            ))
        {
            info!("template overwrite cancelled");
            return Ok(());
        }

        match self
            .backend
            .apply_template(&user.id, template_role, overwrite)
            .await
        {
            Ok(()) => {
                // Backend merge is authoritative; re-fetch instead of merging locally.
                self.reload_overrides(&user).await;
                Ok(())
            }
            Err(err) => {
                self.reload_overrides(&user).await;
                Err(AppError::api(err))
            }
        }
    }

    pub fn select_template(&mut self, role: RoleKey) {
        self.selected_template = role;
    }

    /// Create a dynamic role. The key is derived from the name when not
    /// given explicitly.
    #[instrument(skip(self))]
    pub async fn create_role(
        &mut self,
        name: &str,
        key: Option<&str>,
    ) -> Result<Role, AppError> {
        self.require_role_admin()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation(anyhow!("role name is required")));
        }

        let key = match key {
            Some(key) => key.to_string(),
            None => generate_role_key(name),
        };
        if !is_valid_role_key(&key) {
            return Err(AppError::validation(anyhow!(
                "role key must match [a-z0-9_-]+, got '{}'",
                key
            )));
        }
        let key = RoleKey::from(key.as_str());
        if key.is_core() {
            return Err(AppError::validation(anyhow!(
                "'{}' is a core role and cannot be created",
                key
            )));
        }
        if self.roles.iter().any(|r| r.key == key) {
            return Err(AppError::validation(anyhow!("role '{}' already exists", key)));
        }

        let created = self
            .backend
            .create_role(&Role::new(key, name))
            .await
            .map_err(AppError::api)?;
        self.roles.push(created.clone());
        Ok(created)
    }

    /// Rename a dynamic role. Keys are immutable; core roles are refused
    /// regardless of actor permissions.
    #[instrument(skip(self))]
    pub async fn rename_role(&mut self, key: &RoleKey, name: &str) -> Result<Role, AppError> {
        self.require_role_admin()?;
        if key.is_core() {
            return Err(AppError::validation(anyhow!(
                "'{}' is a core role and cannot be edited",
                key
            )));
        }
        if !self.roles.iter().any(|r| &r.key == key) {
            return Err(AppError::not_found(anyhow!("unknown role: {}", key)));
        }

        let updated = self
            .backend
            .update_role(key, name.trim())
            .await
            .map_err(AppError::api)?;
        if let Some(role) = self.roles.iter_mut().find(|r| &r.key == key) {
            *role = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a dynamic role. Deleting the currently selected template role
    /// resets the selection to `assistant`.
    #[instrument(skip(self))]
    pub async fn delete_role(&mut self, key: &RoleKey) -> Result<(), AppError> {
        self.require_role_admin()?;
        if key.is_core() {
            return Err(AppError::validation(anyhow!(
                "'{}' is a core role and cannot be deleted",
                key
            )));
        }
        if !self.roles.iter().any(|r| &r.key == key) {
            return Err(AppError::not_found(anyhow!("unknown role: {}", key)));
        }

        self.backend.delete_role(key).await.map_err(AppError::api)?;
        self.roles.retain(|r| &r.key != key);
        if &self.selected_template == key {
            self.selected_template = RoleKey::Assistant;
        }
        Ok(())
    }

    /// Create or update a module and its per-role defaults.
    #[instrument(skip(self, module), fields(module_id = %module.id))]
    pub async fn save_module(
        &mut self,
        module: AccessModule,
        is_new: bool,
    ) -> Result<AccessModule, AppError> {
        self.require_role_admin()?;
        if module.name.trim().is_empty() {
            return Err(AppError::validation(anyhow!("module name is required")));
        }
        let exists = self.modules.iter().any(|m| m.id == module.id);
        if is_new && exists {
            return Err(AppError::validation(anyhow!(
                "module '{}' already exists",
                module.id
            )));
        }
        if !is_new && !exists {
            return Err(AppError::not_found(anyhow!("unknown module: {}", module.id)));
        }

        let result = if is_new {
            self.backend.create_module(&module).await
        } else {
            self.backend.update_module(&module).await
        };
        match result {
            Ok(saved) => {
                if is_new {
                    self.modules.push(saved.clone());
                } else if let Some(m) = self.modules.iter_mut().find(|m| m.id == saved.id) {
                    *m = saved.clone();
                }
                Ok(saved)
            }
            Err(err) => {
                // Revert to server state rather than trusting the local copy.
                if let Ok(modules) = self.backend.list_modules().await {
                    self.modules = modules;
                }
                Err(AppError::api(err))
            }
        }
    }

    /// Authorization errors are detected client-side and never sent to the
    /// backend.
    fn require_role_admin(&self) -> Result<(), AppError> {
        if self.ctx.is_admin_tier() {
            Ok(())
        } else {
            Err(AppError::authorization(anyhow!(
                "role '{}' may not administer roles and modules",
                self.ctx.role()
            )))
        }
    }

    async fn reload_overrides(&mut self, user: &User) {
        match self.backend.user_permissions(&user.id).await {
            Ok(overrides) => self.overrides = overrides,
            Err(err) => warn!(user_id = %user.id, error = %err, "override reload failed"),
        }
    }
}
