//! `taskdeck access` subcommands.

use anyhow::anyhow;
use clap::Subcommand;
use dialoguer::Confirm;

use taskdeck_api::AccessBackend;
use taskdeck_core::{ActorContext, hierarchy::reporting_chain};
use taskdeck_models::{AccessModule, ModuleId, PermissionValue, RoleDefaults, RoleKey, User};

use crate::utils::errors::AppError;
use crate::workflows::AccessControlPage;

#[derive(Debug, Subcommand)]
pub enum AccessCommand {
    /// List permission modules and their role defaults
    Modules,
    /// Create or update a module
    SaveModule {
        id: String,
        name: String,
        /// Default for the admin role (allow/deny)
        #[arg(long, default_value = "deny")]
        admin: String,
        /// Default for the manager role (allow/deny)
        #[arg(long, default_value = "deny")]
        manager: String,
        /// Default for the assistant role (allow/deny)
        #[arg(long, default_value = "deny")]
        assistant: String,
        /// Update an existing module instead of creating one
        #[arg(long)]
        update: bool,
    },
    /// List roles
    Roles,
    /// Create a dynamic role
    CreateRole {
        name: String,
        /// Explicit role key; derived from the name when omitted
        #[arg(long)]
        key: Option<String>,
    },
    /// Rename a dynamic role
    RenameRole { key: String, name: String },
    /// Delete a dynamic role
    DeleteRole { key: String },
    /// Show a user's effective permissions per module
    Permissions { email: String },
    /// Set one permission override on a user
    SetPermission {
        email: String,
        module: String,
        /// allow or deny (anything else is treated as deny)
        value: String,
    },
    /// Apply a role's default permission set to a user
    ApplyTemplate {
        email: String,
        role: String,
        /// Replace all existing overrides instead of filling gaps
        #[arg(long)]
        overwrite: bool,
    },
    /// Show a user's reporting chain, root first
    Chain { email: String },
}

pub async fn run<B: AccessBackend>(
    backend: B,
    ctx: ActorContext,
    command: AccessCommand,
) -> Result<(), AppError> {
    let mut page = AccessControlPage::new(backend, ctx);
    page.load().await?;

    match command {
        AccessCommand::Modules => {
            for module in &page.modules {
                println!(
                    "{:<24} {:<32} admin={} manager={} assistant={}",
                    module.id,
                    module.name,
                    module.defaults.admin,
                    module.defaults.manager,
                    module.defaults.assistant
                );
            }
        }
        AccessCommand::SaveModule {
            id,
            name,
            admin,
            manager,
            assistant,
            update,
        } => {
            let module = AccessModule {
                id: ModuleId::new(id),
                name,
                defaults: RoleDefaults {
                    admin: PermissionValue::normalize(&admin),
                    manager: PermissionValue::normalize(&manager),
                    assistant: PermissionValue::normalize(&assistant),
                },
            };
            let saved = page.save_module(module, !update).await?;
            println!("saved module {}", saved.id);
        }
        AccessCommand::Roles => {
            for role in &page.roles {
                let marker = if role.key.is_core() { " (core)" } else { "" };
                println!("{:<16} {}{}", role.key, role.name, marker);
            }
        }
        AccessCommand::CreateRole { name, key } => {
            let role = page.create_role(&name, key.as_deref()).await?;
            println!("created role {} ({})", role.key, role.name);
        }
        AccessCommand::RenameRole { key, name } => {
            let role = page.rename_role(&RoleKey::from(key.as_str()), &name).await?;
            println!("renamed role {} to {}", role.key, role.name);
        }
        AccessCommand::DeleteRole { key } => {
            let key = RoleKey::from(key.as_str());
            page.delete_role(&key).await?;
            println!("deleted role {}", key);
        }
        AccessCommand::Permissions { email } => {
            let user = find_user(&page, &email).await?;
            page.select_user(user).await?;
            for module in page.modules.clone() {
                println!("{:<24} {}", module.id, page.effective(&module.id));
            }
        }
        AccessCommand::SetPermission {
            email,
            module,
            value,
        } => {
            let user = find_user(&page, &email).await?;
            page.select_user(user).await?;
            let module = ModuleId::new(module);
            let value = PermissionValue::normalize(&value);
            page.set_permission(&module, value, &mut prompt_confirm).await?;
            println!("{} -> {}", module, value);
        }
        AccessCommand::ApplyTemplate {
            email,
            role,
            overwrite,
        } => {
            let user = find_user(&page, &email).await?;
            page.select_user(user).await?;
            let role = RoleKey::from(role.as_str());
            page.apply_template(&role, overwrite, &mut prompt_confirm)
                .await?;
            println!("applied template {}", role);
        }
        AccessCommand::Chain { email } => {
            let users = all_users(&page).await?;
            let user = users
                .iter()
                .find(|u| u.email.as_str().eq_ignore_ascii_case(email.trim()))
                .ok_or_else(|| AppError::not_found(anyhow!("no user with email {}", email)))?;
            for ancestor in reporting_chain(user, &users) {
                println!("{} ({})", ancestor.name, ancestor.role);
            }
            println!("{} ({})", user.name, user.role);
        }
    }
    Ok(())
}

fn prompt_confirm(message: &str) -> bool {
    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}

async fn all_users<B: AccessBackend>(
    page: &AccessControlPage<B>,
) -> Result<Vec<User>, AppError> {
    page.backend()
        .assignable_users(None)
        .await
        .map_err(AppError::api)
}

async fn find_user<B: AccessBackend>(
    page: &AccessControlPage<B>,
    email: &str,
) -> Result<User, AppError> {
    let users = all_users(page).await?;
    users
        .into_iter()
        .find(|u| u.email.as_str().eq_ignore_ascii_case(email.trim()))
        .ok_or_else(|| AppError::not_found(anyhow!("no user with email {}", email)))
}
