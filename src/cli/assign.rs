//! `taskdeck assign` subcommands.

use anyhow::anyhow;
use clap::Subcommand;
use std::collections::BTreeSet;

use taskdeck_api::{AccessBackend, ManagerTier};
use taskdeck_core::ActorContext;
use taskdeck_models::{BrandId, CompanyId, TaskTypeId, UserId};

use crate::utils::errors::AppError;
use crate::workflows::{AssignPage, EventBus};

#[derive(Debug, Subcommand)]
pub enum AssignCommand {
    /// List users visible to you within a company
    Users { company: String },
    /// Show a user's current brand/task-type assignments
    Show { company: String, email: String },
    /// Replace a user's brand selection and apply it
    Apply {
        company: String,
        email: String,
        /// Brand ids or names to assign (repeatable)
        #[arg(long = "brand")]
        brands: Vec<String>,
        /// Task type ids or names selected for the assigned brands (repeatable)
        #[arg(long = "task-type")]
        task_types: Vec<String>,
    },
    /// Assign companies to a manager-tier user (md_manager/ob_manager/sbm)
    ManagerCompanies {
        /// md_manager, ob_manager, or sbm
        tier: String,
        email: String,
        /// Company ids (repeatable)
        #[arg(long = "company")]
        companies: Vec<String>,
    },
    /// Bulk-create brands for Speed E Com and auto-assign them to an RM and AM
    BulkBrands {
        company: String,
        /// Brand names to create (repeatable)
        #[arg(long = "name")]
        names: Vec<String>,
        /// RM email
        #[arg(long)]
        rm: String,
        /// AM email
        #[arg(long)]
        am: String,
    },
}

pub async fn run<B: AccessBackend>(
    backend: B,
    ctx: ActorContext,
    command: AssignCommand,
) -> Result<(), AppError> {
    let mut page = AssignPage::new(backend, ctx, EventBus::default());

    match command {
        AssignCommand::Users { company } => {
            page.select_company(&company).await?;
            for user in &page.users {
                println!("{:<28} {:<16} {}", user.email, user.role, user.name);
            }
        }
        AssignCommand::Show { company, email } => {
            page.select_company(&company).await?;
            let user_id = user_id_by_email(&page, &email)?;
            page.select_user(&user_id).await?;
            for brand in &page.brands {
                let checked = if page.selected_brands.contains(&brand.id) {
                    "x"
                } else {
                    " "
                };
                println!("[{}] {:<20} {}", checked, brand.id, brand.name);
            }
            let task_types: Vec<String> = page
                .visible_task_types()
                .into_iter()
                .filter(|t| page.pending_task_types.contains(&t.id))
                .map(|t| t.name.clone())
                .collect();
            println!("task types: {}", task_types.join(", "));
        }
        AssignCommand::Apply {
            company,
            email,
            brands,
            task_types,
        } => {
            page.select_company(&company).await?;
            let user_id = user_id_by_email(&page, &email)?;
            page.select_user(&user_id).await?;

            page.selected_brands.clear();
            for brand in &brands {
                let id = resolve_brand(&page, brand)?;
                page.toggle_brand(&id)?;
            }
            if !task_types.is_empty() {
                page.pending_task_types.clear();
                for task_type in &task_types {
                    let id = resolve_task_type(&page, task_type)?;
                    page.toggle_task_type(&id)?;
                }
            }
            page.apply().await?;
            println!("applied: {} brand(s) assigned", page.selected_brands.len());
        }
        AssignCommand::ManagerCompanies {
            tier,
            email,
            companies,
        } => {
            let tier = parse_tier(&tier)?;
            let users = page
                .backend()
                .assignable_users(None)
                .await
                .map_err(AppError::api)?;
            let user = users
                .iter()
                .find(|u| u.email.as_str().eq_ignore_ascii_case(email.trim()))
                .ok_or_else(|| AppError::not_found(anyhow!("no user with email {}", email)))?
                .clone();
            let company_ids: BTreeSet<CompanyId> =
                companies.iter().map(|c| CompanyId::new(c.clone())).collect();
            page.set_manager_companies(tier, &user, &company_ids).await?;
            println!("assigned {} company(ies) to {}", company_ids.len(), user.email);
        }
        AssignCommand::BulkBrands {
            company,
            names,
            rm,
            am,
        } => {
            page.select_company(&company).await?;
            let created = page.bulk_create_brands(&names, &rm, &am).await?;
            for brand in &created {
                println!("created {:<20} {}", brand.id, brand.name);
            }
        }
    }
    Ok(())
}

fn parse_tier(raw: &str) -> Result<ManagerTier, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "md_manager" => Ok(ManagerTier::MdManager),
        "ob_manager" => Ok(ManagerTier::ObManager),
        "sbm" => Ok(ManagerTier::Sbm),
        other => Err(AppError::validation(anyhow!(
            "tier must be md_manager, ob_manager, or sbm, got '{}'",
            other
        ))),
    }
}

fn user_id_by_email<B: AccessBackend>(
    page: &AssignPage<B>,
    email: &str,
) -> Result<UserId, AppError> {
    page.users
        .iter()
        .find(|u| u.email.as_str().eq_ignore_ascii_case(email.trim()))
        .map(|u| u.id.clone())
        .ok_or_else(|| {
            AppError::not_found(anyhow!("no visible user with email {} in this company", email))
        })
}

fn resolve_brand<B: AccessBackend>(page: &AssignPage<B>, raw: &str) -> Result<BrandId, AppError> {
    page.brands
        .iter()
        .find(|b| b.id.as_str() == raw || b.name.eq_ignore_ascii_case(raw))
        .map(|b| b.id.clone())
        .ok_or_else(|| AppError::not_found(anyhow!("unknown brand: {}", raw)))
}

fn resolve_task_type<B: AccessBackend>(
    page: &AssignPage<B>,
    raw: &str,
) -> Result<TaskTypeId, AppError> {
    page.visible_task_types()
        .into_iter()
        .find(|t| t.id.as_str() == raw || t.name.eq_ignore_ascii_case(raw))
        .map(|t| t.id.clone())
        .ok_or_else(|| AppError::not_found(anyhow!("unknown task type: {}", raw)))
}
