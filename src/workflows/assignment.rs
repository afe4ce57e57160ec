//! The assignment page: brand/task-type assignment per (company, user).

use anyhow::anyhow;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument, warn};

use taskdeck_api::{AccessBackend, ApiError, ManagerTier};
use taskdeck_core::{
    ActorContext,
    assignment::{
        bypasses_allow_list, compute_assignment_diff, filter_task_type_catalog,
        resolve_bulk_task_types, retain_allowed_selection, validate_apply,
    },
    company::{is_task_type_bypass, normalize_company_key},
    visibility::visible_users_for_company,
};
use taskdeck_models::{
    Brand, BrandAssignment, BrandId, Company, CompanyId, TaskType, TaskTypeId, User, UserId,
};

use crate::utils::errors::AppError;
use crate::workflows::events::{AssignmentChanged, EventBus};

/// Lifecycle of the page for the current (company, user) selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Loading,
    Ready,
    Applying,
    Error(String),
}

/// State for the assignment admin page.
///
/// One `apply` may be outstanding at a time for the whole page; switching
/// company or user is not blocked at the data layer, only submission is.
pub struct AssignPage<B> {
    backend: B,
    ctx: ActorContext,
    events: EventBus,
    pub state: PageState,
    pub company: Option<Company>,
    /// Users visible to the actor within the selected company.
    pub users: Vec<User>,
    pub selected_user: Option<User>,
    pub brands: Vec<Brand>,
    /// Task-type catalog fetched for the company (full catalog when the
    /// allow-list is bypassed).
    catalog: Vec<TaskType>,
    /// Brand names from the loaded mappings, for removals of brands no
    /// longer in the catalog.
    loaded_brand_names: BTreeMap<BrandId, String>,
    pub selected_brands: BTreeSet<BrandId>,
    pub initial_brands: BTreeSet<BrandId>,
    pub pending_task_types: BTreeSet<TaskTypeId>,
    is_applying: bool,
    is_saving_companies: bool,
}

impl<B: AccessBackend> AssignPage<B> {
    pub fn new(backend: B, ctx: ActorContext, events: EventBus) -> Self {
        Self {
            backend,
            ctx,
            events,
            state: PageState::Idle,
            company: None,
            users: Vec::new(),
            selected_user: None,
            brands: Vec::new(),
            catalog: Vec::new(),
            loaded_brand_names: BTreeMap::new(),
            selected_brands: BTreeSet::new(),
            initial_brands: BTreeSet::new(),
            pending_task_types: BTreeSet::new(),
            is_applying: false,
            is_saving_companies: false,
        }
    }

    pub fn ctx(&self) -> &ActorContext {
        &self.ctx
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Select a company: loads its visible users, brands, and task-type
    /// catalog, and drops any pending task-type selection the new company's
    /// allow-list no longer covers.
    #[instrument(skip(self))]
    pub async fn select_company(&mut self, company_name: &str) -> Result<(), AppError> {
        let companies = self.backend.companies().await.map_err(AppError::api)?;
        let company = companies
            .into_iter()
            .find(|c| normalize_company_key(&c.name) == normalize_company_key(company_name))
            .ok_or_else(|| AppError::not_found(anyhow!("unknown company: {}", company_name)))?;

        let all_users = self
            .backend
            .assignable_users(Some(&company.name))
            .await
            .map_err(AppError::api)?;
        let visible = visible_users_for_company(&self.ctx, &all_users, &company.name)
            .into_iter()
            .cloned()
            .collect();

        let brands = self
            .backend
            .brands(&company.name)
            .await
            .map_err(AppError::api)?;
        let catalog = if bypasses_allow_list(&self.ctx, &company.name) {
            self.backend.task_types(None).await.map_err(AppError::api)?
        } else {
            self.backend
                .task_types(Some(&company.name))
                .await
                .map_err(AppError::api)?
        };

        retain_allowed_selection(
            &self.ctx,
            &company.name,
            &mut self.pending_task_types,
            &company.allowed_task_type_ids,
        );

        self.users = visible;
        self.brands = brands;
        self.catalog = catalog;
        self.company = Some(company);
        self.selected_user = None;
        self.loaded_brand_names.clear();
        self.selected_brands.clear();
        self.initial_brands.clear();
        self.state = PageState::Idle;
        Ok(())
    }

    /// Select a user and load their current brand assignments.
    #[instrument(skip(self))]
    pub async fn select_user(&mut self, user_id: &UserId) -> Result<(), AppError> {
        let company = self.require_company()?.clone();
        let user = self
            .users
            .iter()
            .find(|u| &u.id == user_id)
            .cloned()
            .ok_or_else(|| {
                AppError::authorization(anyhow!("user {} is not visible to you", user_id))
            })?;

        self.state = PageState::Loading;
        match self.load_mappings(&company, &user.id).await {
            Ok(()) => {
                self.selected_user = Some(user);
                self.state = PageState::Ready;
                Ok(())
            }
            Err(err) => {
                self.state = PageState::Error(err.message.clone());
                Err(AppError::api(err))
            }
        }
    }

    /// Task types offered for selection, after the allow-list filter.
    pub fn visible_task_types(&self) -> Vec<&TaskType> {
        match &self.company {
            Some(company) => filter_task_type_catalog(
                &self.ctx,
                &company.name,
                &self.catalog,
                &company.allowed_task_type_ids,
            ),
            None => Vec::new(),
        }
    }

    pub fn toggle_brand(&mut self, brand_id: &BrandId) -> Result<(), AppError> {
        if !self.brands.iter().any(|b| &b.id == brand_id) {
            return Err(AppError::not_found(anyhow!("unknown brand: {}", brand_id)));
        }
        if !self.selected_brands.remove(brand_id) {
            self.selected_brands.insert(brand_id.clone());
        }
        Ok(())
    }

    pub fn toggle_task_type(&mut self, task_type_id: &TaskTypeId) -> Result<(), AppError> {
        if !self
            .visible_task_types()
            .iter()
            .any(|t| &t.id == task_type_id)
        {
            return Err(AppError::validation(anyhow!(
                "task type {} is not available for this company",
                task_type_id
            )));
        }
        if !self.pending_task_types.remove(task_type_id) {
            self.pending_task_types.insert(task_type_id.clone());
        }
        Ok(())
    }

    /// Apply the current selection: upsert every checked brand with the full
    /// task-type selection, and upsert unchecked-but-previously-assigned
    /// brands with an empty list (deletion).
    #[instrument(skip(self))]
    pub async fn apply(&mut self) -> Result<(), AppError> {
        if self.is_applying {
            return Err(AppError::validation(anyhow!("an apply is already in flight")));
        }
        let company = self.require_company()?.clone();
        let user = self
            .selected_user
            .clone()
            .ok_or_else(|| AppError::validation(anyhow!("no user selected")))?;

        let diff = compute_assignment_diff(&self.selected_brands, &self.initial_brands);
        validate_apply(&diff, &self.pending_task_types).map_err(AppError::validation)?;

        let mut upserts: Vec<BrandAssignment> = Vec::new();
        for brand_id in &diff.to_upsert {
            upserts.push(BrandAssignment {
                company_name: company.name.clone(),
                user_id: user.id.clone(),
                brand_id: brand_id.clone(),
                brand_name: self.brand_name(brand_id),
                task_type_ids: self.pending_task_types.clone(),
            });
        }
        for brand_id in &diff.to_remove {
            upserts.push(BrandAssignment {
                company_name: company.name.clone(),
                user_id: user.id.clone(),
                brand_id: brand_id.clone(),
                brand_name: self.brand_name(brand_id),
                task_type_ids: BTreeSet::new(),
            });
        }

        self.is_applying = true;
        self.state = PageState::Applying;
        let result = self.backend.upsert_mappings(&upserts).await;
        // Either way, re-sync from the backend: it is the ground truth.
        let reload = self.load_mappings(&company, &user.id).await;
        self.is_applying = false;

        match result {
            Ok(()) => {
                if let Err(err) = reload {
                    warn!(error = %err, "mapping reload after apply failed");
                }
                self.state = PageState::Ready;
                self.events.publish(AssignmentChanged {
                    company_name: company.name.clone(),
                    user_id: user.id.clone(),
                });
                info!(user_id = %user.id, upserts = diff.to_upsert.len(),
                      removals = diff.to_remove.len(), "assignments applied");
                Ok(())
            }
            Err(err) => {
                self.state = PageState::Error(err.message.clone());
                Err(AppError::api(err))
            }
        }
    }

    /// Bulk brand creation for the `speedecom` company: creates the brands
    /// and assigns them to the chosen RM and AM with the company allow-list,
    /// falling back to the three fixed task types resolved by name.
    #[instrument(skip(self, brand_names), fields(count = brand_names.len()))]
    pub async fn bulk_create_brands(
        &mut self,
        brand_names: &[String],
        rm_email: &str,
        am_email: &str,
    ) -> Result<Vec<Brand>, AppError> {
        if self.is_applying {
            return Err(AppError::validation(anyhow!("an apply is already in flight")));
        }
        let company = self.require_company()?.clone();
        if !is_task_type_bypass(&company.name) {
            return Err(AppError::validation(anyhow!(
                "bulk brand creation is only available for Speed E Com"
            )));
        }
        if brand_names.is_empty() {
            return Err(AppError::validation(anyhow!("no brand names given")));
        }

        let task_types = resolve_bulk_task_types(&company.allowed_task_type_ids, &self.catalog);
        if task_types.is_empty() {
            return Err(AppError::validation(anyhow!(
                "no task types could be resolved for bulk assignment"
            )));
        }

        // Email lookup runs against the company's full user list, not the
        // actor's visible subset.
        let company_users = self
            .backend
            .assignable_users(Some(&company.name))
            .await
            .map_err(AppError::api)?;
        let rm = find_by_email(&company_users, rm_email)
            .ok_or_else(|| AppError::validation(anyhow!("no user with email {}", rm_email)))?
            .clone();
        let am = find_by_email(&company_users, am_email)
            .ok_or_else(|| AppError::validation(anyhow!("no user with email {}", am_email)))?
            .clone();

        self.is_applying = true;
        self.state = PageState::Applying;
        let result = self.run_bulk_create(&company, brand_names, &rm, &am, &task_types).await;
        self.is_applying = false;

        match result {
            Ok(created) => {
                self.brands.extend(created.iter().cloned());
                self.state = PageState::Ready;
                for user_id in [rm.id.clone(), am.id.clone()] {
                    self.events.publish(AssignmentChanged {
                        company_name: company.name.clone(),
                        user_id,
                    });
                }
                Ok(created)
            }
            Err(err) => {
                self.state = PageState::Error(err.message.clone());
                Err(AppError::api(err))
            }
        }
    }

    /// Assign companies to a manager-tier user (md_manager/ob_manager/sbm).
    #[instrument(skip(self, company_ids))]
    pub async fn set_manager_companies(
        &mut self,
        tier: ManagerTier,
        user: &User,
        company_ids: &BTreeSet<CompanyId>,
    ) -> Result<(), AppError> {
        if self.is_saving_companies {
            return Err(AppError::validation(anyhow!(
                "a company assignment is already in flight"
            )));
        }
        if user.role != tier.role_key() {
            return Err(AppError::validation(anyhow!(
                "user {} does not hold the {} role",
                user.email,
                tier.role_key()
            )));
        }

        self.is_saving_companies = true;
        let result = self
            .backend
            .set_manager_companies(tier, &user.id, company_ids)
            .await;
        self.is_saving_companies = false;
        result.map_err(AppError::api)
    }

    async fn run_bulk_create(
        &self,
        company: &Company,
        brand_names: &[String],
        rm: &User,
        am: &User,
        task_types: &BTreeSet<TaskTypeId>,
    ) -> Result<Vec<Brand>, ApiError> {
        let created = self
            .backend
            .bulk_create_brands(&company.name, brand_names)
            .await?;

        let mut upserts: Vec<BrandAssignment> = Vec::new();
        for brand in &created {
            for user in [rm, am] {
                upserts.push(BrandAssignment {
                    company_name: company.name.clone(),
                    user_id: user.id.clone(),
                    brand_id: brand.id.clone(),
                    brand_name: brand.name.clone(),
                    task_type_ids: task_types.clone(),
                });
            }
        }
        self.backend.upsert_mappings(&upserts).await?;
        Ok(created)
    }

    async fn load_mappings(&mut self, company: &Company, user_id: &UserId) -> Result<(), ApiError> {
        let mappings = self.backend.mappings(&company.name, user_id).await?;

        self.loaded_brand_names = mappings
            .iter()
            .map(|m| (m.brand_id.clone(), m.brand_name.clone()))
            .collect();
        self.initial_brands = mappings.iter().map(|m| m.brand_id.clone()).collect();
        self.selected_brands = self.initial_brands.clone();
        self.pending_task_types = mappings
            .iter()
            .flat_map(|m| m.task_type_ids.iter().cloned())
            .collect();
        retain_allowed_selection(
            &self.ctx,
            &company.name,
            &mut self.pending_task_types,
            &company.allowed_task_type_ids,
        );
        Ok(())
    }

    fn brand_name(&self, brand_id: &BrandId) -> String {
        self.brands
            .iter()
            .find(|b| &b.id == brand_id)
            .map(|b| b.name.clone())
            .or_else(|| self.loaded_brand_names.get(brand_id).cloned())
            .unwrap_or_default()
    }

    fn require_company(&self) -> Result<&Company, AppError> {
        self.company
            .as_ref()
            .ok_or_else(|| AppError::validation(anyhow!("no company selected")))
    }
}

fn find_by_email<'a>(users: &'a [User], email: &str) -> Option<&'a User> {
    users
        .iter()
        .find(|u| u.email.as_str().eq_ignore_ascii_case(email.trim()))
}
