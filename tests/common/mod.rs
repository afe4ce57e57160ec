//! Shared test fixtures: user/catalog builders and an in-memory backend.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use fake::Fake;
use fake::faker::name::en::Name;

use taskdeck_api::dto::ManagerTier;
use taskdeck_api::{AccessBackend, ApiError};
use taskdeck_core::merge_template;
use taskdeck_models::{
    AccessModule, Brand, BrandAssignment, Company, CompanyId, Email, ModuleId, PermissionSet,
    PermissionValue, Role, RoleDefaults, RoleKey, TaskType, TaskTypeId, User, UserId,
};

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

pub fn user(id: &str, role: RoleKey, manager: Option<&str>) -> User {
    user_in(id, role, manager, None)
}

pub fn user_in(id: &str, role: RoleKey, manager: Option<&str>, company: Option<&str>) -> User {
    let name: String = Name().fake();
    User {
        id: UserId::new(id),
        name,
        email: Email::new_unchecked(format!("{}@taskdeck.test", id)),
        role,
        manager_id: manager.map(UserId::new),
        company: company.map(|c| c.to_string()),
        permissions: None,
        assigned_company_ids: BTreeSet::new(),
        created_at: None,
    }
}

pub fn company(name: &str, allowed_task_types: &[&str]) -> Company {
    Company {
        name: name.to_string(),
        allowed_task_type_ids: allowed_task_types
            .iter()
            .map(|id| TaskTypeId::new(*id))
            .collect(),
    }
}

pub fn brand(id: &str, name: &str, company: Option<&str>) -> Brand {
    Brand {
        id: id.into(),
        name: name.to_string(),
        company: company.map(|c| c.to_string()),
    }
}

pub fn task_type(id: &str, name: &str, company: Option<&str>) -> TaskType {
    TaskType {
        id: id.into(),
        name: name.to_string(),
        company: company.map(|c| c.to_string()),
    }
}

pub fn module(id: &str, name: &str) -> AccessModule {
    AccessModule {
        id: ModuleId::new(id),
        name: name.to_string(),
        defaults: RoleDefaults::default(),
    }
}

pub fn role(key: RoleKey, name: &str) -> Role {
    Role::new(key, name)
}

/// The three core roles plus the SBM chain, as most pages see them.
pub fn default_roles() -> Vec<Role> {
    vec![
        role(RoleKey::Admin, "Admin"),
        role(RoleKey::Manager, "Manager"),
        role(RoleKey::Assistant, "Assistant"),
        role(RoleKey::Sbm, "SBM"),
        role(RoleKey::Rm, "RM"),
        role(RoleKey::Am, "AM"),
    ]
}

/// A synthetic 3-level SBM hierarchy:
/// sbm-1 -> {rm-1, rm-2}, rm-1 -> {am-1}, rm-2 -> {am-2};
/// sbm-2 -> rm-3 -> am-3 is a parallel tree the first SBM must not see.
pub fn sbm_tree() -> Vec<User> {
    vec![
        user("sbm-1", RoleKey::Sbm, None),
        user("rm-1", RoleKey::Rm, Some("sbm-1")),
        user("rm-2", RoleKey::Rm, Some("sbm-1")),
        user("am-1", RoleKey::Am, Some("rm-1")),
        user("am-2", RoleKey::Am, Some("rm-2")),
        user("sbm-2", RoleKey::Sbm, None),
        user("rm-3", RoleKey::Rm, Some("sbm-2")),
        user("am-3", RoleKey::Am, Some("rm-3")),
    ]
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeState {
    pub modules: Vec<AccessModule>,
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub permissions: HashMap<UserId, PermissionSet>,
    /// Role default permission sets used by apply-template.
    pub templates: HashMap<RoleKey, PermissionSet>,
    pub companies: Vec<Company>,
    pub brands: Vec<Brand>,
    pub task_types: Vec<TaskType>,
    pub mappings: Vec<BrandAssignment>,
    /// Every upsert batch received, in order.
    pub upsert_batches: Vec<Vec<BrandAssignment>>,
    /// (tier path segment, user, companies) calls received.
    pub manager_company_calls: Vec<(String, UserId, BTreeSet<CompanyId>)>,
    /// When set, the next call fails with this message.
    pub fail_next: Option<String>,
    next_brand_seq: u32,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail_next(&self, message: &str) {
        self.state().fail_next = Some(message.to_string());
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        if let Some(message) = self.state().fail_next.take() {
            return Err(ApiError::backend(Some(message)));
        }
        Ok(())
    }
}

impl AccessBackend for FakeBackend {
    async fn list_modules(&self) -> Result<Vec<AccessModule>, ApiError> {
        self.check_failure()?;
        Ok(self.state().modules.clone())
    }

    async fn create_module(&self, module: &AccessModule) -> Result<AccessModule, ApiError> {
        self.check_failure()?;
        self.state().modules.push(module.clone());
        Ok(module.clone())
    }

    async fn update_module(&self, module: &AccessModule) -> Result<AccessModule, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        match state.modules.iter_mut().find(|m| m.id == module.id) {
            Some(existing) => {
                *existing = module.clone();
                Ok(module.clone())
            }
            None => Err(ApiError::backend(Some("module not found".to_string()))),
        }
    }

    async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.check_failure()?;
        Ok(self.state().roles.clone())
    }

    async fn create_role(&self, role: &Role) -> Result<Role, ApiError> {
        self.check_failure()?;
        self.state().roles.push(role.clone());
        Ok(role.clone())
    }

    async fn update_role(&self, key: &RoleKey, name: &str) -> Result<Role, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        match state.roles.iter_mut().find(|r| &r.key == key) {
            Some(role) => {
                role.name = name.to_string();
                Ok(role.clone())
            }
            None => Err(ApiError::backend(Some("role not found".to_string()))),
        }
    }

    async fn delete_role(&self, key: &RoleKey) -> Result<(), ApiError> {
        self.check_failure()?;
        self.state().roles.retain(|r| &r.key != key);
        Ok(())
    }

    async fn user_permissions(&self, user_id: &UserId) -> Result<PermissionSet, ApiError> {
        self.check_failure()?;
        Ok(self
            .state()
            .permissions
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_user_permission(
        &self,
        user_id: &UserId,
        module_id: &ModuleId,
        value: PermissionValue,
    ) -> Result<(), ApiError> {
        self.check_failure()?;
        self.state()
            .permissions
            .entry(user_id.clone())
            .or_default()
            .insert(module_id.clone(), value);
        Ok(())
    }

    async fn apply_template(
        &self,
        user_id: &UserId,
        template_role: &RoleKey,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        let template = state.templates.get(template_role).cloned().unwrap_or_default();
        let existing = state.permissions.get(user_id).cloned().unwrap_or_default();
        let merged = merge_template(&existing, &template, overwrite);
        state.permissions.insert(user_id.clone(), merged);
        Ok(())
    }

    async fn assignable_users(&self, company: Option<&str>) -> Result<Vec<User>, ApiError> {
        self.check_failure()?;
        let users = self.state().users.clone();
        Ok(match company {
            Some(company) => users
                .into_iter()
                .filter(|u| u.company_matches(company))
                .collect(),
            None => users,
        })
    }

    async fn mappings(
        &self,
        company: &str,
        user_id: &UserId,
    ) -> Result<Vec<BrandAssignment>, ApiError> {
        self.check_failure()?;
        Ok(self
            .state()
            .mappings
            .iter()
            .filter(|m| m.company_name == company && &m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_mappings(&self, mappings: &[BrandAssignment]) -> Result<(), ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        state.upsert_batches.push(mappings.to_vec());
        for mapping in mappings {
            state.mappings.retain(|m| {
                !(m.company_name == mapping.company_name
                    && m.user_id == mapping.user_id
                    && m.brand_id == mapping.brand_id)
            });
            // empty task-type set means deletion, never stored
            if !mapping.task_type_ids.is_empty() {
                state.mappings.push(mapping.clone());
            }
        }
        Ok(())
    }

    async fn set_manager_companies(
        &self,
        tier: ManagerTier,
        user_id: &UserId,
        company_ids: &BTreeSet<CompanyId>,
    ) -> Result<(), ApiError> {
        self.check_failure()?;
        self.state().manager_company_calls.push((
            tier.path_segment().to_string(),
            user_id.clone(),
            company_ids.clone(),
        ));
        Ok(())
    }

    async fn companies(&self) -> Result<Vec<Company>, ApiError> {
        self.check_failure()?;
        Ok(self.state().companies.clone())
    }

    async fn brands(&self, company: &str) -> Result<Vec<Brand>, ApiError> {
        self.check_failure()?;
        Ok(self
            .state()
            .brands
            .iter()
            .filter(|b| b.company.as_deref() == Some(company))
            .cloned()
            .collect())
    }

    async fn task_types(&self, company: Option<&str>) -> Result<Vec<TaskType>, ApiError> {
        self.check_failure()?;
        let task_types = self.state().task_types.clone();
        Ok(match company {
            Some(company) => task_types
                .into_iter()
                .filter(|t| t.company.as_deref() == Some(company))
                .collect(),
            None => task_types,
        })
    }

    async fn bulk_create_brands(
        &self,
        company: &str,
        brand_names: &[String],
    ) -> Result<Vec<Brand>, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        let mut created = Vec::new();
        for name in brand_names {
            state.next_brand_seq += 1;
            let brand = Brand {
                id: format!("brand-{}", state.next_brand_seq).into(),
                name: name.clone(),
                company: Some(company.to_string()),
            };
            state.brands.push(brand.clone());
            created.push(brand);
        }
        Ok(created)
    }
}
