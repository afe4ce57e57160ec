//! The trait seam between workflows and the REST backend.

use std::collections::BTreeSet;
use taskdeck_models::{
    AccessModule, Brand, BrandAssignment, Company, CompanyId, ModuleId, PermissionSet,
    PermissionValue, Role, RoleKey, TaskType, User, UserId,
};

use crate::dto::ManagerTier;
use crate::error::ApiError;

/// Everything the admin workflows need from the backend.
///
/// Implemented by [`crate::client::ApiClient`] over HTTP and by in-memory
/// fakes in tests. Workflows are generic over this trait, never over a
/// concrete client.
#[allow(async_fn_in_trait)]
pub trait AccessBackend {
    // --- access-control page ---

    async fn list_modules(&self) -> Result<Vec<AccessModule>, ApiError>;
    async fn create_module(&self, module: &AccessModule) -> Result<AccessModule, ApiError>;
    async fn update_module(&self, module: &AccessModule) -> Result<AccessModule, ApiError>;

    async fn list_roles(&self) -> Result<Vec<Role>, ApiError>;
    async fn create_role(&self, role: &Role) -> Result<Role, ApiError>;
    async fn update_role(&self, key: &RoleKey, name: &str) -> Result<Role, ApiError>;
    async fn delete_role(&self, key: &RoleKey) -> Result<(), ApiError>;

    async fn user_permissions(&self, user_id: &UserId) -> Result<PermissionSet, ApiError>;
    async fn set_user_permission(
        &self,
        user_id: &UserId,
        module_id: &ModuleId,
        value: PermissionValue,
    ) -> Result<(), ApiError>;
    async fn apply_template(
        &self,
        user_id: &UserId,
        template_role: &RoleKey,
        overwrite: bool,
    ) -> Result<(), ApiError>;

    // --- assignment page ---

    async fn assignable_users(&self, company: Option<&str>) -> Result<Vec<User>, ApiError>;
    async fn mappings(
        &self,
        company: &str,
        user_id: &UserId,
    ) -> Result<Vec<BrandAssignment>, ApiError>;
    async fn upsert_mappings(&self, mappings: &[BrandAssignment]) -> Result<(), ApiError>;
    async fn set_manager_companies(
        &self,
        tier: ManagerTier,
        user_id: &UserId,
        company_ids: &BTreeSet<CompanyId>,
    ) -> Result<(), ApiError>;

    // --- catalog ---

    async fn companies(&self) -> Result<Vec<Company>, ApiError>;
    async fn brands(&self, company: &str) -> Result<Vec<Brand>, ApiError>;
    /// `None` fetches the full catalog (admin / bypass views).
    async fn task_types(&self, company: Option<&str>) -> Result<Vec<TaskType>, ApiError>;
    async fn bulk_create_brands(
        &self,
        company: &str,
        brand_names: &[String],
    ) -> Result<Vec<Brand>, ApiError>;
}
