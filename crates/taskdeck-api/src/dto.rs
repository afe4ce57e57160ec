//! Request payloads sent to the backend.

use serde::Serialize;
use std::collections::BTreeSet;
use taskdeck_models::{CompanyId, ModuleId, PermissionValue, RoleDefaults, RoleKey, UserId};

/// Manager-tier roles that can have companies assigned to them. Each tier has
/// its own endpoint and id field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerTier {
    MdManager,
    ObManager,
    Sbm,
}

impl ManagerTier {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::MdManager => "md-manager-companies",
            Self::ObManager => "ob-manager-companies",
            Self::Sbm => "sbm-companies",
        }
    }

    pub fn id_field(&self) -> &'static str {
        match self {
            Self::MdManager => "mdManagerId",
            Self::ObManager => "obManagerId",
            Self::Sbm => "sbmId",
        }
    }

    pub fn role_key(&self) -> RoleKey {
        match self {
            Self::MdManager => RoleKey::MdManager,
            Self::ObManager => RoleKey::ObManager,
            Self::Sbm => RoleKey::Sbm,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub key: RoleKey,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveModuleRequest {
    pub id: ModuleId,
    pub name: String,
    pub defaults: RoleDefaults,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPermissionRequest {
    pub value: PermissionValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplateRequest {
    pub template_role: RoleKey,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateBrandsRequest {
    pub company_name: String,
    pub brand_names: Vec<String>,
}

/// Body for the manager-tier company assignment endpoints. The id field name
/// varies per tier, so this serializes through a small map.
#[derive(Debug, Clone)]
pub struct ManagerCompaniesRequest {
    pub tier: ManagerTier,
    pub user_id: UserId,
    pub company_ids: BTreeSet<CompanyId>,
}

impl Serialize for ManagerCompaniesRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.tier.id_field(), &self.user_id)?;
        map.serialize_entry("companyIds", &self.company_ids)?;
        map.end()
    }
}
