//! `reqwest`-based implementation of [`AccessBackend`].

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::instrument;

use taskdeck_config::ApiConfig;
use taskdeck_models::{
    AccessModule, Brand, BrandAssignment, Company, CompanyId, ModuleId, PermissionSet,
    PermissionValue, Role, RoleKey, TaskType, User, UserId,
};

use crate::backend::AccessBackend;
use crate::dto::{
    ApplyTemplateRequest, BulkCreateBrandsRequest, CreateRoleRequest, ManagerCompaniesRequest,
    ManagerTier, SaveModuleRequest, SetPermissionRequest, UpdateRoleRequest,
};
use crate::envelope::ApiEnvelope;
use crate::error::ApiError;

/// HTTP client for the Taskdeck backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the envelope payload.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            // Failed responses often still carry an envelope with a message.
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|env| env.message);
            return Err(ApiError::status(status.as_u16(), message));
        }
        let envelope: ApiEnvelope<T> = response.json().await?;
        envelope.into_result()
    }

    /// Send a mutation and discard the payload.
    async fn send_ack(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|env| env.message);
            return Err(ApiError::status(status.as_u16(), message));
        }
        let envelope: ApiEnvelope<serde_json::Value> = response.json().await?;
        envelope.into_ack()
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn post_ack<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.send_ack(self.request(Method::POST, path).json(body))
            .await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }
}

impl AccessBackend for ApiClient {
    #[instrument(skip(self))]
    async fn list_modules(&self) -> Result<Vec<AccessModule>, ApiError> {
        self.get("access/modules", &[]).await
    }

    #[instrument(skip(self, module), fields(module_id = %module.id))]
    async fn create_module(&self, module: &AccessModule) -> Result<AccessModule, ApiError> {
        let body = SaveModuleRequest {
            id: module.id.clone(),
            name: module.name.clone(),
            defaults: module.defaults,
        };
        self.post("access/modules", &body).await
    }

    #[instrument(skip(self, module), fields(module_id = %module.id))]
    async fn update_module(&self, module: &AccessModule) -> Result<AccessModule, ApiError> {
        let body = SaveModuleRequest {
            id: module.id.clone(),
            name: module.name.clone(),
            defaults: module.defaults,
        };
        self.put(&format!("access/modules/{}", module.id), &body)
            .await
    }

    #[instrument(skip(self))]
    async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.get("access/roles", &[]).await
    }

    #[instrument(skip(self, role), fields(role_key = %role.key))]
    async fn create_role(&self, role: &Role) -> Result<Role, ApiError> {
        let body = CreateRoleRequest {
            key: role.key.clone(),
            name: role.name.clone(),
        };
        self.post("access/roles", &body).await
    }

    #[instrument(skip(self))]
    async fn update_role(&self, key: &RoleKey, name: &str) -> Result<Role, ApiError> {
        let body = UpdateRoleRequest {
            name: name.to_string(),
        };
        self.put(&format!("access/roles/{}", key), &body).await
    }

    #[instrument(skip(self))]
    async fn delete_role(&self, key: &RoleKey) -> Result<(), ApiError> {
        self.send_ack(self.request(Method::DELETE, &format!("access/roles/{}", key)))
            .await
    }

    #[instrument(skip(self))]
    async fn user_permissions(&self, user_id: &UserId) -> Result<PermissionSet, ApiError> {
        self.get(&format!("access/users/{}/permissions", user_id), &[])
            .await
    }

    #[instrument(skip(self))]
    async fn set_user_permission(
        &self,
        user_id: &UserId,
        module_id: &ModuleId,
        value: PermissionValue,
    ) -> Result<(), ApiError> {
        let body = SetPermissionRequest { value };
        self.send_ack(
            self.request(
                Method::PUT,
                &format!("access/users/{}/permissions/{}", user_id, module_id),
            )
            .json(&body),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn apply_template(
        &self,
        user_id: &UserId,
        template_role: &RoleKey,
        overwrite: bool,
    ) -> Result<(), ApiError> {
        let body = ApplyTemplateRequest {
            template_role: template_role.clone(),
            overwrite,
        };
        self.post_ack(&format!("access/users/{}/apply-template", user_id), &body)
            .await
    }

    #[instrument(skip(self))]
    async fn assignable_users(&self, company: Option<&str>) -> Result<Vec<User>, ApiError> {
        match company {
            Some(company) => {
                self.get("assign/users", &[("companyName", company)]).await
            }
            None => self.get("assign/users", &[]).await,
        }
    }

    #[instrument(skip(self))]
    async fn mappings(
        &self,
        company: &str,
        user_id: &UserId,
    ) -> Result<Vec<BrandAssignment>, ApiError> {
        self.get(
            "assign/mappings",
            &[("companyName", company), ("userId", user_id.as_str())],
        )
        .await
    }

    #[instrument(skip(self, mappings), fields(count = mappings.len()))]
    async fn upsert_mappings(&self, mappings: &[BrandAssignment]) -> Result<(), ApiError> {
        match mappings {
            [single] => self.post_ack("assign/mappings", single).await,
            many => self.post_ack("assign/mappings/bulk", &many).await,
        }
    }

    #[instrument(skip(self, company_ids))]
    async fn set_manager_companies(
        &self,
        tier: ManagerTier,
        user_id: &UserId,
        company_ids: &BTreeSet<CompanyId>,
    ) -> Result<(), ApiError> {
        let body = ManagerCompaniesRequest {
            tier,
            user_id: user_id.clone(),
            company_ids: company_ids.clone(),
        };
        self.post_ack(&format!("assign/{}", tier.path_segment()), &body)
            .await
    }

    #[instrument(skip(self))]
    async fn companies(&self) -> Result<Vec<Company>, ApiError> {
        self.get("companies", &[]).await
    }

    #[instrument(skip(self))]
    async fn brands(&self, company: &str) -> Result<Vec<Brand>, ApiError> {
        self.get("brands", &[("companyName", company)]).await
    }

    #[instrument(skip(self))]
    async fn task_types(&self, company: Option<&str>) -> Result<Vec<TaskType>, ApiError> {
        match company {
            Some(company) => self.get("task-types", &[("companyName", company)]).await,
            None => self.get("task-types", &[]).await,
        }
    }

    #[instrument(skip(self, brand_names), fields(count = brand_names.len()))]
    async fn bulk_create_brands(
        &self,
        company: &str,
        brand_names: &[String],
    ) -> Result<Vec<Brand>, ApiError> {
        let body = BulkCreateBrandsRequest {
            company_name: company.to_string(),
            brand_names: brand_names.to_vec(),
        };
        self.post("brands/bulk", &body).await
    }
}
