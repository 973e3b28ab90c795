//! Organization role API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const ROLES_PATH: &str = "/api/v1/orgs/current/roles";

#[derive(Debug, Clone, Deserialize)]
pub struct OrgRole {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrgRoleRequest {
    pub display_name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

pub struct OrgRolesApi<'a> {
    client: &'a Client,
}

impl<'a> OrgRolesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/orgs/current/roles
    pub async fn create(&self, request: &OrgRoleRequest) -> Result<OrgRole, ApiError> {
        self.client.post(ROLES_PATH, request).await
    }

    /// GET /api/v1/orgs/current/roles
    pub async fn list(&self) -> Result<Vec<OrgRole>, ApiError> {
        self.client.get(ROLES_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<OrgRole>, ApiError> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }

    /// PATCH /api/v1/orgs/current/roles/{id}
    pub async fn update(&self, id: &str, request: &OrgRoleRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&format!("{}/{}", ROLES_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/orgs/current/roles/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", ROLES_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Organization role operations
    pub fn org_roles(&self) -> OrgRolesApi<'_> {
        OrgRolesApi::new(self)
    }
}
