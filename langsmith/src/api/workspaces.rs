//! Workspace API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const WORKSPACES_PATH: &str = "/api/v1/workspaces";

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub tenant_handle: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub is_personal: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateWorkspaceRequest {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_handle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateWorkspaceRequest {
    pub display_name: String,
}

pub struct WorkspacesApi<'a> {
    client: &'a Client,
}

impl<'a> WorkspacesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/workspaces
    pub async fn create(&self, request: &CreateWorkspaceRequest) -> Result<Workspace, ApiError> {
        self.client.post(WORKSPACES_PATH, request).await
    }

    /// GET /api/v1/workspaces
    pub async fn list(&self) -> Result<Vec<Workspace>, ApiError> {
        self.client.get(WORKSPACES_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<Workspace>, ApiError> {
        Ok(self.list().await?.into_iter().find(|w| w.id == id))
    }

    pub async fn find_by_display_name(&self, display_name: &str) -> Result<Option<Workspace>, ApiError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|w| w.display_name == display_name))
    }

    /// PATCH /api/v1/workspaces/{id}
    pub async fn update(&self, id: &str, request: &UpdateWorkspaceRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&format!("{}/{}", WORKSPACES_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/workspaces/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", WORKSPACES_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Workspace operations
    pub fn workspaces(&self) -> WorkspacesApi<'_> {
        WorkspacesApi::new(self)
    }
}
