//! Project (tracer session) API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SESSIONS_PATH: &str = "/api/v1/sessions";

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extra: Option<Value>,
    #[serde(default)]
    pub reference_dataset_id: Option<String>,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dataset_id: Option<String>,
}

/// PATCH body; None fields are sent as null so they can be cleared
#[derive(Debug, Serialize)]
pub struct UpdateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub extra: Option<Value>,
    pub default_dataset_id: Option<String>,
}

pub struct ProjectsApi<'a> {
    client: &'a Client,
}

impl<'a> ProjectsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/sessions
    pub async fn create(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        self.client.post(SESSIONS_PATH, request).await
    }

    /// GET /api/v1/sessions/{id}
    pub async fn get(&self, id: &str) -> Result<Project, ApiError> {
        self.client
            .get(&format!("{}/{}", SESSIONS_PATH, path_segment(id)), &ApiQueryParams::new())
            .await
    }

    /// GET /api/v1/sessions?name={name}
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Project>, ApiError> {
        let projects: Vec<Project> = self
            .client
            .get(SESSIONS_PATH, &ApiQueryParams::new().add("name", name))
            .await?;
        Ok(projects.into_iter().find(|p| p.name == name))
    }

    /// PATCH /api/v1/sessions/{id}
    pub async fn update(&self, id: &str, request: &UpdateProjectRequest) -> Result<(), ApiError> {
        self.client
            .patch::<serde::de::IgnoredAny, _>(&format!("{}/{}", SESSIONS_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/sessions/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", SESSIONS_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Project operations
    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi::new(self)
    }
}
