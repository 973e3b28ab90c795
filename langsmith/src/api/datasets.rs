//! Dataset API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DATASETS_PATH: &str = "/api/v1/datasets";

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub inputs_schema_definition: Option<Value>,
    #[serde(default)]
    pub outputs_schema_definition: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub example_count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateDatasetRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs_schema_definition: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs_schema_definition: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateDatasetRequest {
    pub name: String,
    pub description: Option<String>,
    pub inputs_schema_definition: Option<Value>,
    pub outputs_schema_definition: Option<Value>,
    pub metadata: Option<Value>,
}

pub struct DatasetsApi<'a> {
    client: &'a Client,
}

impl<'a> DatasetsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/datasets
    pub async fn create(&self, request: &CreateDatasetRequest) -> Result<Dataset, ApiError> {
        self.client.post(DATASETS_PATH, request).await
    }

    /// GET /api/v1/datasets/{id}
    pub async fn get(&self, id: &str) -> Result<Dataset, ApiError> {
        self.client
            .get(&format!("{}/{}", DATASETS_PATH, path_segment(id)), &ApiQueryParams::new())
            .await
    }

    /// GET /api/v1/datasets?name={name}
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Dataset>, ApiError> {
        let datasets: Vec<Dataset> = self
            .client
            .get(DATASETS_PATH, &ApiQueryParams::new().add("name", name))
            .await?;
        Ok(datasets.into_iter().find(|d| d.name == name))
    }

    /// PATCH /api/v1/datasets/{id}
    pub async fn update(&self, id: &str, request: &UpdateDatasetRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&format!("{}/{}", DATASETS_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/datasets/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", DATASETS_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Dataset operations
    pub fn datasets(&self) -> DatasetsApi<'_> {
        DatasetsApi::new(self)
    }
}
