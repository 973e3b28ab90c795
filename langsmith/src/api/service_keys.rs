//! API key management

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

const API_KEYS_PATH: &str = "/api/v1/api-key";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceKey {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Truncated key shown in listings
    #[serde(default)]
    pub short_key: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_used_at: Option<String>,
}

/// Create response; the full key is only returned here
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedServiceKey {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_key: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateServiceKeyRequest {
    pub description: String,
}

pub struct ServiceKeysApi<'a> {
    client: &'a Client,
}

impl<'a> ServiceKeysApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/api-key
    pub async fn create(&self, request: &CreateServiceKeyRequest) -> Result<CreatedServiceKey, ApiError> {
        self.client.post(API_KEYS_PATH, request).await
    }

    /// GET /api/v1/api-key
    pub async fn list(&self) -> Result<Vec<ServiceKey>, ApiError> {
        self.client.get(API_KEYS_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<ServiceKey>, ApiError> {
        Ok(self.list().await?.into_iter().find(|k| k.id == id))
    }

    /// DELETE /api/v1/api-key/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", API_KEYS_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// API key operations
    pub fn service_keys(&self) -> ServiceKeysApi<'_> {
        ServiceKeysApi::new(self)
    }
}
