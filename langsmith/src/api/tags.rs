//! Resource tag keys and values

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const TAG_KEYS_PATH: &str = "/api/v1/workspaces/current/tag-keys";

#[derive(Debug, Clone, Deserialize)]
pub struct TagKey {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TagKeyRequest {
    pub key: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagValue {
    pub id: String,
    #[serde(default)]
    pub tag_key_id: Option<String>,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TagValueRequest {
    pub value: String,
    pub description: Option<String>,
}

pub struct TagsApi<'a> {
    client: &'a Client,
}

impl<'a> TagsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn key_path(tag_key_id: &str) -> String {
        format!("{}/{}", TAG_KEYS_PATH, path_segment(tag_key_id))
    }

    fn value_path(tag_key_id: &str, tag_value_id: &str) -> String {
        format!("{}/tag-values/{}", Self::key_path(tag_key_id), path_segment(tag_value_id))
    }

    /// POST /api/v1/workspaces/current/tag-keys
    pub async fn create_key(&self, request: &TagKeyRequest) -> Result<TagKey, ApiError> {
        self.client.post(TAG_KEYS_PATH, request).await
    }

    /// GET /api/v1/workspaces/current/tag-keys/{id}
    pub async fn get_key(&self, id: &str) -> Result<TagKey, ApiError> {
        self.client.get(&Self::key_path(id), &ApiQueryParams::new()).await
    }

    /// GET /api/v1/workspaces/current/tag-keys
    pub async fn list_keys(&self) -> Result<Vec<TagKey>, ApiError> {
        self.client.get(TAG_KEYS_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find_key(&self, key: &str) -> Result<Option<TagKey>, ApiError> {
        Ok(self.list_keys().await?.into_iter().find(|k| k.key == key))
    }

    /// PATCH /api/v1/workspaces/current/tag-keys/{id}
    pub async fn update_key(&self, id: &str, request: &TagKeyRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&Self::key_path(id), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/workspaces/current/tag-keys/{id}
    pub async fn delete_key(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&Self::key_path(id)).await
    }

    /// POST /api/v1/workspaces/current/tag-keys/{tag_key_id}/tag-values
    pub async fn create_value(&self, tag_key_id: &str, request: &TagValueRequest) -> Result<TagValue, ApiError> {
        self.client
            .post(&format!("{}/tag-values", Self::key_path(tag_key_id)), request)
            .await
    }

    /// GET /api/v1/workspaces/current/tag-keys/{tag_key_id}/tag-values/{id}
    pub async fn get_value(&self, tag_key_id: &str, id: &str) -> Result<TagValue, ApiError> {
        self.client
            .get(&Self::value_path(tag_key_id, id), &ApiQueryParams::new())
            .await
    }

    /// PATCH /api/v1/workspaces/current/tag-keys/{tag_key_id}/tag-values/{id}
    pub async fn update_value(&self, tag_key_id: &str, id: &str, request: &TagValueRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&Self::value_path(tag_key_id, id), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/workspaces/current/tag-keys/{tag_key_id}/tag-values/{id}
    pub async fn delete_value(&self, tag_key_id: &str, id: &str) -> Result<(), ApiError> {
        self.client.delete(&Self::value_path(tag_key_id, id)).await
    }
}

impl Client {
    /// Tag key and value operations
    pub fn tags(&self) -> TagsApi<'_> {
        TagsApi::new(self)
    }
}
