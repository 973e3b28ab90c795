//! Playground settings API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const PLAYGROUND_SETTINGS_PATH: &str = "/api/v1/playground-settings";

#[derive(Debug, Clone, Deserialize)]
pub struct PlaygroundSettings {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub settings: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaygroundSettingsRequest {
    pub name: String,
    pub description: Option<String>,
    pub settings: Value,
}

pub struct PlaygroundSettingsApi<'a> {
    client: &'a Client,
}

impl<'a> PlaygroundSettingsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/playground-settings
    pub async fn create(&self, request: &PlaygroundSettingsRequest) -> Result<PlaygroundSettings, ApiError> {
        self.client.post(PLAYGROUND_SETTINGS_PATH, request).await
    }

    /// GET /api/v1/playground-settings
    pub async fn list(&self) -> Result<Vec<PlaygroundSettings>, ApiError> {
        self.client
            .get(PLAYGROUND_SETTINGS_PATH, &ApiQueryParams::new())
            .await
    }

    pub async fn find(&self, id: &str) -> Result<Option<PlaygroundSettings>, ApiError> {
        Ok(self.list().await?.into_iter().find(|s| s.id == id))
    }

    /// PATCH /api/v1/playground-settings/{id}
    pub async fn update(&self, id: &str, request: &PlaygroundSettingsRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(
                &format!("{}/{}", PLAYGROUND_SETTINGS_PATH, path_segment(id)),
                request,
            )
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/playground-settings/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", PLAYGROUND_SETTINGS_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Playground settings operations
    pub fn playground_settings(&self) -> PlaygroundSettingsApi<'_> {
        PlaygroundSettingsApi::new(self)
    }
}
