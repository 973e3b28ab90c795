//! Trace retention (TTL) settings API

use super::common::ApiQueryParams;
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

const TTL_SETTINGS_PATH: &str = "/api/v1/ttl-settings";

pub const TRACE_TIERS: &[&str] = &["longlived", "shortlived"];

#[derive(Debug, Clone, Deserialize)]
pub struct TtlSettings {
    pub id: String,
    pub default_trace_tier: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub apply_to_all_projects: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TtlSettingsRequest {
    pub default_trace_tier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_to_all_projects: Option<bool>,
}

pub struct TtlSettingsApi<'a> {
    client: &'a Client,
}

impl<'a> TtlSettingsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// PUT /api/v1/ttl-settings
    pub async fn upsert(&self, request: &TtlSettingsRequest) -> Result<TtlSettings, ApiError> {
        self.client.put(TTL_SETTINGS_PATH, request).await
    }

    /// GET /api/v1/ttl-settings
    pub async fn list(&self) -> Result<Vec<TtlSettings>, ApiError> {
        self.client.get(TTL_SETTINGS_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<TtlSettings>, ApiError> {
        Ok(self.list().await?.into_iter().find(|s| s.id == id))
    }
}

impl Client {
    /// TTL settings operations
    pub fn ttl_settings(&self) -> TtlSettingsApi<'_> {
        TtlSettingsApi::new(self)
    }
}
