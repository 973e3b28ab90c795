//! Organization SSO (SAML) settings API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const SSO_SETTINGS_PATH: &str = "/api/v1/orgs/current/sso-settings";

#[derive(Debug, Clone, Deserialize)]
pub struct SsoSettings {
    pub id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub metadata_url: Option<String>,
    #[serde(default)]
    pub metadata_xml: Option<String>,
    #[serde(default)]
    pub default_workspace_ids: Vec<String>,
    #[serde(default)]
    pub default_workspace_role_id: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SsoSettingsRequest {
    pub metadata_url: Option<String>,
    pub metadata_xml: Option<String>,
    pub default_workspace_ids: Vec<String>,
    pub default_workspace_role_id: String,
}

pub struct SsoSettingsApi<'a> {
    client: &'a Client,
}

impl<'a> SsoSettingsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/orgs/current/sso-settings
    pub async fn create(&self, request: &SsoSettingsRequest) -> Result<SsoSettings, ApiError> {
        self.client.post(SSO_SETTINGS_PATH, request).await
    }

    /// GET /api/v1/orgs/current/sso-settings
    pub async fn list(&self) -> Result<Vec<SsoSettings>, ApiError> {
        self.client.get(SSO_SETTINGS_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<SsoSettings>, ApiError> {
        Ok(self.list().await?.into_iter().find(|s| s.id == id))
    }

    /// PATCH /api/v1/orgs/current/sso-settings/{id}
    pub async fn update(&self, id: &str, request: &SsoSettingsRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&format!("{}/{}", SSO_SETTINGS_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/orgs/current/sso-settings/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", SSO_SETTINGS_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// SSO settings operations
    pub fn sso_settings(&self) -> SsoSettingsApi<'_> {
        SsoSettingsApi::new(self)
    }
}
