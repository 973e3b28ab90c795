//! Usage limit API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

const USAGE_LIMITS_PATH: &str = "/api/v1/usage-limits";

#[derive(Debug, Clone, Deserialize)]
pub struct UsageLimit {
    pub id: String,
    pub limit_type: String,
    pub limit_value: i64,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// PUT upserts; sending the id updates an existing limit
#[derive(Debug, Serialize)]
pub struct UsageLimitRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub limit_type: String,
    pub limit_value: i64,
}

pub struct UsageLimitsApi<'a> {
    client: &'a Client,
}

impl<'a> UsageLimitsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// PUT /api/v1/usage-limits
    pub async fn upsert(&self, request: &UsageLimitRequest) -> Result<UsageLimit, ApiError> {
        self.client.put(USAGE_LIMITS_PATH, request).await
    }

    /// GET /api/v1/usage-limits
    pub async fn list(&self) -> Result<Vec<UsageLimit>, ApiError> {
        self.client.get(USAGE_LIMITS_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<UsageLimit>, ApiError> {
        Ok(self.list().await?.into_iter().find(|l| l.id == id))
    }

    /// DELETE /api/v1/usage-limits/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", USAGE_LIMITS_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Usage limit operations
    pub fn usage_limits(&self) -> UsageLimitsApi<'_> {
        UsageLimitsApi::new(self)
    }
}
