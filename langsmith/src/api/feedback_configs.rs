//! Feedback configuration API

use super::common::ApiQueryParams;
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const FEEDBACK_CONFIGS_PATH: &str = "/api/v1/feedback-configs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCategory {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfigBody {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<FeedbackCategory>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackConfig {
    pub feedback_key: String,
    pub feedback_config: FeedbackConfigBody,
    #[serde(default)]
    pub is_lower_score_better: Option<bool>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateFeedbackConfigRequest {
    pub feedback_key: String,
    pub feedback_config: FeedbackConfigBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_lower_score_better: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UpdateFeedbackConfigRequest {
    pub feedback_key: String,
    pub feedback_config: FeedbackConfigBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_lower_score_better: Option<bool>,
}

pub struct FeedbackConfigsApi<'a> {
    client: &'a Client,
}

impl<'a> FeedbackConfigsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/feedback-configs
    pub async fn create(&self, request: &CreateFeedbackConfigRequest) -> Result<FeedbackConfig, ApiError> {
        self.client.post(FEEDBACK_CONFIGS_PATH, request).await
    }

    /// GET /api/v1/feedback-configs?key={feedback_key}
    pub async fn get(&self, feedback_key: &str) -> Result<Option<FeedbackConfig>, ApiError> {
        let configs: Vec<FeedbackConfig> = self
            .client
            .get(FEEDBACK_CONFIGS_PATH, &ApiQueryParams::new().add("key", feedback_key))
            .await?;
        Ok(configs.into_iter().find(|c| c.feedback_key == feedback_key))
    }

    /// PATCH /api/v1/feedback-configs
    pub async fn update(&self, request: &UpdateFeedbackConfigRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(FEEDBACK_CONFIGS_PATH, request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/feedback-configs?feedback_key={feedback_key}
    pub async fn delete(&self, feedback_key: &str) -> Result<(), ApiError> {
        self.client
            .delete_with_query(
                FEEDBACK_CONFIGS_PATH,
                &ApiQueryParams::new().add("feedback_key", feedback_key),
            )
            .await
    }
}

impl Client {
    /// Feedback configuration operations
    pub fn feedback_configs(&self) -> FeedbackConfigsApi<'_> {
        FeedbackConfigsApi::new(self)
    }
}
