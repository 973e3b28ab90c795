//! Run rule (automation) API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const RULES_PATH: &str = "/api/v1/runs/rules";

#[derive(Debug, Clone, Deserialize)]
pub struct RunRule {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub sampling_rate: Option<f64>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub trace_filter: Option<String>,
    #[serde(default)]
    pub tree_filter: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default)]
    pub add_to_annotation_queue_id: Option<String>,
    #[serde(default)]
    pub add_to_dataset_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Shared by create and update; the endpoint takes the full rule each time
#[derive(Debug, Serialize)]
pub struct RunRuleRequest {
    pub display_name: String,
    pub session_id: Option<String>,
    pub dataset_id: Option<String>,
    pub sampling_rate: f64,
    pub filter: Option<String>,
    pub trace_filter: Option<String>,
    pub tree_filter: Option<String>,
    pub is_enabled: bool,
    pub add_to_annotation_queue_id: Option<String>,
    pub add_to_dataset_id: Option<String>,
}

pub struct RunRulesApi<'a> {
    client: &'a Client,
}

impl<'a> RunRulesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/runs/rules
    pub async fn create(&self, request: &RunRuleRequest) -> Result<RunRule, ApiError> {
        self.client.post(RULES_PATH, request).await
    }

    /// GET /api/v1/runs/rules
    pub async fn list(&self) -> Result<Vec<RunRule>, ApiError> {
        self.client.get(RULES_PATH, &ApiQueryParams::new()).await
    }

    /// No item-level GET exists, so the list is scanned
    pub async fn find(&self, id: &str) -> Result<Option<RunRule>, ApiError> {
        Ok(self.list().await?.into_iter().find(|rule| rule.id == id))
    }

    /// PATCH /api/v1/runs/rules/{id}
    pub async fn update(&self, id: &str, request: &RunRuleRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&format!("{}/{}", RULES_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/runs/rules/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", RULES_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Run rule operations
    pub fn run_rules(&self) -> RunRulesApi<'_> {
        RunRulesApi::new(self)
    }
}
