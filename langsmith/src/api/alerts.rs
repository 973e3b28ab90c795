//! Project alert rule API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ALERTS_PATH: &str = "/v1/platform/alerts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRuleBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub attribute: String,
    pub aggregation: String,
    pub operator: String,
    pub threshold: f64,
    pub window_minutes: i64,
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertRule {
    pub rule: AlertRuleBody,
    #[serde(default)]
    pub actions: Vec<Value>,
}

impl AlertRule {
    pub fn id(&self) -> Option<&str> {
        self.rule.id.as_deref()
    }
}

#[derive(Debug, Serialize)]
pub struct AlertRuleRequest {
    pub rule: AlertRuleBody,
    pub actions: Vec<Value>,
}

pub struct AlertsApi<'a> {
    client: &'a Client,
}

impl<'a> AlertsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn session_path(session_id: &str) -> String {
        format!("{}/{}", ALERTS_PATH, path_segment(session_id))
    }

    fn rule_path(session_id: &str, id: &str) -> String {
        format!("{}/{}", Self::session_path(session_id), path_segment(id))
    }

    /// POST /v1/platform/alerts/{session_id}
    pub async fn create(&self, session_id: &str, request: &AlertRuleRequest) -> Result<AlertRule, ApiError> {
        self.client.post(&Self::session_path(session_id), request).await
    }

    /// GET /v1/platform/alerts/{session_id}/{id}
    pub async fn get(&self, session_id: &str, id: &str) -> Result<AlertRule, ApiError> {
        self.client
            .get(&Self::rule_path(session_id, id), &ApiQueryParams::new())
            .await
    }

    /// PATCH /v1/platform/alerts/{session_id}/{id}
    pub async fn update(&self, session_id: &str, id: &str, request: &AlertRuleRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&Self::rule_path(session_id, id), request)
            .await
            .map(|_| ())
    }

    /// DELETE /v1/platform/alerts/{session_id}/{id}
    pub async fn delete(&self, session_id: &str, id: &str) -> Result<(), ApiError> {
        self.client.delete(&Self::rule_path(session_id, id)).await
    }
}

impl Client {
    /// Alert rule operations
    pub fn alerts(&self) -> AlertsApi<'_> {
        AlertsApi::new(self)
    }
}
