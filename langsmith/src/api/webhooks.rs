//! Prompt webhook API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const WEBHOOKS_PATH: &str = "/api/v1/prompt-webhooks";

#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub include_prompts: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_prompts: Option<Vec<String>>,
    #[serde(default)]
    pub triggers: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    pub include_prompts: Option<Vec<String>>,
    pub exclude_prompts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<String>>,
}

pub struct WebhooksApi<'a> {
    client: &'a Client,
}

impl<'a> WebhooksApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/prompt-webhooks
    pub async fn create(&self, request: &WebhookRequest) -> Result<Webhook, ApiError> {
        self.client.post(WEBHOOKS_PATH, request).await
    }

    /// GET /api/v1/prompt-webhooks/{id}
    pub async fn get(&self, id: &str) -> Result<Webhook, ApiError> {
        self.client
            .get(&format!("{}/{}", WEBHOOKS_PATH, path_segment(id)), &ApiQueryParams::new())
            .await
    }

    /// PATCH /api/v1/prompt-webhooks/{id}
    pub async fn update(&self, id: &str, request: &WebhookRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&format!("{}/{}", WEBHOOKS_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/prompt-webhooks/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", WEBHOOKS_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Prompt webhook operations
    pub fn webhooks(&self) -> WebhooksApi<'_> {
        WebhooksApi::new(self)
    }
}
