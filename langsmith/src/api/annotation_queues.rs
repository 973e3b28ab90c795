//! Annotation queue API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const QUEUES_PATH: &str = "/api/v1/annotation-queues";

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationQueue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_dataset: Option<String>,
    #[serde(default)]
    pub num_reviewers_per_item: Option<i64>,
    #[serde(default)]
    pub enable_reservations: Option<bool>,
    #[serde(default)]
    pub reservation_minutes: Option<i64>,
    #[serde(default)]
    pub rubric_instructions: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Shared by create (POST) and update (PATCH)
#[derive(Debug, Serialize)]
pub struct AnnotationQueueRequest {
    pub name: String,
    pub description: Option<String>,
    pub default_dataset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_reviewers_per_item: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_reservations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_minutes: Option<i64>,
    pub rubric_instructions: Option<String>,
}

pub struct AnnotationQueuesApi<'a> {
    client: &'a Client,
}

impl<'a> AnnotationQueuesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/annotation-queues
    pub async fn create(&self, request: &AnnotationQueueRequest) -> Result<AnnotationQueue, ApiError> {
        self.client.post(QUEUES_PATH, request).await
    }

    /// GET /api/v1/annotation-queues/{id}
    pub async fn get(&self, id: &str) -> Result<AnnotationQueue, ApiError> {
        self.client
            .get(&format!("{}/{}", QUEUES_PATH, path_segment(id)), &ApiQueryParams::new())
            .await
    }

    /// PATCH /api/v1/annotation-queues/{id}
    pub async fn update(&self, id: &str, request: &AnnotationQueueRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&format!("{}/{}", QUEUES_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/annotation-queues/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", QUEUES_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Annotation queue operations
    pub fn annotation_queues(&self) -> AnnotationQueuesApi<'_> {
        AnnotationQueuesApi::new(self)
    }
}
