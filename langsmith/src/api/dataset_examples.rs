//! Dataset example API

use super::common::{deserialize_string_or_list, path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const EXAMPLES_PATH: &str = "/api/v1/examples";

#[derive(Debug, Clone, Deserialize)]
pub struct Example {
    pub id: String,
    pub dataset_id: String,
    #[serde(default)]
    pub inputs: Option<Value>,
    #[serde(default)]
    pub outputs: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Older API versions return a single split name
    #[serde(default, deserialize_with = "deserialize_string_or_list")]
    pub split: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateExampleRequest {
    pub dataset_id: String,
    pub inputs: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UpdateExampleRequest {
    pub inputs: Value,
    pub outputs: Option<Value>,
    pub metadata: Option<Value>,
    pub split: Option<Vec<String>>,
}

pub struct ExamplesApi<'a> {
    client: &'a Client,
}

impl<'a> ExamplesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/examples
    pub async fn create(&self, request: &CreateExampleRequest) -> Result<Example, ApiError> {
        self.client.post(EXAMPLES_PATH, request).await
    }

    /// GET /api/v1/examples/{id}
    pub async fn get(&self, id: &str) -> Result<Example, ApiError> {
        self.client
            .get(&format!("{}/{}", EXAMPLES_PATH, path_segment(id)), &ApiQueryParams::new())
            .await
    }

    /// PATCH /api/v1/examples/{id}
    pub async fn update(&self, id: &str, request: &UpdateExampleRequest) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&format!("{}/{}", EXAMPLES_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/examples/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", EXAMPLES_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Dataset example operations
    pub fn examples(&self) -> ExamplesApi<'_> {
        ExamplesApi::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::create_test_client;
    use mockito::Server;

    #[tokio::test]
    async fn get_accepts_single_split_string() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/examples/e1")
            .with_body(r#"{"id":"e1","dataset_id":"d1","inputs":{"q":"hi"},"split":"base"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let example = client.examples().get("e1").await.unwrap();

        assert_eq!(example.split, Some(vec!["base".to_string()]));
        assert_eq!(example.dataset_id, "d1");
        assert!(example.outputs.is_none());
        mock.assert_async().await;
    }
}
