//! Model price map API

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const MODEL_PRICES_PATH: &str = "/api/v1/model-price-map";

#[derive(Debug, Clone, Deserialize)]
pub struct ModelPrice {
    pub id: String,
    pub name: String,
    pub match_pattern: String,
    #[serde(default)]
    pub prompt_cost: Option<f64>,
    #[serde(default)]
    pub completion_cost: Option<f64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub match_path: Option<Vec<String>>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Shared by create (POST) and update (PUT)
#[derive(Debug, Serialize)]
pub struct ModelPriceRequest {
    pub name: String,
    pub match_pattern: String,
    pub prompt_cost: f64,
    pub completion_cost: f64,
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_path: Option<Vec<String>>,
    pub provider: Option<String>,
}

pub struct ModelPricesApi<'a> {
    client: &'a Client,
}

impl<'a> ModelPricesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/model-price-map
    pub async fn create(&self, request: &ModelPriceRequest) -> Result<ModelPrice, ApiError> {
        self.client.post(MODEL_PRICES_PATH, request).await
    }

    /// GET /api/v1/model-price-map
    pub async fn list(&self) -> Result<Vec<ModelPrice>, ApiError> {
        self.client.get(MODEL_PRICES_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<ModelPrice>, ApiError> {
        Ok(self.list().await?.into_iter().find(|p| p.id == id))
    }

    /// PUT /api/v1/model-price-map/{id}
    pub async fn update(&self, id: &str, request: &ModelPriceRequest) -> Result<(), ApiError> {
        self.client
            .put::<IgnoredAny, _>(&format!("{}/{}", MODEL_PRICES_PATH, path_segment(id)), request)
            .await
            .map(|_| ())
    }

    /// DELETE /api/v1/model-price-map/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", MODEL_PRICES_PATH, path_segment(id)))
            .await
    }
}

impl Client {
    /// Model price map operations
    pub fn model_prices(&self) -> ModelPricesApi<'_> {
        ModelPricesApi::new(self)
    }
}
