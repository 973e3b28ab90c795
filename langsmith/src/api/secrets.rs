//! Workspace secrets API
//!
//! The endpoint upserts a batch of key/value pairs. Values are never returned
//! and a null value deletes the key.

use super::common::ApiQueryParams;
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const SECRETS_PATH: &str = "/api/v1/workspaces/current/secrets";

#[derive(Debug, Clone, Deserialize)]
pub struct SecretKey {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct SecretUpsert {
    pub key: String,
    pub value: Option<String>,
}

pub struct SecretsApi<'a> {
    client: &'a Client,
}

impl<'a> SecretsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/workspaces/current/secrets
    pub async fn list(&self) -> Result<Vec<SecretKey>, ApiError> {
        self.client.get(SECRETS_PATH, &ApiQueryParams::new()).await
    }

    pub async fn exists(&self, key: &str) -> Result<bool, ApiError> {
        Ok(self.list().await?.iter().any(|s| s.key == key))
    }

    /// POST /api/v1/workspaces/current/secrets
    pub async fn upsert(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.send(SecretUpsert {
            key: key.to_string(),
            value: Some(value.to_string()),
        })
        .await
    }

    /// Upsert with a null value
    pub async fn delete(&self, key: &str) -> Result<(), ApiError> {
        self.send(SecretUpsert {
            key: key.to_string(),
            value: None,
        })
        .await
    }

    async fn send(&self, entry: SecretUpsert) -> Result<(), ApiError> {
        self.client
            .post::<IgnoredAny, _>(SECRETS_PATH, &[entry])
            .await
            .map(|_| ())
    }
}

impl Client {
    /// Workspace secret operations
    pub fn secrets(&self) -> SecretsApi<'_> {
        SecretsApi::new(self)
    }
}
