//! Service account API

use super::common::ApiQueryParams;
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};

const SERVICE_ACCOUNTS_PATH: &str = "/api/v1/service-accounts";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateServiceAccountRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
struct DeleteServiceAccountsRequest<'s> {
    service_account_ids: [&'s str; 1],
}

pub struct ServiceAccountsApi<'a> {
    client: &'a Client,
}

impl<'a> ServiceAccountsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/service-accounts
    pub async fn create(&self, request: &CreateServiceAccountRequest) -> Result<ServiceAccount, ApiError> {
        self.client.post(SERVICE_ACCOUNTS_PATH, request).await
    }

    /// GET /api/v1/service-accounts
    pub async fn list(&self) -> Result<Vec<ServiceAccount>, ApiError> {
        self.client.get(SERVICE_ACCOUNTS_PATH, &ApiQueryParams::new()).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<ServiceAccount>, ApiError> {
        Ok(self.list().await?.into_iter().find(|a| a.id == id))
    }

    /// DELETE /api/v1/service-accounts with the ids in the body
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete_with_body(
                SERVICE_ACCOUNTS_PATH,
                &DeleteServiceAccountsRequest {
                    service_account_ids: [id],
                },
            )
            .await
    }
}

impl Client {
    /// Service account operations
    pub fn service_accounts(&self) -> ServiceAccountsApi<'_> {
        ServiceAccountsApi::new(self)
    }
}
