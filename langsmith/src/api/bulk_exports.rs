//! Bulk export API: destinations and export jobs

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

const EXPORTS_PATH: &str = "/api/v1/bulk-exports";
const DESTINATIONS_PATH: &str = "/api/v1/bulk-exports/destinations";

pub const STATUS_CANCELLED: &str = "Cancelled";

/// Export statuses after which cancellation is rejected
pub const TERMINAL_STATUSES: &[&str] = &["Completed", "Failed", "Cancelled", "TimedOut"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DestinationConfig {
    #[serde(default)]
    pub bucket_name: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Destination {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub destination_type: Option<String>,
    #[serde(default)]
    pub config: DestinationConfig,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DestinationConfigRequest {
    pub bucket_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DestinationCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Debug, Serialize)]
pub struct CreateDestinationRequest {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_type: Option<String>,
    pub config: DestinationConfigRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<DestinationCredentials>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkExport {
    pub id: String,
    pub bulk_export_destination_id: String,
    pub session_id: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub compression: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl BulkExport {
    pub fn is_terminal(&self) -> bool {
        self.status
            .as_deref()
            .map_or(false, |s| TERMINAL_STATUSES.contains(&s))
    }
}

#[derive(Debug, Serialize)]
pub struct CreateBulkExportRequest {
    pub bulk_export_destination_id: String,
    pub session_id: String,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusUpdate<'s> {
    status: &'s str,
}

pub struct BulkExportsApi<'a> {
    client: &'a Client,
}

impl<'a> BulkExportsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /api/v1/bulk-exports/destinations
    pub async fn create_destination(&self, request: &CreateDestinationRequest) -> Result<Destination, ApiError> {
        self.client.post(DESTINATIONS_PATH, request).await
    }

    /// GET /api/v1/bulk-exports/destinations/{id}
    pub async fn get_destination(&self, id: &str) -> Result<Destination, ApiError> {
        self.client
            .get(&format!("{}/{}", DESTINATIONS_PATH, path_segment(id)), &ApiQueryParams::new())
            .await
    }

    /// POST /api/v1/bulk-exports
    pub async fn create(&self, request: &CreateBulkExportRequest) -> Result<BulkExport, ApiError> {
        self.client.post(EXPORTS_PATH, request).await
    }

    /// GET /api/v1/bulk-exports/{id}
    pub async fn get(&self, id: &str) -> Result<BulkExport, ApiError> {
        self.client
            .get(&format!("{}/{}", EXPORTS_PATH, path_segment(id)), &ApiQueryParams::new())
            .await
    }

    /// PATCH /api/v1/bulk-exports/{id} with status `Cancelled`
    pub async fn cancel(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(
                &format!("{}/{}", EXPORTS_PATH, path_segment(id)),
                &StatusUpdate {
                    status: STATUS_CANCELLED,
                },
            )
            .await
            .map(|_| ())
    }
}

impl Client {
    /// Bulk export operations
    pub fn bulk_exports(&self) -> BulkExportsApi<'_> {
        BulkExportsApi::new(self)
    }
}
