//! LangSmith REST API client and per-domain endpoints

pub mod client;
pub mod common;
pub mod error;

pub mod alerts;
pub mod annotation_queues;
pub mod bulk_exports;
pub mod dataset_examples;
pub mod datasets;
pub mod feedback_configs;
pub mod model_prices;
pub mod org_roles;
pub mod playground_settings;
pub mod projects;
pub mod prompts;
pub mod run_rules;
pub mod secrets;
pub mod service_accounts;
pub mod service_keys;
pub mod sso_settings;
pub mod tags;
pub mod ttl_settings;
pub mod usage_limits;
pub mod webhooks;
pub mod workspaces;

#[cfg(test)]
pub mod test_helpers;

pub use client::{Client, ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use common::ApiQueryParams;
pub use error::ApiError;
