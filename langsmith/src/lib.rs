pub mod api;
pub mod common;
pub mod data_sources;
pub mod provider_data;
pub mod resources;

use async_trait::async_trait;
use provider_data::LangSmithProviderData;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic};
use tfplug::{DataSourceWithConfigure, ResourceWithConfigure};

pub const API_KEY_ENV: &str = "LANGSMITH_API_KEY";
pub const API_URL_ENV: &str = "LANGSMITH_API_URL";
pub const TENANT_ID_ENV: &str = "LANGSMITH_TENANT_ID";

#[derive(Default)]
pub struct LangSmithProvider {
    provider_data: Option<LangSmithProviderData>,
}

impl LangSmithProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider data handed out by the last successful configure
    pub fn provider_data(&self) -> Option<&LangSmithProviderData> {
        self.provider_data.as_ref()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn resource<R>() -> ResourceFactory
where
    R: ResourceWithConfigure + Default + 'static,
{
    Box::new(|| Box::new(R::default()) as Box<dyn ResourceWithConfigure>)
}

fn data_source<D>() -> DataSourceFactory
where
    D: DataSourceWithConfigure + Default + 'static,
{
    Box::new(|| Box::new(D::default()) as Box<dyn DataSourceWithConfigure>)
}

#[async_trait]
impl Provider for LangSmithProvider {
    fn type_name(&self) -> &str {
        "langsmith"
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Terraform provider for LangSmith")
            .attribute(
                AttributeBuilder::new("api_key", AttributeType::String)
                    .description("LangSmith API key. Defaults to LANGSMITH_API_KEY.")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("api_url", AttributeType::String)
                    .description("LangSmith API URL. Defaults to LANGSMITH_API_URL, then the hosted API.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tenant_id", AttributeType::String)
                    .description("Workspace ID sent with every request. Defaults to LANGSMITH_TENANT_ID.")
                    .optional()
                    .build(),
            )
            .build();

        ProviderSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let config = &request.config;

        let api_key = config.string_attr("api_key").or_else(|| env_var(API_KEY_ENV));
        let api_url = config
            .string_attr("api_url")
            .or_else(|| env_var(API_URL_ENV))
            .unwrap_or_else(|| api::DEFAULT_API_URL.to_string());
        let tenant_id = config.string_attr("tenant_id").or_else(|| env_var(TENANT_ID_ENV));

        let Some(api_key) = api_key else {
            return ConfigureProviderResponse {
                diagnostics: vec![Diagnostic::error(
                    "Missing API key",
                    format!(
                        "api_key is required (set in provider config or {} env var)",
                        API_KEY_ENV
                    ),
                )
                .with_attribute(AttributePath::new("api_key"))],
                provider_data: None,
            };
        };

        let client_config = api::ClientConfig::new(api_key)
            .with_api_url(api_url)
            .with_tenant_id(tenant_id);

        match api::Client::with_config(client_config) {
            Ok(client) => {
                tracing::debug!(api_url = %client.base_url(), "Configured LangSmith client");
                let data = LangSmithProviderData::new(client);
                self.provider_data = Some(data.clone());
                ConfigureProviderResponse {
                    diagnostics: vec![],
                    provider_data: Some(Arc::new(data)),
                }
            }
            Err(e) => ConfigureProviderResponse {
                diagnostics: vec![Diagnostic::error(
                    "Failed to create API client",
                    e.to_string(),
                )],
                provider_data: None,
            },
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let factories = [
            ("langsmith_project", resource::<resources::ProjectResource>()),
            ("langsmith_dataset", resource::<resources::DatasetResource>()),
            ("langsmith_example", resource::<resources::ExampleResource>()),
            ("langsmith_annotation_queue", resource::<resources::AnnotationQueueResource>()),
            ("langsmith_prompt", resource::<resources::PromptResource>()),
            ("langsmith_prompt_commit", resource::<resources::PromptCommitResource>()),
            ("langsmith_run_rule", resource::<resources::RunRuleResource>()),
            ("langsmith_secret", resource::<resources::SecretResource>()),
            ("langsmith_webhook", resource::<resources::WebhookResource>()),
            ("langsmith_workspace", resource::<resources::WorkspaceResource>()),
            ("langsmith_tag_key", resource::<resources::TagKeyResource>()),
            ("langsmith_tag_value", resource::<resources::TagValueResource>()),
            ("langsmith_ttl_settings", resource::<resources::TtlSettingsResource>()),
            ("langsmith_usage_limit", resource::<resources::UsageLimitResource>()),
            (
                "langsmith_bulk_export_destination",
                resource::<resources::BulkExportDestinationResource>(),
            ),
            ("langsmith_bulk_export", resource::<resources::BulkExportResource>()),
            ("langsmith_feedback_config", resource::<resources::FeedbackConfigResource>()),
            ("langsmith_model_price", resource::<resources::ModelPriceResource>()),
            ("langsmith_alert_rule", resource::<resources::AlertRuleResource>()),
            ("langsmith_org_role", resource::<resources::OrgRoleResource>()),
            ("langsmith_service_key", resource::<resources::ServiceKeyResource>()),
            ("langsmith_service_account", resource::<resources::ServiceAccountResource>()),
            (
                "langsmith_playground_settings",
                resource::<resources::PlaygroundSettingsResource>(),
            ),
            ("langsmith_sso_settings", resource::<resources::SsoSettingsResource>()),
        ];

        factories
            .into_iter()
            .map(|(name, factory)| (name.to_string(), factory))
            .collect()
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let factories = [
            ("langsmith_project", data_source::<data_sources::ProjectDataSource>()),
            ("langsmith_dataset", data_source::<data_sources::DatasetDataSource>()),
            ("langsmith_workspace", data_source::<data_sources::WorkspaceDataSource>()),
            ("langsmith_prompt", data_source::<data_sources::PromptDataSource>()),
            ("langsmith_prompt_commit", data_source::<data_sources::PromptCommitDataSource>()),
            ("langsmith_tag_key", data_source::<data_sources::TagKeyDataSource>()),
        ];

        factories
            .into_iter()
            .map(|(name, factory)| (name.to_string(), factory))
            .collect()
    }
}
