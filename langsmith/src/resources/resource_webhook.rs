//! Prompt webhook resource implementation

use crate::api::webhooks::{Webhook, WebhookRequest};
use crate::common;
use crate::provider_data::LangSmithProviderData;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceSchemaRequest, ResourceSchemaResponse,
    ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

#[derive(Default)]
pub struct WebhookResource {
    provider_data: Option<LangSmithProviderData>,
}

impl WebhookResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers are write-only and carried over from `prior`
    fn to_state(webhook: &Webhook, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", webhook.id.as_str());
        state.set_attr("url", webhook.url.as_str());
        state.copy_attr("headers", prior);
        state.set_attr(
            "include_prompts",
            webhook.include_prompts.clone().filter(|p| !p.is_empty()),
        );
        state.set_attr(
            "exclude_prompts",
            webhook.exclude_prompts.clone().filter(|p| !p.is_empty()),
        );
        state.set_attr("triggers", webhook.triggers.clone());
        state.set_attr("created_at", webhook.created_at.clone());
        state.set_attr("updated_at", webhook.updated_at.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<WebhookRequest, Diagnostic> {
        Ok(WebhookRequest {
            url: common::required_string(config, "url")?,
            headers: config.string_map_attr("headers"),
            include_prompts: config.string_list_attr("include_prompts"),
            exclude_prompts: config.string_list_attr("exclude_prompts"),
            triggers: config.string_list_attr("triggers"),
        })
    }

    async fn create_webhook(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let webhook = client
            .webhooks()
            .create(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "webhook", &e))?;
        tracing::debug!(id = %webhook.id, "Created prompt webhook");

        Ok(Self::to_state(&webhook, config))
    }

    async fn read_webhook(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let webhook = common::found(client.webhooks().get(&id).await)
            .map_err(|e| common::api_error("read", "webhook", &e))?;

        Ok(webhook.map(|w| Self::to_state(&w, state)))
    }

    async fn update_webhook(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        client
            .webhooks()
            .update(&id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "webhook", &e))?;

        let webhook = client
            .webhooks()
            .get(&id)
            .await
            .map_err(|e| common::api_error("read", "webhook", &e))?;

        Ok(Self::to_state(&webhook, config))
    }

    async fn delete_webhook(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.webhooks().delete(&id).await)
            .map_err(|e| common::api_error("delete", "webhook", &e))
    }
}

#[async_trait]
impl Resource for WebhookResource {
    fn type_name(&self) -> &str {
        "langsmith_webhook"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let string_list = || AttributeType::List(Box::new(AttributeType::String));

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a webhook notified when prompts are committed")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("url", AttributeType::String)
                    .description("Endpoint that receives webhook deliveries")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("headers", AttributeType::Map(Box::new(AttributeType::String)))
                    .description("Headers sent with each delivery")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("include_prompts", string_list())
                    .description("Only notify for these prompts")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("exclude_prompts", string_list())
                    .description("Never notify for these prompts")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("triggers", string_list())
                    .description("Events that fire the webhook")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("created_at", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("updated_at", AttributeType::String)
                    .computed()
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_webhook(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_webhook(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_webhook(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_webhook(&request.prior_state).await {
            Ok(()) => DeleteResourceResponse::ok(),
            Err(diag) => DeleteResourceResponse::with_diagnostic(diag),
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        common::import_by_id(&ctx, &request)
    }
}

#[async_trait]
impl ResourceWithConfigure for WebhookResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        ConfigureResourceResponse {
            diagnostics: common::configure(request.provider_data, &mut self.provider_data),
        }
    }
}
