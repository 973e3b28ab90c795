//! Run rule (automation) resource implementation

use crate::api::run_rules::{RunRule, RunRuleRequest};
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
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

#[derive(Default)]
pub struct RunRuleResource {
    provider_data: Option<LangSmithProviderData>,
}

impl RunRuleResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(rule: &RunRule) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", rule.id.as_str());
        state.set_attr("display_name", rule.display_name.as_str());
        state.set_attr("session_id", rule.session_id.clone());
        state.set_attr("dataset_id", rule.dataset_id.clone());
        state.set_attr("sampling_rate", rule.sampling_rate.unwrap_or(1.0));
        state.set_attr("filter", common::non_empty(rule.filter.clone()));
        state.set_attr("trace_filter", common::non_empty(rule.trace_filter.clone()));
        state.set_attr("tree_filter", common::non_empty(rule.tree_filter.clone()));
        state.set_attr("is_enabled", rule.is_enabled.unwrap_or(true));
        state.set_attr(
            "add_to_annotation_queue_id",
            rule.add_to_annotation_queue_id.clone(),
        );
        state.set_attr("add_to_dataset_id", rule.add_to_dataset_id.clone());
        state.set_attr("created_at", rule.created_at.clone());
        state.set_attr("updated_at", rule.updated_at.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<RunRuleRequest, Diagnostic> {
        Ok(RunRuleRequest {
            display_name: common::required_string(config, "display_name")?,
            session_id: config.string_attr("session_id"),
            dataset_id: config.string_attr("dataset_id"),
            sampling_rate: config.number_attr("sampling_rate").unwrap_or(1.0),
            filter: config.string_attr("filter"),
            trace_filter: config.string_attr("trace_filter"),
            tree_filter: config.string_attr("tree_filter"),
            is_enabled: config.bool_attr("is_enabled").unwrap_or(true),
            add_to_annotation_queue_id: config.string_attr("add_to_annotation_queue_id"),
            add_to_dataset_id: config.string_attr("add_to_dataset_id"),
        })
    }

    async fn fetch(&self, id: &str) -> Result<Option<RunRule>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        client
            .run_rules()
            .find(id)
            .await
            .map_err(|e| common::api_error("read", "run rule", &e))
    }

    async fn create_rule(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let rule = client
            .run_rules()
            .create(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "run rule", &e))?;
        tracing::debug!(id = %rule.id, display_name = %rule.display_name, "Created run rule");

        Ok(Self::to_state(&rule))
    }

    async fn read_rule(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = common::state_id(state)?;
        Ok(self.fetch(&id).await?.as_ref().map(Self::to_state))
    }

    async fn update_rule(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        client
            .run_rules()
            .update(&id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "run rule", &e))?;

        let rule = self.fetch(&id).await?.ok_or_else(|| {
            Diagnostic::error(
                "Failed to read run rule",
                format!("Run rule {} disappeared after update", id),
            )
        })?;

        Ok(Self::to_state(&rule))
    }

    async fn delete_rule(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.run_rules().delete(&id).await)
            .map_err(|e| common::api_error("delete", "run rule", &e))
    }
}

#[async_trait]
impl Resource for RunRuleResource {
    fn type_name(&self) -> &str {
        "langsmith_run_rule"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a LangSmith run rule that samples runs into datasets or queues")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The rule ID")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("display_name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("session_id", AttributeType::String)
                    .description("Project whose runs the rule applies to")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("dataset_id", AttributeType::String)
                    .description("Dataset whose experiment runs the rule applies to")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("sampling_rate", AttributeType::Number)
                    .description("Fraction of matching runs to act on, between 0 and 1")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("filter", AttributeType::String)
                    .description("Run filter expression")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("trace_filter", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tree_filter", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("is_enabled", AttributeType::Bool)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("add_to_annotation_queue_id", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("add_to_dataset_id", AttributeType::String)
                    .optional()
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

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = vec![];
        let config = &request.config;

        let is_null = |name: &str| config.attr(name).map_or(true, Dynamic::is_null);
        if is_null("session_id") && is_null("dataset_id") {
            diagnostics.push(Diagnostic::error(
                "Missing rule target",
                "One of session_id or dataset_id must be set",
            ));
        }

        if let Some(rate) = config.number_attr("sampling_rate") {
            if !(0.0..=1.0).contains(&rate) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid sampling rate",
                        format!("sampling_rate must be between 0 and 1, got {}", rate),
                    )
                    .with_attribute(AttributePath::new("sampling_rate")),
                );
            }
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_rule(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_rule(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_rule(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_rule(&request.prior_state).await {
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
impl ResourceWithConfigure for RunRuleResource {
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
