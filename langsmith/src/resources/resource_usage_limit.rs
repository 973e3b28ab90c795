//! Usage limit resource implementation

use crate::api::usage_limits::{UsageLimit, UsageLimitRequest};
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
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

#[derive(Default)]
pub struct UsageLimitResource {
    provider_data: Option<LangSmithProviderData>,
}

impl UsageLimitResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(limit: &UsageLimit) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", limit.id.as_str());
        state.set_attr("limit_type", limit.limit_type.as_str());
        state.set_attr("limit_value", limit.limit_value);
        state.set_attr("tenant_id", limit.tenant_id.clone());
        state.set_attr("created_at", limit.created_at.clone());
        state.set_attr("updated_at", limit.updated_at.clone());
        state
    }

    fn request(config: &DynamicValue, id: Option<String>) -> Result<UsageLimitRequest, Diagnostic> {
        let limit_value = config.int_attr("limit_value").ok_or_else(|| {
            Diagnostic::error("Missing limit_value", "The 'limit_value' attribute is required")
                .with_attribute(AttributePath::new("limit_value"))
        })?;

        Ok(UsageLimitRequest {
            id,
            limit_type: common::required_string(config, "limit_type")?,
            limit_value,
        })
    }

    async fn upsert_limit(&self, config: &DynamicValue, id: Option<String>) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let limit = client
            .usage_limits()
            .upsert(&Self::request(config, id)?)
            .await
            .map_err(|e| common::api_error("write", "usage limit", &e))?;
        tracing::debug!(id = %limit.id, limit_type = %limit.limit_type, "Wrote usage limit");

        Ok(Self::to_state(&limit))
    }

    async fn read_limit(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let limit = client
            .usage_limits()
            .find(&id)
            .await
            .map_err(|e| common::api_error("read", "usage limit", &e))?;

        Ok(limit.as_ref().map(Self::to_state))
    }

    async fn delete_limit(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.usage_limits().delete(&id).await)
            .map_err(|e| common::api_error("delete", "usage limit", &e))
    }
}

#[async_trait]
impl Resource for UsageLimitResource {
    fn type_name(&self) -> &str {
        "langsmith_usage_limit"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a monthly trace usage limit for the workspace")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("limit_type", AttributeType::String)
                    .description("Kind of limit, e.g. monthly_traces or monthly_longlived_traces")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("limit_value", AttributeType::Number)
                    .description("Maximum allowed count")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tenant_id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
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
        ValidateResourceConfigResponse {
            diagnostics: common::validate_whole_numbers(&request.config, &["limit_value"]),
        }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.upsert_limit(&request.config, None).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_limit(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let id = request.prior_state.string_attr("id");
        match self.upsert_limit(&request.config, id).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_limit(&request.prior_state).await {
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
impl ResourceWithConfigure for UsageLimitResource {
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
