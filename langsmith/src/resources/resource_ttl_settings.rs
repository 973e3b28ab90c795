//! Trace retention settings resource implementation
//!
//! Settings always exist for a workspace; destroying the resource only
//! forgets it.

use crate::api::ttl_settings::{TtlSettings, TtlSettingsRequest, TRACE_TIERS};
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
pub struct TtlSettingsResource {
    provider_data: Option<LangSmithProviderData>,
}

impl TtlSettingsResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(settings: &TtlSettings, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", settings.id.as_str());
        state.set_attr("default_trace_tier", settings.default_trace_tier.as_str());
        state.set_attr(
            "apply_to_all_projects",
            settings
                .apply_to_all_projects
                .or_else(|| prior.bool_attr("apply_to_all_projects"))
                .unwrap_or(false),
        );
        state.set_attr("tenant_id", settings.tenant_id.clone());
        state.set_attr("organization_id", settings.organization_id.clone());
        state.set_attr("created_at", settings.created_at.clone());
        state.set_attr("updated_at", settings.updated_at.clone());
        state
    }

    async fn upsert_settings(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = TtlSettingsRequest {
            default_trace_tier: common::required_string(config, "default_trace_tier")?,
            apply_to_all_projects: config.bool_attr("apply_to_all_projects"),
        };

        let settings = client
            .ttl_settings()
            .upsert(&request)
            .await
            .map_err(|e| common::api_error("write", "TTL settings", &e))?;
        tracing::debug!(id = %settings.id, tier = %settings.default_trace_tier, "Wrote TTL settings");

        Ok(Self::to_state(&settings, config))
    }

    async fn read_settings(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let settings = client
            .ttl_settings()
            .find(&id)
            .await
            .map_err(|e| common::api_error("read", "TTL settings", &e))?;

        Ok(settings.map(|s| Self::to_state(&s, state)))
    }
}

#[async_trait]
impl Resource for TtlSettingsResource {
    fn type_name(&self) -> &str {
        "langsmith_ttl_settings"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages the default trace retention tier of the workspace")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("default_trace_tier", AttributeType::String)
                    .description("Either longlived or shortlived")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("apply_to_all_projects", AttributeType::Bool)
                    .description("Also move existing projects to the new tier")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tenant_id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("organization_id", AttributeType::String)
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
        let mut diagnostics = vec![];

        if let Some(tier) = request.config.string_attr("default_trace_tier") {
            if !TRACE_TIERS.contains(&tier.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid trace tier",
                        format!(
                            "default_trace_tier must be one of {}, got '{}'",
                            TRACE_TIERS.join(", "),
                            tier
                        ),
                    )
                    .with_attribute(AttributePath::new("default_trace_tier")),
                );
            }
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.upsert_settings(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_settings(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.upsert_settings(&request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, _request: DeleteResourceRequest) -> DeleteResourceResponse {
        DeleteResourceResponse::with_diagnostic(Diagnostic::warning(
            "TTL settings not deleted",
            "Workspace TTL settings cannot be deleted; they were only removed from state",
        ))
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
impl ResourceWithConfigure for TtlSettingsResource {
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
