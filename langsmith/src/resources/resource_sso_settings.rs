//! Organization SAML SSO settings resource implementation

use crate::api::sso_settings::{SsoSettings, SsoSettingsRequest};
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
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};

#[derive(Default)]
pub struct SsoSettingsResource {
    provider_data: Option<LangSmithProviderData>,
}

impl SsoSettingsResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(settings: &SsoSettings, prior: &DynamicValue) -> DynamicValue {
        let workspace_ids = common::set_state(
            settings.default_workspace_ids.clone(),
            prior.string_list_attr("default_workspace_ids"),
        );

        let mut state = DynamicValue::object();
        state.set_attr("id", settings.id.as_str());
        state.set_attr("metadata_url", common::non_empty(settings.metadata_url.clone()));
        state.set_attr("metadata_xml", common::non_empty(settings.metadata_xml.clone()));
        state.set_attr("default_workspace_ids", workspace_ids);
        state.set_attr(
            "default_workspace_role_id",
            settings.default_workspace_role_id.clone(),
        );
        state.set_attr("organization_id", settings.organization_id.clone());
        state.set_attr("provider_id", settings.provider_id.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<SsoSettingsRequest, Diagnostic> {
        Ok(SsoSettingsRequest {
            metadata_url: config.string_attr("metadata_url"),
            metadata_xml: config.string_attr("metadata_xml"),
            default_workspace_ids: config
                .string_list_attr("default_workspace_ids")
                .unwrap_or_default(),
            default_workspace_role_id: common::required_string(config, "default_workspace_role_id")?,
        })
    }

    async fn fetch(&self, id: &str) -> Result<Option<SsoSettings>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        client
            .sso_settings()
            .find(id)
            .await
            .map_err(|e| common::api_error("read", "SSO settings", &e))
    }

    async fn create_settings(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let settings = client
            .sso_settings()
            .create(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "SSO settings", &e))?;
        tracing::debug!(id = %settings.id, "Created SSO settings");

        Ok(Self::to_state(&settings, config))
    }

    async fn read_settings(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = common::state_id(state)?;
        Ok(self.fetch(&id).await?.map(|s| Self::to_state(&s, state)))
    }

    async fn update_settings(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        client
            .sso_settings()
            .update(&id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "SSO settings", &e))?;

        let settings = self.fetch(&id).await?.ok_or_else(|| {
            Diagnostic::error(
                "Failed to read SSO settings",
                format!("SSO settings {} disappeared after update", id),
            )
        })?;

        Ok(Self::to_state(&settings, config))
    }

    async fn delete_settings(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.sso_settings().delete(&id).await)
            .map_err(|e| common::api_error("delete", "SSO settings", &e))
    }
}

#[async_trait]
impl Resource for SsoSettingsResource {
    fn type_name(&self) -> &str {
        "langsmith_sso_settings"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages SAML single sign-on for the organization")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("metadata_url", AttributeType::String)
                    .description("URL of the identity provider metadata")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("metadata_xml", AttributeType::String)
                    .description("Identity provider metadata document")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "default_workspace_ids",
                    AttributeType::Set(Box::new(AttributeType::String)),
                )
                .description("Workspaces new SSO users join")
                .required()
                .build(),
            )
            .attribute(
                AttributeBuilder::new("default_workspace_role_id", AttributeType::String)
                    .description("Role new SSO users get in those workspaces")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("organization_id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("provider_id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
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
        match (is_null("metadata_url"), is_null("metadata_xml")) {
            (true, true) => diagnostics.push(Diagnostic::error(
                "Missing identity provider metadata",
                "One of metadata_url or metadata_xml must be set",
            )),
            (false, false) => diagnostics.push(Diagnostic::error(
                "Conflicting identity provider metadata",
                "Only one of metadata_url or metadata_xml may be set",
            )),
            _ => {}
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_settings(&request.config).await {
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
        match self.update_settings(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_settings(&request.prior_state).await {
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
impl ResourceWithConfigure for SsoSettingsResource {
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
