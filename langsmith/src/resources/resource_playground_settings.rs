//! Saved playground settings resource implementation

use crate::api::playground_settings::{PlaygroundSettings, PlaygroundSettingsRequest};
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
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

#[derive(Default)]
pub struct PlaygroundSettingsResource {
    provider_data: Option<LangSmithProviderData>,
}

impl PlaygroundSettingsResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(settings: &PlaygroundSettings, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", settings.id.as_str());
        state.set_attr(
            "name",
            settings.name.clone().or_else(|| prior.string_attr("name")),
        );
        state.set_attr("description", common::non_empty(settings.description.clone()));
        state.set_attr(
            "settings",
            common::json_state(settings.settings.as_ref(), prior.string_attr("settings")),
        );
        state.set_attr("created_at", settings.created_at.clone());
        state.set_attr("updated_at", settings.updated_at.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<PlaygroundSettingsRequest, Diagnostic> {
        let settings = common::json_attr(config, "settings")?.ok_or_else(|| {
            Diagnostic::error("Missing settings", "The 'settings' attribute is required")
                .with_attribute(AttributePath::new("settings"))
        })?;

        Ok(PlaygroundSettingsRequest {
            name: common::required_string(config, "name")?,
            description: config.string_attr("description"),
            settings,
        })
    }

    async fn fetch(&self, id: &str) -> Result<Option<PlaygroundSettings>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        client
            .playground_settings()
            .find(id)
            .await
            .map_err(|e| common::api_error("read", "playground settings", &e))
    }

    async fn create_settings(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let settings = client
            .playground_settings()
            .create(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "playground settings", &e))?;
        tracing::debug!(id = %settings.id, "Created playground settings");

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
            .playground_settings()
            .update(&id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "playground settings", &e))?;

        let settings = self.fetch(&id).await?.ok_or_else(|| {
            Diagnostic::error(
                "Failed to read playground settings",
                format!("Playground settings {} disappeared after update", id),
            )
        })?;

        Ok(Self::to_state(&settings, config))
    }

    async fn delete_settings(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.playground_settings().delete(&id).await)
            .map_err(|e| common::api_error("delete", "playground settings", &e))
    }
}

#[async_trait]
impl Resource for PlaygroundSettingsResource {
    fn type_name(&self) -> &str {
        "langsmith_playground_settings"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a saved model configuration for the prompt playground")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("settings", AttributeType::String)
                    .description("Model configuration as JSON")
                    .required()
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
impl ResourceWithConfigure for PlaygroundSettingsResource {
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
