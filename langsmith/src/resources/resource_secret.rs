//! Workspace secret resource implementation
//!
//! The API never returns secret values, so the value in state is whatever
//! was last written.

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
pub struct SecretResource {
    provider_data: Option<LangSmithProviderData>,
}

impl SecretResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(key: &str, value: Option<String>) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", key);
        state.set_attr("key", key);
        state.set_attr("value", value);
        state
    }

    async fn write_secret(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let key = common::required_string(config, "key")?;
        let value = common::required_string(config, "value")?;

        client
            .secrets()
            .upsert(&key, &value)
            .await
            .map_err(|e| common::api_error("write", "secret", &e))?;
        tracing::debug!(key = %key, "Wrote workspace secret");

        Ok(Self::to_state(&key, Some(value)))
    }

    async fn read_secret(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let key = state
            .string_attr("key")
            .map_or_else(|| common::state_id(state), Ok)?;

        let exists = client
            .secrets()
            .exists(&key)
            .await
            .map_err(|e| common::api_error("read", "secret", &e))?;

        Ok(exists.then(|| Self::to_state(&key, state.string_attr("value"))))
    }

    async fn delete_secret(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let key = common::required_string(state, "key")?;

        common::deleted(client.secrets().delete(&key).await)
            .map_err(|e| common::api_error("delete", "secret", &e))
    }
}

#[async_trait]
impl Resource for SecretResource {
    fn type_name(&self) -> &str {
        "langsmith_secret"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a workspace secret available to evaluators and the playground")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Same as key")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("key", AttributeType::String)
                    .description("Secret name, e.g. OPENAI_API_KEY")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("value", AttributeType::String)
                    .description("Secret value")
                    .required()
                    .sensitive()
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.write_secret(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_secret(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.write_secret(&request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_secret(&request.prior_state).await {
            Ok(()) => DeleteResourceResponse::ok(),
            Err(diag) => DeleteResourceResponse::with_diagnostic(diag),
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        common::import_by_attribute(&ctx, "key", &request)
    }
}

#[async_trait]
impl ResourceWithConfigure for SecretResource {
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
