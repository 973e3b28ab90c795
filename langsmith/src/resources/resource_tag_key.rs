//! Resource tag key implementation

use crate::api::tags::{TagKey, TagKeyRequest};
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
pub struct TagKeyResource {
    provider_data: Option<LangSmithProviderData>,
}

impl TagKeyResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn to_state(tag_key: &TagKey) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", tag_key.id.as_str());
        state.set_attr("key", tag_key.key.as_str());
        state.set_attr("description", common::non_empty(tag_key.description.clone()));
        state.set_attr("created_at", tag_key.created_at.clone());
        state.set_attr("updated_at", tag_key.updated_at.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<TagKeyRequest, Diagnostic> {
        Ok(TagKeyRequest {
            key: common::required_string(config, "key")?,
            description: config.string_attr("description"),
        })
    }

    async fn create_tag_key(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let tag_key = client
            .tags()
            .create_key(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "tag key", &e))?;
        tracing::debug!(id = %tag_key.id, key = %tag_key.key, "Created tag key");

        Ok(Self::to_state(&tag_key))
    }

    async fn read_tag_key(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let tag_key = common::found(client.tags().get_key(&id).await)
            .map_err(|e| common::api_error("read", "tag key", &e))?;

        Ok(tag_key.as_ref().map(Self::to_state))
    }

    async fn update_tag_key(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        client
            .tags()
            .update_key(&id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "tag key", &e))?;

        let tag_key = client
            .tags()
            .get_key(&id)
            .await
            .map_err(|e| common::api_error("read", "tag key", &e))?;

        Ok(Self::to_state(&tag_key))
    }

    async fn delete_tag_key(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.tags().delete_key(&id).await)
            .map_err(|e| common::api_error("delete", "tag key", &e))
    }
}

#[async_trait]
impl Resource for TagKeyResource {
    fn type_name(&self) -> &str {
        "langsmith_tag_key"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a workspace tag key used to label projects, datasets and prompts")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("key", AttributeType::String)
                    .description("Tag key name")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
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

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_tag_key(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_tag_key(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_tag_key(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_tag_key(&request.prior_state).await {
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
impl ResourceWithConfigure for TagKeyResource {
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
