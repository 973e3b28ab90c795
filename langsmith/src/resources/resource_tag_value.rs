//! Resource tag value implementation
//!
//! Values live under their tag key; imports take `tag_key_id/id`.

use crate::api::tags::{TagValue, TagValueRequest};
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
pub struct TagValueResource {
    provider_data: Option<LangSmithProviderData>,
}

impl TagValueResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(tag_key_id: &str, value: &TagValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", value.id.as_str());
        state.set_attr(
            "tag_key_id",
            value.tag_key_id.clone().unwrap_or_else(|| tag_key_id.to_string()),
        );
        state.set_attr("value", value.value.as_str());
        state.set_attr("description", common::non_empty(value.description.clone()));
        state.set_attr("created_at", value.created_at.clone());
        state.set_attr("updated_at", value.updated_at.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<TagValueRequest, Diagnostic> {
        Ok(TagValueRequest {
            value: common::required_string(config, "value")?,
            description: config.string_attr("description"),
        })
    }

    async fn create_tag_value(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let tag_key_id = common::required_string(config, "tag_key_id")?;

        let value = client
            .tags()
            .create_value(&tag_key_id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "tag value", &e))?;
        tracing::debug!(id = %value.id, tag_key_id = %tag_key_id, "Created tag value");

        Ok(Self::to_state(&tag_key_id, &value))
    }

    async fn read_tag_value(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let tag_key_id = common::required_string(state, "tag_key_id")?;
        let id = common::state_id(state)?;

        let value = common::found(client.tags().get_value(&tag_key_id, &id).await)
            .map_err(|e| common::api_error("read", "tag value", &e))?;

        Ok(value.map(|v| Self::to_state(&tag_key_id, &v)))
    }

    async fn update_tag_value(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let tag_key_id = common::required_string(prior, "tag_key_id")?;
        let id = common::state_id(prior)?;

        client
            .tags()
            .update_value(&tag_key_id, &id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "tag value", &e))?;

        let value = client
            .tags()
            .get_value(&tag_key_id, &id)
            .await
            .map_err(|e| common::api_error("read", "tag value", &e))?;

        Ok(Self::to_state(&tag_key_id, &value))
    }

    async fn delete_tag_value(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let tag_key_id = common::required_string(state, "tag_key_id")?;
        let id = common::state_id(state)?;

        common::deleted(client.tags().delete_value(&tag_key_id, &id).await)
            .map_err(|e| common::api_error("delete", "tag value", &e))
    }
}

#[async_trait]
impl Resource for TagValueResource {
    fn type_name(&self) -> &str {
        "langsmith_tag_value"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a value of a workspace tag key")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tag_key_id", AttributeType::String)
                    .description("Tag key the value belongs to")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("value", AttributeType::String)
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
        match self.create_tag_value(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_tag_value(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_tag_value(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_tag_value(&request.prior_state).await {
            Ok(()) => DeleteResourceResponse::ok(),
            Err(diag) => DeleteResourceResponse::with_diagnostic(diag),
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        common::import_by_parts(&ctx, &["tag_key_id", "id"], &request)
    }
}

#[async_trait]
impl ResourceWithConfigure for TagValueResource {
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
