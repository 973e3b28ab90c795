//! Dataset example resource implementation

use crate::api::dataset_examples::{CreateExampleRequest, Example, UpdateExampleRequest};
use crate::common;
use crate::provider_data::LangSmithProviderData;
use async_trait::async_trait;
use serde_json::Value;
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
pub struct ExampleResource {
    provider_data: Option<LangSmithProviderData>,
}

impl ExampleResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(example: &Example, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", example.id.as_str());
        state.set_attr("dataset_id", example.dataset_id.as_str());
        state.set_attr(
            "inputs",
            common::json_state(example.inputs.as_ref(), prior.string_attr("inputs")),
        );
        state.set_attr(
            "outputs",
            common::json_state(example.outputs.as_ref(), prior.string_attr("outputs")),
        );
        state.set_attr(
            "metadata",
            common::json_state(example.metadata.as_ref(), prior.string_attr("metadata")),
        );
        state.set_attr("split", example.split.clone().filter(|s| !s.is_empty()));
        state.set_attr("created_at", example.created_at.clone());
        state.set_attr("modified_at", example.modified_at.clone());
        state
    }

    fn inputs(config: &DynamicValue) -> Result<Value, Diagnostic> {
        common::json_attr(config, "inputs")?.ok_or_else(|| {
            Diagnostic::error("Missing inputs", "The 'inputs' attribute is required")
                .with_attribute(AttributePath::new("inputs"))
        })
    }

    async fn create_example(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = CreateExampleRequest {
            dataset_id: common::required_string(config, "dataset_id")?,
            inputs: Self::inputs(config)?,
            outputs: common::json_attr(config, "outputs")?,
            metadata: common::json_attr(config, "metadata")?,
            split: config.string_list_attr("split"),
        };

        let example = client
            .examples()
            .create(&request)
            .await
            .map_err(|e| common::api_error("create", "example", &e))?;
        tracing::debug!(id = %example.id, dataset_id = %example.dataset_id, "Created example");

        Ok(Self::to_state(&example, config))
    }

    async fn read_example(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let example = common::found(client.examples().get(&id).await)
            .map_err(|e| common::api_error("read", "example", &e))?;

        Ok(example.map(|e| Self::to_state(&e, state)))
    }

    async fn update_example(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        let request = UpdateExampleRequest {
            inputs: Self::inputs(config)?,
            outputs: common::json_attr(config, "outputs")?,
            metadata: common::json_attr(config, "metadata")?,
            split: config.string_list_attr("split"),
        };

        client
            .examples()
            .update(&id, &request)
            .await
            .map_err(|e| common::api_error("update", "example", &e))?;

        let example = client
            .examples()
            .get(&id)
            .await
            .map_err(|e| common::api_error("read", "example", &e))?;

        Ok(Self::to_state(&example, config))
    }

    async fn delete_example(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.examples().delete(&id).await)
            .map_err(|e| common::api_error("delete", "example", &e))
    }
}

#[async_trait]
impl Resource for ExampleResource {
    fn type_name(&self) -> &str {
        "langsmith_example"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages an example in a LangSmith dataset")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The example ID")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("dataset_id", AttributeType::String)
                    .description("Dataset the example belongs to")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("inputs", AttributeType::String)
                    .description("Example inputs as a JSON object")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("outputs", AttributeType::String)
                    .description("Reference outputs as a JSON object")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("metadata", AttributeType::String)
                    .description("Example metadata as a JSON object")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("split", AttributeType::List(Box::new(AttributeType::String)))
                    .description("Dataset splits the example belongs to")
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
                AttributeBuilder::new("modified_at", AttributeType::String)
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
        match self.create_example(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_example(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_example(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_example(&request.prior_state).await {
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
impl ResourceWithConfigure for ExampleResource {
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
