//! Dataset resource implementation

use crate::api::datasets::{CreateDatasetRequest, Dataset, UpdateDatasetRequest};
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

const DATA_TYPES: &[&str] = &["kv", "llm", "chat"];

#[derive(Default)]
pub struct DatasetResource {
    provider_data: Option<LangSmithProviderData>,
}

impl DatasetResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn to_state(dataset: &Dataset, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", dataset.id.as_str());
        state.set_attr("name", dataset.name.as_str());
        state.set_attr("description", common::non_empty(dataset.description.clone()));
        state.set_attr("data_type", dataset.data_type.clone());
        state.set_attr(
            "inputs_schema",
            common::json_state(
                dataset.inputs_schema_definition.as_ref(),
                prior.string_attr("inputs_schema"),
            ),
        );
        state.set_attr(
            "outputs_schema",
            common::json_state(
                dataset.outputs_schema_definition.as_ref(),
                prior.string_attr("outputs_schema"),
            ),
        );
        state.set_attr(
            "metadata",
            common::json_state(dataset.metadata.as_ref(), prior.string_attr("metadata")),
        );
        state.set_attr("tenant_id", dataset.tenant_id.clone());
        state.set_attr("created_at", dataset.created_at.clone());
        state.set_attr("modified_at", dataset.modified_at.clone());
        state.set_attr("example_count", dataset.example_count.unwrap_or(0));
        state
    }

    async fn create_dataset(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = CreateDatasetRequest {
            name: common::required_string(config, "name")?,
            description: config.string_attr("description"),
            data_type: config.string_attr("data_type"),
            inputs_schema_definition: common::json_attr(config, "inputs_schema")?,
            outputs_schema_definition: common::json_attr(config, "outputs_schema")?,
            metadata: common::json_attr(config, "metadata")?,
        };

        let dataset = client
            .datasets()
            .create(&request)
            .await
            .map_err(|e| common::api_error("create", "dataset", &e))?;
        tracing::debug!(id = %dataset.id, name = %dataset.name, "Created dataset");

        Ok(Self::to_state(&dataset, config))
    }

    async fn read_dataset(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let dataset = common::found(client.datasets().get(&id).await)
            .map_err(|e| common::api_error("read", "dataset", &e))?;

        Ok(dataset.map(|d| Self::to_state(&d, state)))
    }

    async fn update_dataset(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        let request = UpdateDatasetRequest {
            name: common::required_string(config, "name")?,
            description: config.string_attr("description"),
            inputs_schema_definition: common::json_attr(config, "inputs_schema")?,
            outputs_schema_definition: common::json_attr(config, "outputs_schema")?,
            metadata: common::json_attr(config, "metadata")?,
        };

        client
            .datasets()
            .update(&id, &request)
            .await
            .map_err(|e| common::api_error("update", "dataset", &e))?;

        let dataset = client
            .datasets()
            .get(&id)
            .await
            .map_err(|e| common::api_error("read", "dataset", &e))?;

        Ok(Self::to_state(&dataset, config))
    }

    async fn delete_dataset(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.datasets().delete(&id).await)
            .map_err(|e| common::api_error("delete", "dataset", &e))
    }
}

#[async_trait]
impl Resource for DatasetResource {
    fn type_name(&self) -> &str {
        "langsmith_dataset"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a LangSmith dataset")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The dataset ID")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The dataset name")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .description("A description of the dataset")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("data_type", AttributeType::String)
                    .description("Example format: kv, llm or chat")
                    .optional()
                    .computed()
                    .use_state_for_unknown()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("inputs_schema", AttributeType::String)
                    .description("JSON schema that example inputs must satisfy")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("outputs_schema", AttributeType::String)
                    .description("JSON schema that example outputs must satisfy")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("metadata", AttributeType::String)
                    .description("Dataset metadata as a JSON document")
                    .optional()
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
                AttributeBuilder::new("modified_at", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("example_count", AttributeType::Number)
                    .description("Number of examples in the dataset")
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

        if let Some(data_type) = request.config.string_attr("data_type") {
            if !DATA_TYPES.contains(&data_type.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid data type",
                        format!("data_type must be one of: {:?}", DATA_TYPES),
                    )
                    .with_attribute(AttributePath::new("data_type")),
                );
            }
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_dataset(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_dataset(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_dataset(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_dataset(&request.prior_state).await {
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
impl ResourceWithConfigure for DatasetResource {
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
