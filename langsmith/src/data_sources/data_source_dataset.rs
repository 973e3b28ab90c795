//! Dataset data source implementation

use crate::common;
use crate::provider_data::LangSmithProviderData;
use crate::resources::DatasetResource;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

#[derive(Default)]
pub struct DatasetDataSource {
    provider_data: Option<LangSmithProviderData>,
}

impl DatasetDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let dataset = match config.string_attr("id") {
            Some(id) => common::found(client.datasets().get(&id).await),
            None => {
                let name = common::required_string(config, "name")?;
                client.datasets().find_by_name(&name).await
            }
        }
        .map_err(|e| common::api_error("read", "dataset", &e))?
        .ok_or_else(|| {
            Diagnostic::error("Dataset not found", "No dataset matches the given id or name")
        })?;

        Ok(DatasetResource::to_state(&dataset, &DynamicValue::object()))
    }
}

#[async_trait]
impl DataSource for DatasetDataSource {
    fn type_name(&self) -> &str {
        "langsmith_dataset"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let computed = |name: &str, attr_type: AttributeType| {
            AttributeBuilder::new(name, attr_type).computed().build()
        };

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Looks up a dataset by id or name")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(computed("description", AttributeType::String))
            .attribute(computed("data_type", AttributeType::String))
            .attribute(computed("inputs_schema", AttributeType::String))
            .attribute(computed("outputs_schema", AttributeType::String))
            .attribute(computed("metadata", AttributeType::String))
            .attribute(computed("tenant_id", AttributeType::String))
            .attribute(computed("created_at", AttributeType::String))
            .attribute(computed("modified_at", AttributeType::String))
            .attribute(computed("example_count", AttributeType::Number))
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse {
            diagnostics: common::validate_lookup(&request.config, &["id", "name"]),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        match self.lookup(&request.config).await {
            Ok(state) => ReadDataSourceResponse::new(state),
            Err(diag) => ReadDataSourceResponse::failed(request.config, diag),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for DatasetDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        ConfigureDataSourceResponse {
            diagnostics: common::configure(request.provider_data, &mut self.provider_data),
        }
    }
}
