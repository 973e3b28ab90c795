//! Project data source implementation

use crate::api::projects::Project;
use crate::common;
use crate::provider_data::LangSmithProviderData;
use crate::resources::ProjectResource;
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
pub struct ProjectDataSource {
    provider_data: Option<LangSmithProviderData>,
}

impl ProjectDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let project: Option<Project> = match config.string_attr("id") {
            Some(id) => common::found(client.projects().get(&id).await),
            None => {
                let name = common::required_string(config, "name")?;
                client.projects().find_by_name(&name).await
            }
        }
        .map_err(|e| common::api_error("read", "project", &e))?;

        let project = project.ok_or_else(|| {
            Diagnostic::error(
                "Project not found",
                "No project matches the given id or name",
            )
        })?;
        tracing::debug!(id = %project.id, name = %project.name, "Found project");

        Ok(ProjectResource::to_state(&project, &DynamicValue::object()))
    }
}

#[async_trait]
impl DataSource for ProjectDataSource {
    fn type_name(&self) -> &str {
        "langsmith_project"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Looks up a LangSmith project by id or name")
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
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("extra", AttributeType::String)
                    .description("Project metadata as JSON")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("reference_dataset_id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("default_dataset_id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tenant_id", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("start_time", AttributeType::String)
                    .computed()
                    .build(),
            )
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
impl DataSourceWithConfigure for ProjectDataSource {
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
