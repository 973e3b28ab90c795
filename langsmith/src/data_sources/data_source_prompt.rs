//! Prompt data source implementation

use crate::common;
use crate::provider_data::LangSmithProviderData;
use crate::resources::PromptResource;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

#[derive(Default)]
pub struct PromptDataSource {
    provider_data: Option<LangSmithProviderData>,
}

impl PromptDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let repo_handle = common::required_string(config, "repo_handle")?;

        let prompt = common::found(client.prompts().get(&repo_handle).await)
            .map_err(|e| common::api_error("read", "prompt", &e))?
            .ok_or_else(|| {
                Diagnostic::error(
                    "Prompt not found",
                    format!("No prompt with handle '{}'", repo_handle),
                )
            })?;

        Ok(PromptResource::to_state(&prompt))
    }
}

#[async_trait]
impl DataSource for PromptDataSource {
    fn type_name(&self) -> &str {
        "langsmith_prompt"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Looks up a prompt repository in the workspace")
            .attribute(
                AttributeBuilder::new("repo_handle", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(
                AttributeBuilder::new("full_name", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(AttributeBuilder::new("owner", AttributeType::String).computed().build())
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(AttributeBuilder::new("readme", AttributeType::String).computed().build())
            .attribute(AttributeBuilder::new("is_public", AttributeType::Bool).computed().build())
            .attribute(
                AttributeBuilder::new("is_archived", AttributeType::Bool)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tags", AttributeType::List(Box::new(AttributeType::String)))
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("created_at", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("updated_at", AttributeType::String)
                    .computed()
                    .build(),
            )
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
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
impl DataSourceWithConfigure for PromptDataSource {
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
