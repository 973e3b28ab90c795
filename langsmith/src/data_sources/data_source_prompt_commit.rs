//! Prompt commit data source implementation

use crate::common;
use crate::provider_data::LangSmithProviderData;
use crate::resources::PromptCommitResource;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

const LATEST: &str = "latest";

#[derive(Default)]
pub struct PromptCommitDataSource {
    provider_data: Option<LangSmithProviderData>,
}

impl PromptCommitDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let repo_handle = common::required_string(config, "repo_handle")?;
        let reference = config
            .string_attr("commit")
            .unwrap_or_else(|| LATEST.to_string());

        let commit = common::found(client.prompts().get_commit(&repo_handle, &reference).await)
            .map_err(|e| common::api_error("read", "prompt commit", &e))?
            .ok_or_else(|| {
                Diagnostic::error(
                    "Prompt commit not found",
                    format!("No commit '{}' in prompt '{}'", reference, repo_handle),
                )
            })?;
        tracing::debug!(repo_handle = %repo_handle, commit_hash = %commit.commit_hash, "Resolved prompt commit");

        let mut state = PromptCommitResource::to_state(&repo_handle, &commit, &DynamicValue::object());
        state.set_attr("commit", reference);
        Ok(state)
    }
}

#[async_trait]
impl DataSource for PromptCommitDataSource {
    fn type_name(&self) -> &str {
        "langsmith_prompt_commit"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Reads one commit of a prompt repository")
            .attribute(
                AttributeBuilder::new("repo_handle", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("commit", AttributeType::String)
                    .description("Commit hash or tag; defaults to latest")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("repo_handle/commit_hash")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("manifest", AttributeType::String)
                    .description("Serialized prompt manifest as JSON")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("parent_commit", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("commit_hash", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("created_at", AttributeType::String)
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
impl DataSourceWithConfigure for PromptCommitDataSource {
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
