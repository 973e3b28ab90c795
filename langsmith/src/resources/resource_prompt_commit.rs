//! Prompt commit resource implementation
//!
//! Commits are immutable: every input forces a new commit and destroying the
//! resource leaves the commit in the repository history.

use crate::api::prompts::{CreateCommitRequest, PromptCommit};
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
pub struct PromptCommitResource {
    provider_data: Option<LangSmithProviderData>,
}

impl PromptCommitResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn to_state(repo_handle: &str, commit: &PromptCommit, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", format!("{}/{}", repo_handle, commit.commit_hash));
        state.set_attr("repo_handle", repo_handle);
        state.set_attr(
            "manifest",
            common::json_state(commit.manifest.as_ref(), prior.string_attr("manifest")),
        );
        state.set_attr(
            "parent_commit",
            common::non_empty(commit.parent_commit_hash.clone()),
        );
        state.set_attr("commit_hash", commit.commit_hash.as_str());
        state.set_attr("created_at", commit.created_at.clone());
        state
    }

    async fn create_commit(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let repo_handle = common::required_string(config, "repo_handle")?;

        let manifest = common::json_attr(config, "manifest")?.ok_or_else(|| {
            Diagnostic::error("Missing manifest", "The 'manifest' attribute is required")
                .with_attribute(AttributePath::new("manifest"))
        })?;
        let request = CreateCommitRequest {
            manifest,
            parent_commit: config.string_attr("parent_commit"),
        };

        let commit = client
            .prompts()
            .create_commit(&repo_handle, &request)
            .await
            .map_err(|e| common::api_error("create", "prompt commit", &e))?;
        tracing::debug!(repo_handle = %repo_handle, commit_hash = %commit.commit_hash, "Created prompt commit");

        Ok(Self::to_state(&repo_handle, &commit, config))
    }

    async fn read_commit(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let repo_handle = common::required_string(state, "repo_handle")?;
        let commit_hash = common::required_string(state, "commit_hash")?;

        let commit = common::found(client.prompts().get_commit(&repo_handle, &commit_hash).await)
            .map_err(|e| common::api_error("read", "prompt commit", &e))?;

        Ok(commit.map(|c| Self::to_state(&repo_handle, &c, state)))
    }
}

#[async_trait]
impl Resource for PromptCommitResource {
    fn type_name(&self) -> &str {
        "langsmith_prompt_commit"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Pushes an immutable commit to a prompt repository")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("repo_handle/commit_hash")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("repo_handle", AttributeType::String)
                    .description("Repository the commit is pushed to")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("manifest", AttributeType::String)
                    .description("Serialized prompt manifest as JSON")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("parent_commit", AttributeType::String)
                    .description("Commit hash this commit builds on; defaults to the latest")
                    .optional()
                    .computed()
                    .use_state_for_unknown()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("commit_hash", AttributeType::String)
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
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_commit(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_commit(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        UpdateResourceResponse::failed(
            request.prior_state,
            Diagnostic::error(
                "Prompt commits are immutable",
                "Every attribute of a prompt commit requires replacement",
            ),
        )
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let commit = request
            .prior_state
            .string_attr("id")
            .unwrap_or_default();
        DeleteResourceResponse::with_diagnostic(Diagnostic::warning(
            "Prompt commit not deleted",
            format!(
                "Commit {} remains in the repository history; it was only removed from state",
                commit
            ),
        ))
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        common::import_by_parts(&ctx, &["repo_handle", "commit_hash"], &request)
    }
}

#[async_trait]
impl ResourceWithConfigure for PromptCommitResource {
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
