//! Prompt (prompt hub repository) resource implementation

use crate::api::prompts::{CreatePromptRequest, Prompt, UpdatePromptRequest};
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
pub struct PromptResource {
    provider_data: Option<LangSmithProviderData>,
}

impl PromptResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn to_state(prompt: &Prompt) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", prompt.id.as_str());
        state.set_attr("repo_handle", prompt.repo_handle.as_str());
        state.set_attr("full_name", prompt.full_name.clone());
        state.set_attr("owner", prompt.owner.clone());
        state.set_attr("description", common::non_empty(prompt.description.clone()));
        state.set_attr("readme", common::non_empty(prompt.readme.clone()));
        state.set_attr("is_public", prompt.is_public);
        state.set_attr("is_archived", prompt.is_archived);
        state.set_attr(
            "tags",
            Some(prompt.tags.clone()).filter(|tags| !tags.is_empty()),
        );
        state.set_attr("created_at", prompt.created_at.clone());
        state.set_attr("updated_at", prompt.updated_at.clone());
        state
    }

    fn update_request(config: &DynamicValue) -> UpdatePromptRequest {
        UpdatePromptRequest {
            description: config.string_attr("description"),
            readme: config.string_attr("readme"),
            is_public: config.bool_attr("is_public"),
            is_archived: config.bool_attr("is_archived"),
            tags: config.string_list_attr("tags").unwrap_or_default(),
        }
    }

    async fn create_prompt(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = CreatePromptRequest {
            repo_handle: common::required_string(config, "repo_handle")?,
            description: config.string_attr("description"),
            readme: config.string_attr("readme"),
            is_public: config.bool_attr("is_public").unwrap_or(false),
            tags: config.string_list_attr("tags"),
        };

        let mut prompt = client
            .prompts()
            .create(&request)
            .await
            .map_err(|e| common::api_error("create", "prompt", &e))?;
        tracing::debug!(id = %prompt.id, repo_handle = %prompt.repo_handle, "Created prompt");

        // Archiving is only possible on an existing repo
        if config.bool_attr("is_archived") == Some(true) {
            prompt = client
                .prompts()
                .update(&prompt.repo_handle, &Self::update_request(config))
                .await
                .map_err(|e| common::api_error("archive", "prompt", &e))?;
        }

        Ok(Self::to_state(&prompt))
    }

    async fn read_prompt(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let repo_handle = common::required_string(state, "repo_handle")?;

        let prompt = common::found(client.prompts().get(&repo_handle).await)
            .map_err(|e| common::api_error("read", "prompt", &e))?;

        Ok(prompt.as_ref().map(Self::to_state))
    }

    async fn update_prompt(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let repo_handle = common::required_string(prior, "repo_handle")?;

        client
            .prompts()
            .update(&repo_handle, &Self::update_request(config))
            .await
            .map_err(|e| common::api_error("update", "prompt", &e))?;

        let prompt = client
            .prompts()
            .get(&repo_handle)
            .await
            .map_err(|e| common::api_error("read", "prompt", &e))?;

        Ok(Self::to_state(&prompt))
    }

    async fn delete_prompt(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let repo_handle = common::required_string(state, "repo_handle")?;

        common::deleted(client.prompts().delete(&repo_handle).await)
            .map_err(|e| common::api_error("delete", "prompt", &e))
    }
}

#[async_trait]
impl Resource for PromptResource {
    fn type_name(&self) -> &str {
        "langsmith_prompt"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a prompt repository in the LangSmith prompt hub")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The repository ID")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("repo_handle", AttributeType::String)
                    .description("Handle of the repository, unique within its owner")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("full_name", AttributeType::String)
                    .description("owner/handle form of the repository name")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("owner", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("readme", AttributeType::String)
                    .description("Markdown readme shown in the hub")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("is_public", AttributeType::Bool)
                    .description("Whether the prompt is publicly visible")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("is_archived", AttributeType::Bool)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tags", AttributeType::List(Box::new(AttributeType::String)))
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
        match self.create_prompt(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_prompt(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_prompt(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_prompt(&request.prior_state).await {
            Ok(()) => DeleteResourceResponse::ok(),
            Err(diag) => DeleteResourceResponse::with_diagnostic(diag),
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        common::import_by_attribute(&ctx, "repo_handle", &request)
    }
}

#[async_trait]
impl ResourceWithConfigure for PromptResource {
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
