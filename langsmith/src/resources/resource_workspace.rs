//! Workspace resource implementation

use crate::api::workspaces::{CreateWorkspaceRequest, UpdateWorkspaceRequest, Workspace};
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
pub struct WorkspaceResource {
    provider_data: Option<LangSmithProviderData>,
}

impl WorkspaceResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn to_state(workspace: &Workspace) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", workspace.id.as_str());
        state.set_attr("display_name", workspace.display_name.as_str());
        state.set_attr("tenant_handle", common::non_empty(workspace.tenant_handle.clone()));
        state.set_attr("organization_id", workspace.organization_id.clone());
        state.set_attr("is_personal", workspace.is_personal);
        state.set_attr("created_at", workspace.created_at.clone());
        state
    }

    async fn fetch(&self, id: &str) -> Result<Option<Workspace>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        client
            .workspaces()
            .find(id)
            .await
            .map_err(|e| common::api_error("read", "workspace", &e))
    }

    async fn create_workspace(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = CreateWorkspaceRequest {
            display_name: common::required_string(config, "display_name")?,
            tenant_handle: config.string_attr("tenant_handle"),
        };

        let workspace = client
            .workspaces()
            .create(&request)
            .await
            .map_err(|e| common::api_error("create", "workspace", &e))?;
        tracing::debug!(id = %workspace.id, "Created workspace");

        Ok(Self::to_state(&workspace))
    }

    async fn read_workspace(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = common::state_id(state)?;
        Ok(self.fetch(&id).await?.as_ref().map(Self::to_state))
    }

    async fn update_workspace(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        let request = UpdateWorkspaceRequest {
            display_name: common::required_string(config, "display_name")?,
        };
        client
            .workspaces()
            .update(&id, &request)
            .await
            .map_err(|e| common::api_error("update", "workspace", &e))?;

        let workspace = self.fetch(&id).await?.ok_or_else(|| {
            Diagnostic::error(
                "Failed to read workspace",
                format!("Workspace {} disappeared after update", id),
            )
        })?;

        Ok(Self::to_state(&workspace))
    }

    async fn delete_workspace(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.workspaces().delete(&id).await)
            .map_err(|e| common::api_error("delete", "workspace", &e))
    }
}

#[async_trait]
impl Resource for WorkspaceResource {
    fn type_name(&self) -> &str {
        "langsmith_workspace"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a workspace in the current LangSmith organization")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The workspace (tenant) ID")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("display_name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tenant_handle", AttributeType::String)
                    .description("URL handle of the workspace")
                    .optional()
                    .computed()
                    .use_state_for_unknown()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("organization_id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("is_personal", AttributeType::Bool)
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
        match self.create_workspace(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_workspace(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_workspace(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_workspace(&request.prior_state).await {
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
impl ResourceWithConfigure for WorkspaceResource {
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
