//! Project resource implementation

use crate::api::projects::{CreateProjectRequest, Project, UpdateProjectRequest};
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
pub struct ProjectResource {
    provider_data: Option<LangSmithProviderData>,
}

impl ProjectResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn to_state(project: &Project, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", project.id.as_str());
        state.set_attr("name", project.name.as_str());
        state.set_attr("description", common::non_empty(project.description.clone()));
        state.set_attr(
            "extra",
            common::json_state(project.extra.as_ref(), prior.string_attr("extra")),
        );
        state.set_attr(
            "reference_dataset_id",
            common::non_empty(project.reference_dataset_id.clone()),
        );
        state.set_attr(
            "default_dataset_id",
            common::non_empty(project.default_dataset_id.clone()),
        );
        state.set_attr("tenant_id", project.tenant_id.clone());
        state.set_attr("start_time", project.start_time.clone());
        state
    }

    async fn create_project(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = CreateProjectRequest {
            name: common::required_string(config, "name")?,
            description: config.string_attr("description"),
            extra: common::json_attr(config, "extra")?,
            reference_dataset_id: config.string_attr("reference_dataset_id"),
            default_dataset_id: config.string_attr("default_dataset_id"),
        };

        let project = client
            .projects()
            .create(&request)
            .await
            .map_err(|e| common::api_error("create", "project", &e))?;
        tracing::debug!(id = %project.id, name = %project.name, "Created project");

        Ok(Self::to_state(&project, config))
    }

    async fn read_project(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let project = common::found(client.projects().get(&id).await)
            .map_err(|e| common::api_error("read", "project", &e))?;

        Ok(project.map(|p| Self::to_state(&p, state)))
    }

    async fn update_project(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        let request = UpdateProjectRequest {
            name: common::required_string(config, "name")?,
            description: config.string_attr("description"),
            extra: common::json_attr(config, "extra")?,
            default_dataset_id: config.string_attr("default_dataset_id"),
        };

        client
            .projects()
            .update(&id, &request)
            .await
            .map_err(|e| common::api_error("update", "project", &e))?;

        let project = client
            .projects()
            .get(&id)
            .await
            .map_err(|e| common::api_error("read", "project", &e))?;

        Ok(Self::to_state(&project, config))
    }

    async fn delete_project(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.projects().delete(&id).await)
            .map_err(|e| common::api_error("delete", "project", &e))
    }
}

#[async_trait]
impl Resource for ProjectResource {
    fn type_name(&self) -> &str {
        "langsmith_project"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a LangSmith project (tracer session)")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The project ID")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The project name")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .description("A description of the project")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("extra", AttributeType::String)
                    .description("Extra project metadata as a JSON document")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("reference_dataset_id", AttributeType::String)
                    .description("Dataset this project evaluates against")
                    .optional()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("default_dataset_id", AttributeType::String)
                    .description("Default dataset for runs added from this project")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tenant_id", AttributeType::String)
                    .description("Workspace the project belongs to")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("start_time", AttributeType::String)
                    .description("When the project was created")
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
        match self.create_project(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_project(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_project(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_project(&request.prior_state).await {
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
impl ResourceWithConfigure for ProjectResource {
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
