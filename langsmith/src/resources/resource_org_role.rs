//! Organization role resource implementation

use crate::api::org_roles::{OrgRole, OrgRoleRequest};
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
pub struct OrgRoleResource {
    provider_data: Option<LangSmithProviderData>,
}

impl OrgRoleResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(role: &OrgRole, prior: &DynamicValue) -> DynamicValue {
        let permissions =
            common::set_state(role.permissions.clone(), prior.string_list_attr("permissions"));

        let mut state = DynamicValue::object();
        state.set_attr("id", role.id.as_str());
        state.set_attr("display_name", role.display_name.as_str());
        state.set_attr("description", common::non_empty(role.description.clone()));
        state.set_attr("permissions", permissions);
        state.set_attr("name", role.name.clone());
        state.set_attr("organization_id", role.organization_id.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<OrgRoleRequest, Diagnostic> {
        Ok(OrgRoleRequest {
            display_name: common::required_string(config, "display_name")?,
            description: config.string_attr("description"),
            permissions: config.string_list_attr("permissions").unwrap_or_default(),
        })
    }

    async fn fetch(&self, id: &str) -> Result<Option<OrgRole>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        client
            .org_roles()
            .find(id)
            .await
            .map_err(|e| common::api_error("read", "organization role", &e))
    }

    async fn create_role(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let role = client
            .org_roles()
            .create(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "organization role", &e))?;
        tracing::debug!(id = %role.id, display_name = %role.display_name, "Created organization role");

        Ok(Self::to_state(&role, config))
    }

    async fn read_role(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = common::state_id(state)?;
        Ok(self.fetch(&id).await?.map(|role| Self::to_state(&role, state)))
    }

    async fn update_role(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        client
            .org_roles()
            .update(&id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "organization role", &e))?;

        let role = self.fetch(&id).await?.ok_or_else(|| {
            Diagnostic::error(
                "Failed to read organization role",
                format!("Role {} disappeared after update", id),
            )
        })?;

        Ok(Self::to_state(&role, config))
    }

    async fn delete_role(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.org_roles().delete(&id).await)
            .map_err(|e| common::api_error("delete", "organization role", &e))
    }
}

#[async_trait]
impl Resource for OrgRoleResource {
    fn type_name(&self) -> &str {
        "langsmith_org_role"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a custom role in the organization")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
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
                AttributeBuilder::new("description", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("permissions", AttributeType::Set(Box::new(AttributeType::String)))
                    .description("Permissions granted by the role, e.g. projects:read")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("System name assigned by the API")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("organization_id", AttributeType::String)
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
        match self.create_role(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_role(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_role(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_role(&request.prior_state).await {
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
impl ResourceWithConfigure for OrgRoleResource {
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
