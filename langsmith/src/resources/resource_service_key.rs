//! Service key (workspace API key) resource implementation
//!
//! The secret key is only returned on creation and is kept in state from then on.

use crate::api::service_keys::{CreateServiceKeyRequest, ServiceKey};
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
pub struct ServiceKeyResource {
    provider_data: Option<LangSmithProviderData>,
}

impl ServiceKeyResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(key: &ServiceKey, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", key.id.as_str());
        state.set_attr(
            "description",
            key.description.clone().or_else(|| prior.string_attr("description")),
        );
        state.copy_attr("key", prior);
        state.set_attr("short_key", key.short_key.clone());
        state.set_attr("created_at", key.created_at.clone());
        state
    }

    async fn create_key(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = CreateServiceKeyRequest {
            description: common::required_string(config, "description")?,
        };
        let created = client
            .service_keys()
            .create(&request)
            .await
            .map_err(|e| common::api_error("create", "service key", &e))?;
        tracing::debug!(id = %created.id, "Created service key");

        let mut state = DynamicValue::object();
        state.set_attr("id", created.id.as_str());
        state.set_attr(
            "description",
            created.description.clone().unwrap_or(request.description),
        );
        state.set_attr("key", created.key.as_str());
        state.set_attr("short_key", created.short_key.clone());
        state.set_attr("created_at", created.created_at.clone());
        Ok(state)
    }

    async fn read_key(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let key = client
            .service_keys()
            .find(&id)
            .await
            .map_err(|e| common::api_error("read", "service key", &e))?;

        Ok(key.map(|k| Self::to_state(&k, state)))
    }

    async fn delete_key(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.service_keys().delete(&id).await)
            .map_err(|e| common::api_error("delete", "service key", &e))
    }
}

#[async_trait]
impl Resource for ServiceKeyResource {
    fn type_name(&self) -> &str {
        "langsmith_service_key"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a workspace service key")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("key", AttributeType::String)
                    .description("The secret key; only known for keys created by Terraform")
                    .computed()
                    .sensitive()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("short_key", AttributeType::String)
                    .description("Redacted form of the key shown in the UI")
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
        match self.create_key(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_key(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        UpdateResourceResponse::failed(
            request.prior_state,
            Diagnostic::error(
                "Service keys are immutable",
                "Changing a service key requires replacement",
            ),
        )
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_key(&request.prior_state).await {
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
impl ResourceWithConfigure for ServiceKeyResource {
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
