//! Annotation queue resource implementation

use crate::api::annotation_queues::{AnnotationQueue, AnnotationQueueRequest};
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
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

#[derive(Default)]
pub struct AnnotationQueueResource {
    provider_data: Option<LangSmithProviderData>,
}

impl AnnotationQueueResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(queue: &AnnotationQueue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", queue.id.as_str());
        state.set_attr("name", queue.name.as_str());
        state.set_attr("description", common::non_empty(queue.description.clone()));
        state.set_attr("default_dataset", queue.default_dataset.clone());
        state.set_attr("num_reviewers_per_item", queue.num_reviewers_per_item);
        state.set_attr("enable_reservations", queue.enable_reservations);
        state.set_attr("reservation_minutes", queue.reservation_minutes);
        state.set_attr(
            "rubric_instructions",
            common::non_empty(queue.rubric_instructions.clone()),
        );
        state.set_attr("tenant_id", queue.tenant_id.clone());
        state.set_attr("created_at", queue.created_at.clone());
        state.set_attr("updated_at", queue.updated_at.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<AnnotationQueueRequest, Diagnostic> {
        Ok(AnnotationQueueRequest {
            name: common::required_string(config, "name")?,
            description: config.string_attr("description"),
            default_dataset: config.string_attr("default_dataset"),
            num_reviewers_per_item: config.int_attr("num_reviewers_per_item"),
            enable_reservations: config.bool_attr("enable_reservations"),
            reservation_minutes: config.int_attr("reservation_minutes"),
            rubric_instructions: config.string_attr("rubric_instructions"),
        })
    }

    async fn create_queue(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let queue = client
            .annotation_queues()
            .create(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "annotation queue", &e))?;
        tracing::debug!(id = %queue.id, name = %queue.name, "Created annotation queue");

        Ok(Self::to_state(&queue))
    }

    async fn read_queue(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let queue = common::found(client.annotation_queues().get(&id).await)
            .map_err(|e| common::api_error("read", "annotation queue", &e))?;

        Ok(queue.as_ref().map(Self::to_state))
    }

    async fn update_queue(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        client
            .annotation_queues()
            .update(&id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "annotation queue", &e))?;

        let queue = client
            .annotation_queues()
            .get(&id)
            .await
            .map_err(|e| common::api_error("read", "annotation queue", &e))?;

        Ok(Self::to_state(&queue))
    }

    async fn delete_queue(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.annotation_queues().delete(&id).await)
            .map_err(|e| common::api_error("delete", "annotation queue", &e))
    }
}

#[async_trait]
impl Resource for AnnotationQueueResource {
    fn type_name(&self) -> &str {
        "langsmith_annotation_queue"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a LangSmith annotation queue")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The annotation queue ID")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The queue name")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("default_dataset", AttributeType::String)
                    .description("Dataset that reviewed runs are added to by default")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("num_reviewers_per_item", AttributeType::Number)
                    .description("How many reviewers must annotate each run")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("enable_reservations", AttributeType::Bool)
                    .description("Reserve runs for the reviewer that opened them")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("reservation_minutes", AttributeType::Number)
                    .description("How long a reservation lasts")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("rubric_instructions", AttributeType::String)
                    .description("Instructions shown to reviewers")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tenant_id", AttributeType::String)
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

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: common::validate_whole_numbers(
                &request.config,
                &["num_reviewers_per_item", "reservation_minutes"],
            ),
        }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_queue(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_queue(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_queue(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_queue(&request.prior_state).await {
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
impl ResourceWithConfigure for AnnotationQueueResource {
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
