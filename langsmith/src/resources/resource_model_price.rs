//! Model price map entry resource implementation

use crate::api::model_prices::{ModelPrice, ModelPriceRequest};
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
pub struct ModelPriceResource {
    provider_data: Option<LangSmithProviderData>,
}

impl ModelPriceResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(price: &ModelPrice) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", price.id.as_str());
        state.set_attr("name", price.name.as_str());
        state.set_attr("match_pattern", price.match_pattern.as_str());
        state.set_attr("prompt_cost", price.prompt_cost.unwrap_or_default());
        state.set_attr("completion_cost", price.completion_cost.unwrap_or_default());
        state.set_attr("start_time", common::non_empty(price.start_time.clone()));
        state.set_attr("match_path", price.match_path.clone().filter(|p| !p.is_empty()));
        state.set_attr("provider", common::non_empty(price.provider.clone()));
        state
    }

    fn request(config: &DynamicValue) -> Result<ModelPriceRequest, Diagnostic> {
        Ok(ModelPriceRequest {
            name: common::required_string(config, "name")?,
            match_pattern: common::required_string(config, "match_pattern")?,
            prompt_cost: config.number_attr("prompt_cost").unwrap_or_default(),
            completion_cost: config.number_attr("completion_cost").unwrap_or_default(),
            start_time: config.string_attr("start_time"),
            match_path: config.string_list_attr("match_path"),
            provider: config.string_attr("provider"),
        })
    }

    async fn fetch(&self, id: &str) -> Result<Option<ModelPrice>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        client
            .model_prices()
            .find(id)
            .await
            .map_err(|e| common::api_error("read", "model price", &e))
    }

    async fn create_price(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let price = client
            .model_prices()
            .create(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "model price", &e))?;
        tracing::debug!(id = %price.id, name = %price.name, "Created model price");

        Ok(Self::to_state(&price))
    }

    async fn read_price(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = common::state_id(state)?;
        Ok(self.fetch(&id).await?.as_ref().map(Self::to_state))
    }

    async fn update_price(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(prior)?;

        client
            .model_prices()
            .update(&id, &Self::request(config)?)
            .await
            .map_err(|e| common::api_error("update", "model price", &e))?;

        let price = self.fetch(&id).await?.ok_or_else(|| {
            Diagnostic::error(
                "Failed to read model price",
                format!("Model price {} disappeared after update", id),
            )
        })?;

        Ok(Self::to_state(&price))
    }

    async fn delete_price(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        common::deleted(client.model_prices().delete(&id).await)
            .map_err(|e| common::api_error("delete", "model price", &e))
    }
}

#[async_trait]
impl Resource for ModelPriceResource {
    fn type_name(&self) -> &str {
        "langsmith_model_price"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages a model price map entry used for cost tracking")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("match_pattern", AttributeType::String)
                    .description("Regex matched against the model name")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("prompt_cost", AttributeType::Number)
                    .description("Cost per prompt token")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("completion_cost", AttributeType::Number)
                    .description("Cost per completion token")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("start_time", AttributeType::String)
                    .description("Date from which the price applies")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("match_path", AttributeType::List(Box::new(AttributeType::String)))
                    .description("Run fields the pattern is matched against")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("provider", AttributeType::String)
                    .optional()
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_price(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_price(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_price(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_price(&request.prior_state).await {
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
impl ResourceWithConfigure for ModelPriceResource {
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
