//! Bulk export destination resource implementation
//!
//! Destinations cannot be edited or deleted through the API. Every input
//! forces replacement and destroy only forgets the destination.

use crate::api::bulk_exports::{
    CreateDestinationRequest, Destination, DestinationConfigRequest, DestinationCredentials,
};
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
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};

const CREDENTIAL_ATTRIBUTES: [&str; 2] = ["access_key_id", "secret_access_key"];

#[derive(Default)]
pub struct BulkExportDestinationResource {
    provider_data: Option<LangSmithProviderData>,
}

impl BulkExportDestinationResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials are write-only and carried over from `prior`
    fn to_state(destination: &Destination, prior: &DynamicValue) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", destination.id.as_str());
        state.set_attr("display_name", destination.display_name.as_str());
        state.set_attr(
            "destination_type",
            destination.destination_type.clone().unwrap_or_else(|| "s3".to_string()),
        );
        state.set_attr("bucket_name", destination.config.bucket_name.clone());
        state.set_attr("prefix", common::non_empty(destination.config.prefix.clone()));
        state.set_attr("region", common::non_empty(destination.config.region.clone()));
        state.set_attr(
            "endpoint_url",
            common::non_empty(destination.config.endpoint_url.clone()),
        );
        for name in CREDENTIAL_ATTRIBUTES {
            state.copy_attr(name, prior);
        }
        state.set_attr("created_at", destination.created_at.clone());
        state.set_attr("updated_at", destination.updated_at.clone());
        state
    }

    fn request(config: &DynamicValue) -> Result<CreateDestinationRequest, Diagnostic> {
        let credentials = match (
            config.string_attr("access_key_id"),
            config.string_attr("secret_access_key"),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(DestinationCredentials {
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        Ok(CreateDestinationRequest {
            display_name: common::required_string(config, "display_name")?,
            destination_type: config.string_attr("destination_type"),
            config: DestinationConfigRequest {
                bucket_name: common::required_string(config, "bucket_name")?,
                prefix: config.string_attr("prefix"),
                region: config.string_attr("region"),
                endpoint_url: config.string_attr("endpoint_url"),
            },
            credentials,
        })
    }

    async fn create_destination(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let destination = client
            .bulk_exports()
            .create_destination(&Self::request(config)?)
            .await
            .map_err(|e| common::api_error("create", "bulk export destination", &e))?;
        tracing::debug!(id = %destination.id, "Created bulk export destination");

        Ok(Self::to_state(&destination, config))
    }

    async fn read_destination(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let destination = common::found(client.bulk_exports().get_destination(&id).await)
            .map_err(|e| common::api_error("read", "bulk export destination", &e))?;

        Ok(destination.map(|d| Self::to_state(&d, state)))
    }
}

#[async_trait]
impl Resource for BulkExportDestinationResource {
    fn type_name(&self) -> &str {
        "langsmith_bulk_export_destination"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let immutable = |name: &str, description: &str| {
            AttributeBuilder::new(name, AttributeType::String)
                .description(description)
                .optional()
                .requires_replace()
        };

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages an S3-compatible bucket that bulk exports write to")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("display_name", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("destination_type", AttributeType::String)
                    .description("Destination kind; defaults to s3")
                    .optional()
                    .computed()
                    .use_state_for_unknown()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("bucket_name", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(immutable("prefix", "Key prefix inside the bucket").build())
            .attribute(immutable("region", "Bucket region").build())
            .attribute(immutable("endpoint_url", "Endpoint of a non-AWS S3 service").build())
            .attribute(immutable("access_key_id", "Access key used to write to the bucket").sensitive().build())
            .attribute(immutable("secret_access_key", "Secret for access_key_id").sensitive().build())
            .attribute(
                AttributeBuilder::new("created_at", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("updated_at", AttributeType::String)
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

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = vec![];

        let config = &request.config;
        let present = |name: &str| config.attr(name).is_some_and(|v| !v.is_null());
        // unknown values resolve before apply
        let unknown = CREDENTIAL_ATTRIBUTES
            .iter()
            .any(|name| config.attr(name).is_some_and(Dynamic::is_unknown));
        let [key_id, secret] = CREDENTIAL_ATTRIBUTES;
        if !unknown && present(key_id) != present(secret) {
            diagnostics.push(Diagnostic::error(
                "Incomplete credentials",
                "access_key_id and secret_access_key must be set together",
            ));
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_destination(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_destination(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        UpdateResourceResponse::failed(
            request.prior_state,
            Diagnostic::error(
                "Bulk export destinations are immutable",
                "Every attribute of a bulk export destination requires replacement",
            ),
        )
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let id = request.prior_state.string_attr("id").unwrap_or_default();
        DeleteResourceResponse::with_diagnostic(Diagnostic::warning(
            "Bulk export destination not deleted",
            format!(
                "Destination {} cannot be deleted through the API; it was only removed from state",
                id
            ),
        ))
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
impl ResourceWithConfigure for BulkExportDestinationResource {
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
