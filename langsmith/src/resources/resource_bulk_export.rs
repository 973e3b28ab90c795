//! Bulk export resource implementation
//!
//! An export is a one-shot job. Destroying it cancels the job unless it has
//! already finished.

use crate::api::bulk_exports::{BulkExport, CreateBulkExportRequest};
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
pub struct BulkExportResource {
    provider_data: Option<LangSmithProviderData>,
}

impl BulkExportResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(export: &BulkExport) -> DynamicValue {
        let mut state = DynamicValue::object();
        state.set_attr("id", export.id.as_str());
        state.set_attr(
            "bulk_export_destination_id",
            export.bulk_export_destination_id.as_str(),
        );
        state.set_attr("session_id", export.session_id.as_str());
        state.set_attr("start_time", export.start_time.as_str());
        state.set_attr("end_time", export.end_time.clone());
        state.set_attr("format", export.format.clone());
        state.set_attr("compression", export.compression.clone());
        state.set_attr("status", export.status.clone());
        state.set_attr("created_at", export.created_at.clone());
        state
    }

    async fn create_export(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = CreateBulkExportRequest {
            bulk_export_destination_id: common::required_string(config, "bulk_export_destination_id")?,
            session_id: common::required_string(config, "session_id")?,
            start_time: common::required_string(config, "start_time")?,
            end_time: config.string_attr("end_time"),
            format: config.string_attr("format"),
            compression: config.string_attr("compression"),
        };

        let export = client
            .bulk_exports()
            .create(&request)
            .await
            .map_err(|e| common::api_error("create", "bulk export", &e))?;
        tracing::debug!(id = %export.id, session_id = %export.session_id, "Started bulk export");

        Ok(Self::to_state(&export))
    }

    async fn fetch(&self, id: &str) -> Result<Option<BulkExport>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        common::found(client.bulk_exports().get(id).await)
            .map_err(|e| common::api_error("read", "bulk export", &e))
    }

    async fn read_export(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let id = common::state_id(state)?;
        Ok(self.fetch(&id).await?.as_ref().map(Self::to_state))
    }

    async fn cancel_export(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let id = common::state_id(state)?;

        let Some(export) = self.fetch(&id).await? else {
            return Ok(());
        };
        if export.is_terminal() {
            tracing::debug!(id = %id, status = ?export.status, "Bulk export already finished");
            return Ok(());
        }

        common::deleted(client.bulk_exports().cancel(&id).await)
            .map_err(|e| common::api_error("cancel", "bulk export", &e))
    }
}

#[async_trait]
impl Resource for BulkExportResource {
    fn type_name(&self) -> &str {
        "langsmith_bulk_export"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Exports the runs of a project to a bulk export destination")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("bulk_export_destination_id", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("session_id", AttributeType::String)
                    .description("Project whose runs are exported")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("start_time", AttributeType::String)
                    .description("RFC 3339 start of the export window")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("end_time", AttributeType::String)
                    .description("RFC 3339 end of the export window")
                    .optional()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("format", AttributeType::String)
                    .description("Output file format; defaults to parquet")
                    .optional()
                    .computed()
                    .use_state_for_unknown()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("compression", AttributeType::String)
                    .optional()
                    .computed()
                    .use_state_for_unknown()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("status", AttributeType::String)
                    .description("Job status as last read")
                    .computed()
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
        match self.create_export(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_export(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        UpdateResourceResponse::failed(
            request.prior_state,
            Diagnostic::error(
                "Bulk exports are immutable",
                "Every attribute of a bulk export requires replacement",
            ),
        )
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.cancel_export(&request.prior_state).await {
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
impl ResourceWithConfigure for BulkExportResource {
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
