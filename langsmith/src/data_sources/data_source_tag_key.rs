//! Tag key data source implementation

use crate::common;
use crate::provider_data::LangSmithProviderData;
use crate::resources::TagKeyResource;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostic, DynamicValue};

#[derive(Default)]
pub struct TagKeyDataSource {
    provider_data: Option<LangSmithProviderData>,
}

impl TagKeyDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let tags = client.tags();

        let tag_key = match config.string_attr("id") {
            Some(id) => common::found(tags.get_key(&id).await),
            None => tags.find_key(&common::required_string(config, "key")?).await,
        }
        .map_err(|e| common::api_error("read", "tag key", &e))?
        .ok_or_else(|| Diagnostic::error("Tag key not found", "No tag key matches the given id or key"))?;

        Ok(TagKeyResource::to_state(&tag_key))
    }
}

#[async_trait]
impl DataSource for TagKeyDataSource {
    fn type_name(&self) -> &str {
        "langsmith_tag_key"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Looks up a resource tag key by id or key")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("key", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("created_at", AttributeType::String)
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("updated_at", AttributeType::String)
                    .computed()
                    .build(),
            )
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse {
            diagnostics: common::validate_lookup(&request.config, &["id", "key"]),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        match self.lookup(&request.config).await {
            Ok(state) => ReadDataSourceResponse::new(state),
            Err(diag) => ReadDataSourceResponse::failed(request.config, diag),
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for TagKeyDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        ConfigureDataSourceResponse {
            diagnostics: common::configure(request.provider_data, &mut self.provider_data),
        }
    }
}
