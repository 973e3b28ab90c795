//! Feedback configuration resource implementation
//!
//! Configurations are addressed by feedback key, which doubles as the ID.

use crate::api::feedback_configs::{
    CreateFeedbackConfigRequest, FeedbackCategory, FeedbackConfig, FeedbackConfigBody,
    UpdateFeedbackConfigRequest,
};
use crate::common;
use crate::provider_data::LangSmithProviderData;
use async_trait::async_trait;
use std::collections::HashMap;
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
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

const FEEDBACK_TYPES: &[&str] = &["continuous", "categorical", "freeform"];

#[derive(Default)]
pub struct FeedbackConfigResource {
    provider_data: Option<LangSmithProviderData>,
}

impl FeedbackConfigResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn category_type() -> AttributeType {
        AttributeType::Object(HashMap::from([
            ("value".to_string(), AttributeType::Number),
            ("label".to_string(), AttributeType::String),
        ]))
    }

    fn to_state(config: &FeedbackConfig) -> DynamicValue {
        let body = &config.feedback_config;
        let categories = body.categories.as_ref().filter(|c| !c.is_empty()).map(|c| {
            c.iter()
                .map(|category| {
                    HashMap::from([
                        ("value".to_string(), Dynamic::from(category.value)),
                        ("label".to_string(), Dynamic::from(category.label.clone())),
                    ])
                })
                .collect::<Vec<_>>()
        });

        let mut state = DynamicValue::object();
        state.set_attr("id", config.feedback_key.as_str());
        state.set_attr("feedback_key", config.feedback_key.as_str());
        state.set_attr("type", body.kind.as_str());
        state.set_attr("min", body.min);
        state.set_attr("max", body.max);
        state.set_attr("categories", categories);
        state.set_attr(
            "is_lower_score_better",
            config.is_lower_score_better.unwrap_or(false),
        );
        state.set_attr("tenant_id", config.tenant_id.clone());
        state.set_attr("modified_at", config.modified_at.clone());
        state
    }

    fn categories(config: &DynamicValue) -> Option<Vec<FeedbackCategory>> {
        let items = config.attr("categories").and_then(Dynamic::as_list)?;
        Some(
            items
                .iter()
                .filter_map(Dynamic::as_map)
                .filter_map(|category| {
                    Some(FeedbackCategory {
                        value: category.get("value").and_then(Dynamic::as_number)?,
                        label: category
                            .get("label")
                            .and_then(Dynamic::as_str)
                            .map(str::to_string),
                    })
                })
                .collect(),
        )
    }

    fn body(config: &DynamicValue) -> Result<FeedbackConfigBody, Diagnostic> {
        Ok(FeedbackConfigBody {
            kind: common::required_string(config, "type")?,
            min: config.number_attr("min"),
            max: config.number_attr("max"),
            categories: Self::categories(config),
        })
    }

    async fn create_config(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;

        let request = CreateFeedbackConfigRequest {
            feedback_key: common::required_string(config, "feedback_key")?,
            feedback_config: Self::body(config)?,
            is_lower_score_better: config.bool_attr("is_lower_score_better"),
        };

        let created = client
            .feedback_configs()
            .create(&request)
            .await
            .map_err(|e| common::api_error("create", "feedback config", &e))?;
        tracing::debug!(feedback_key = %created.feedback_key, "Created feedback config");

        Ok(Self::to_state(&created))
    }

    async fn fetch(&self, feedback_key: &str) -> Result<Option<FeedbackConfig>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        client
            .feedback_configs()
            .get(feedback_key)
            .await
            .map_err(|e| common::api_error("read", "feedback config", &e))
    }

    async fn read_config(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let feedback_key = state
            .string_attr("feedback_key")
            .map_or_else(|| common::state_id(state), Ok)?;
        Ok(self.fetch(&feedback_key).await?.as_ref().map(Self::to_state))
    }

    async fn update_config(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let feedback_key = common::required_string(config, "feedback_key")?;

        let request = UpdateFeedbackConfigRequest {
            feedback_key: feedback_key.clone(),
            feedback_config: Self::body(config)?,
            is_lower_score_better: config.bool_attr("is_lower_score_better"),
        };
        client
            .feedback_configs()
            .update(&request)
            .await
            .map_err(|e| common::api_error("update", "feedback config", &e))?;

        let updated = self.fetch(&feedback_key).await?.ok_or_else(|| {
            Diagnostic::error(
                "Failed to read feedback config",
                format!("Feedback config {} disappeared after update", feedback_key),
            )
        })?;

        Ok(Self::to_state(&updated))
    }

    async fn delete_config(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let feedback_key = common::required_string(state, "feedback_key")?;

        common::deleted(client.feedback_configs().delete(&feedback_key).await)
            .map_err(|e| common::api_error("delete", "feedback config", &e))
    }
}

#[async_trait]
impl Resource for FeedbackConfigResource {
    fn type_name(&self) -> &str {
        "langsmith_feedback_config"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages how feedback for a key is scored and displayed")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("Same as feedback_key")
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("feedback_key", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("type", AttributeType::String)
                    .description("One of continuous, categorical or freeform")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("min", AttributeType::Number)
                    .description("Lowest score of a continuous key")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("max", AttributeType::Number)
                    .description("Highest score of a continuous key")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("categories", AttributeType::List(Box::new(Self::category_type())))
                    .description("Allowed values of a categorical key")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("is_lower_score_better", AttributeType::Bool)
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("tenant_id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("modified_at", AttributeType::String)
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
        let mut diagnostics = vec![];
        let config = &request.config;

        match config.string_attr("type").as_deref() {
            Some(kind) if !FEEDBACK_TYPES.contains(&kind) => diagnostics.push(
                Diagnostic::error(
                    "Invalid feedback type",
                    format!(
                        "type must be one of {}, got '{}'",
                        FEEDBACK_TYPES.join(", "),
                        kind
                    ),
                )
                .with_attribute(AttributePath::new("type")),
            ),
            Some("categorical") if config.attr("categories").map_or(true, Dynamic::is_null) => {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing categories",
                        "A categorical feedback config needs at least one category",
                    )
                    .with_attribute(AttributePath::new("categories")),
                )
            }
            _ => {}
        }

        if let (Some(min), Some(max)) = (config.number_attr("min"), config.number_attr("max")) {
            if min > max {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid score range",
                        format!("min ({}) must not exceed max ({})", min, max),
                    )
                    .with_attribute(AttributePath::new("min")),
                );
            }
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_config(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_config(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_config(&request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_config(&request.prior_state).await {
            Ok(()) => DeleteResourceResponse::ok(),
            Err(diag) => DeleteResourceResponse::with_diagnostic(diag),
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        common::import_by_attribute(&ctx, "feedback_key", &request)
    }
}

#[async_trait]
impl ResourceWithConfigure for FeedbackConfigResource {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_round_trip_through_state() {
        let remote = FeedbackConfig {
            feedback_key: "quality".to_string(),
            feedback_config: FeedbackConfigBody {
                kind: "categorical".to_string(),
                min: None,
                max: None,
                categories: Some(vec![
                    FeedbackCategory {
                        value: 0.0,
                        label: Some("bad".to_string()),
                    },
                    FeedbackCategory {
                        value: 1.0,
                        label: None,
                    },
                ]),
            },
            is_lower_score_better: None,
            tenant_id: None,
            modified_at: None,
        };

        let state = FeedbackConfigResource::to_state(&remote);
        assert_eq!(state.string_attr("id").as_deref(), Some("quality"));
        assert_eq!(state.bool_attr("is_lower_score_better"), Some(false));
        let list_type = AttributeType::List(Box::new(FeedbackConfigResource::category_type()));
        assert!(list_type.accepts(state.attr("categories").unwrap()));

        let categories = FeedbackConfigResource::categories(&state).unwrap();
        assert_eq!(categories, remote.feedback_config.categories.unwrap());
    }

    #[test]
    fn empty_categories_are_null() {
        let remote = FeedbackConfig {
            feedback_key: "score".to_string(),
            feedback_config: FeedbackConfigBody {
                kind: "continuous".to_string(),
                min: Some(0.0),
                max: Some(1.0),
                categories: Some(vec![]),
            },
            is_lower_score_better: Some(true),
            tenant_id: None,
            modified_at: None,
        };

        let state = FeedbackConfigResource::to_state(&remote);
        assert!(state.attr("categories").is_some_and(Dynamic::is_null));
        assert_eq!(state.number_attr("max"), Some(1.0));
        assert_eq!(state.bool_attr("is_lower_score_better"), Some(true));
    }
}
