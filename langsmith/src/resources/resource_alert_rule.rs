//! Project alert rule resource implementation
//!
//! Rules are nested under a project; imports take `session_id/id`.

use crate::api::alerts::{AlertRule, AlertRuleBody, AlertRuleRequest};
use crate::common;
use crate::provider_data::LangSmithProviderData;
use async_trait::async_trait;
use serde_json::Value;
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
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

#[derive(Default)]
pub struct AlertRuleResource {
    provider_data: Option<LangSmithProviderData>,
}

impl AlertRuleResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_state(session_id: &str, id: &str, alert: &AlertRule, prior: &DynamicValue) -> DynamicValue {
        let rule = &alert.rule;
        let actions = (!alert.actions.is_empty()).then(|| Value::Array(alert.actions.clone()));

        let mut state = DynamicValue::object();
        state.set_attr("id", id);
        state.set_attr("session_id", session_id);
        state.set_attr("name", rule.name.as_str());
        state.set_attr("description", common::non_empty(rule.description.clone()));
        state.set_attr("attribute", rule.attribute.as_str());
        state.set_attr("aggregation", rule.aggregation.as_str());
        state.set_attr("operator", rule.operator.as_str());
        state.set_attr("threshold", rule.threshold);
        state.set_attr("window_minutes", rule.window_minutes);
        state.set_attr("filter", common::non_empty(rule.filter.clone()));
        state.set_attr(
            "actions",
            common::json_state(actions.as_ref(), prior.string_attr("actions")),
        );
        state
    }

    fn request(config: &DynamicValue, id: Option<String>) -> Result<AlertRuleRequest, Diagnostic> {
        let actions = match common::json_attr(config, "actions")? {
            None => vec![],
            Some(Value::Array(actions)) => actions,
            Some(_) => {
                return Err(Diagnostic::error(
                    "Invalid actions",
                    "The 'actions' attribute must be a JSON array",
                )
                .with_attribute(AttributePath::new("actions")))
            }
        };
        let threshold = config.number_attr("threshold").ok_or_else(|| {
            Diagnostic::error("Missing threshold", "The 'threshold' attribute is required")
                .with_attribute(AttributePath::new("threshold"))
        })?;
        let window_minutes = config.int_attr("window_minutes").ok_or_else(|| {
            Diagnostic::error(
                "Missing window_minutes",
                "The 'window_minutes' attribute is required",
            )
            .with_attribute(AttributePath::new("window_minutes"))
        })?;

        Ok(AlertRuleRequest {
            rule: AlertRuleBody {
                id,
                name: common::required_string(config, "name")?,
                description: config.string_attr("description"),
                attribute: common::required_string(config, "attribute")?,
                aggregation: common::required_string(config, "aggregation")?,
                operator: common::required_string(config, "operator")?,
                threshold,
                window_minutes,
                filter: config.string_attr("filter"),
            },
            actions,
        })
    }

    async fn create_alert(&self, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let session_id = common::required_string(config, "session_id")?;

        let alert = client
            .alerts()
            .create(&session_id, &Self::request(config, None)?)
            .await
            .map_err(|e| common::api_error("create", "alert rule", &e))?;

        let id = alert.id().map(str::to_string).ok_or_else(|| {
            Diagnostic::error(
                "Failed to create alert rule",
                "The API response did not include a rule ID",
            )
        })?;
        tracing::debug!(id = %id, session_id = %session_id, "Created alert rule");

        Ok(Self::to_state(&session_id, &id, &alert, config))
    }

    async fn read_alert(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let session_id = common::required_string(state, "session_id")?;
        let id = common::state_id(state)?;

        let alert = common::found(client.alerts().get(&session_id, &id).await)
            .map_err(|e| common::api_error("read", "alert rule", &e))?;

        Ok(alert.map(|a| Self::to_state(&session_id, &id, &a, state)))
    }

    async fn update_alert(&self, prior: &DynamicValue, config: &DynamicValue) -> Result<DynamicValue, Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let session_id = common::required_string(prior, "session_id")?;
        let id = common::state_id(prior)?;

        client
            .alerts()
            .update(&session_id, &id, &Self::request(config, Some(id.clone()))?)
            .await
            .map_err(|e| common::api_error("update", "alert rule", &e))?;

        let alert = client
            .alerts()
            .get(&session_id, &id)
            .await
            .map_err(|e| common::api_error("read", "alert rule", &e))?;

        Ok(Self::to_state(&session_id, &id, &alert, config))
    }

    async fn delete_alert(&self, state: &DynamicValue) -> Result<(), Diagnostic> {
        let client = common::client(&self.provider_data)?;
        let session_id = common::required_string(state, "session_id")?;
        let id = common::state_id(state)?;

        common::deleted(client.alerts().delete(&session_id, &id).await)
            .map_err(|e| common::api_error("delete", "alert rule", &e))
    }
}

#[async_trait]
impl Resource for AlertRuleResource {
    fn type_name(&self) -> &str {
        "langsmith_alert_rule"
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        let required = |name: &str, description: &str| {
            AttributeBuilder::new(name, AttributeType::String)
                .description(description)
                .required()
                .build()
        };

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages an alert on an aggregated metric of a project's runs")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("session_id", AttributeType::String)
                    .description("Project the alert watches")
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(required("name", "Alert name"))
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(required("attribute", "Metric to watch, e.g. latency or error_count"))
            .attribute(required("aggregation", "How the metric is aggregated, e.g. avg or sum"))
            .attribute(required("operator", "Comparison against the threshold, gte or lte"))
            .attribute(
                AttributeBuilder::new("threshold", AttributeType::Number)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("window_minutes", AttributeType::Number)
                    .description("Aggregation window")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("filter", AttributeType::String)
                    .description("Run filter applied before aggregation")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("actions", AttributeType::String)
                    .description("JSON array of notification actions")
                    .optional()
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
            diagnostics: common::validate_whole_numbers(&request.config, &["window_minutes"]),
        }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_alert(&request.config).await {
            Ok(state) => CreateResourceResponse::new(state),
            Err(diag) => CreateResourceResponse::failed(request.planned_state, diag),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.read_alert(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => ReadResourceResponse::removed(),
            Err(diag) => ReadResourceResponse::failed(request.current_state, diag),
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self.update_alert(&request.prior_state, &request.config).await {
            Ok(state) => UpdateResourceResponse::new(state),
            Err(diag) => UpdateResourceResponse::failed(request.prior_state, diag),
        }
    }

    async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        match self.delete_alert(&request.prior_state).await {
            Ok(()) => DeleteResourceResponse::ok(),
            Err(diag) => DeleteResourceResponse::with_diagnostic(diag),
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        common::import_by_parts(&ctx, &["session_id", "id"], &request)
    }
}

#[async_trait]
impl ResourceWithConfigure for AlertRuleResource {
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

    fn config(actions: Option<&str>) -> DynamicValue {
        let mut config = DynamicValue::object();
        config.set_attr("session_id", "s1");
        config.set_attr("name", "slow");
        config.set_attr("attribute", "latency");
        config.set_attr("aggregation", "avg");
        config.set_attr("operator", "gte");
        config.set_attr("threshold", 2.5);
        config.set_attr("window_minutes", 15i64);
        config.set_attr("actions", actions);
        config
    }

    #[test]
    fn request_parses_actions_array() {
        let request =
            AlertRuleResource::request(&config(Some(r#"[{"target":"webhook"}]"#)), None).unwrap();
        assert_eq!(request.actions.len(), 1);
        assert_eq!(request.rule.window_minutes, 15);
        assert!(request.rule.id.is_none());
    }

    #[test]
    fn request_rejects_non_array_actions() {
        let err = AlertRuleResource::request(&config(Some(r#"{"target":"webhook"}"#)), None)
            .unwrap_err();
        assert_eq!(err.summary, "Invalid actions");
    }

    #[test]
    fn empty_actions_read_back_as_null() {
        let alert = AlertRule {
            rule: AlertRuleResource::request(&config(None), Some("a1".to_string()))
                .unwrap()
                .rule,
            actions: vec![],
        };

        let state = AlertRuleResource::to_state("s1", "a1", &alert, &DynamicValue::object());
        assert!(state.string_attr("actions").is_none());
        assert_eq!(state.number_attr("threshold"), Some(2.5));
    }
}
