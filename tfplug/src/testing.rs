//! In-process host for driving a provider through its lifecycle
//!
//! `ProviderHarness` does the work the host and plugin server normally do
//! around each handler call: configuration is checked against the schema,
//! plans are computed and run through plan modifiers, state is round-tripped
//! through msgpack, and every operation is bounded by a deadline.
//!
//! ```ignore
//! let mut harness = ProviderHarness::new(MyProvider::default());
//! harness.configure(json!({"api_key": "test"})).await?;
//! let state = harness.create("my_resource", json!({"name": "demo"})).await?;
//! assert_eq!(state.string_attr("name").as_deref(), Some("demo"));
//! ```

use crate::context::Context;
use crate::data_source::{
    ConfigureDataSourceRequest, DataSourceSchemaRequest, DataSourceWithConfigure,
    ReadDataSourceRequest, ValidateDataSourceConfigRequest,
};
use crate::error::TfplugError;
use crate::plan_modifier::{values_equal, PlanModifyRequest};
use crate::provider::{
    ConfigureProviderRequest, DataSourceFactory, Provider, ProviderSchemaRequest,
    ResourceFactory, ValidateProviderConfigRequest,
};
use crate::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest,
    ImportResourceStateRequest, ReadResourceRequest, ResourceSchemaRequest, ResourceWithConfigure,
    UpdateResourceRequest, ValidateResourceConfigRequest,
};
use crate::schema::Schema;
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(300);
const TERRAFORM_VERSION: &str = "1.9.0";

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("unknown resource type: {0}")]
    UnknownResource(String),

    #[error("unknown data source type: {0}")]
    UnknownDataSource(String),

    #[error("{}", format_diagnostics(.0))]
    Diagnostics(Vec<Diagnostic>),

    #[error("operation exceeded its deadline of {0:?}")]
    Timeout(Duration),

    #[error("planned change requires replacement: {}", .0.join(", "))]
    RequiresReplace(Vec<String>),

    #[error("provider left unknown values after apply: {}", .0.join(", "))]
    UnknownAfterApply(Vec<String>),

    #[error("{0} not found after import")]
    ImportNotFound(String),

    #[error(transparent)]
    Framework(#[from] TfplugError),
}

impl HarnessError {
    /// Error diagnostics carried by this error, empty for other variants
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            HarnessError::Diagnostics(diags) => diags,
            _ => &[],
        }
    }
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Result of planning a change against prior state
#[derive(Debug, Clone)]
pub struct Plan {
    pub planned_state: DynamicValue,
    /// Attributes whose change forces a new resource
    pub requires_replace: Vec<String>,
    pub has_changes: bool,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ProviderHarness<P: Provider> {
    provider: P,
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
    resources: HashMap<String, ResourceFactory>,
    data_sources: HashMap<String, DataSourceFactory>,
    operation_timeout: Duration,
}

impl<P: Provider> ProviderHarness<P> {
    pub fn new(provider: P) -> Self {
        let resources = provider.resources();
        let data_sources = provider.data_sources();
        Self {
            provider,
            provider_data: None,
            resources,
            data_sources,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn resource_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn data_source_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data_sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Validates and applies the provider block
    pub async fn configure(&mut self, config: serde_json::Value) -> Result<()> {
        let schema = self
            .provider
            .schema(Context::new(), ProviderSchemaRequest)
            .await;
        check(schema.diagnostics)?;
        let config = normalize_config(&schema.schema, config)?;

        let validated = self
            .provider
            .validate(
                Context::new(),
                ValidateProviderConfigRequest {
                    config: config.clone(),
                },
            )
            .await;
        check(validated.diagnostics)?;

        let ctx = self.context();
        let timeout = self.operation_timeout;
        let provider = &mut self.provider;
        let response = bounded(&ctx, timeout, async {
            provider
                .configure(
                    ctx.clone(),
                    ConfigureProviderRequest {
                        terraform_version: TERRAFORM_VERSION.to_string(),
                        config,
                    },
                )
                .await
        })
        .await?;
        check(response.diagnostics)?;

        self.provider_data = response.provider_data;
        // Factories may capture configuration, so rebuild them
        self.resources = self.provider.resources();
        self.data_sources = self.provider.data_sources();
        Ok(())
    }

    /// Plans and applies a create, returning the new state
    pub async fn create(&self, type_name: &str, config: serde_json::Value) -> Result<DynamicValue> {
        let (resource, schema) = self.resource(type_name).await?;
        let config = self.validated_resource_config(&*resource, &schema, type_name, config).await?;
        let plan = plan_change(&schema, None, &config);
        check(plan.diagnostics)?;

        let ctx = self.context();
        let response = bounded(
            &ctx,
            self.operation_timeout,
            resource.create(
                ctx.clone(),
                CreateResourceRequest {
                    type_name: type_name.to_string(),
                    planned_state: plan.planned_state,
                    config,
                },
            ),
        )
        .await?;
        check(response.diagnostics)?;

        finalize_state(response.new_state)
    }

    /// Refreshes state; None means the remote object is gone
    pub async fn read(&self, type_name: &str, state: &DynamicValue) -> Result<Option<DynamicValue>> {
        let (resource, _) = self.resource(type_name).await?;
        self.read_with(&*resource, type_name, state.clone()).await
    }

    /// Plans a change of an existing resource to the given configuration
    pub async fn plan(
        &self,
        type_name: &str,
        prior_state: &DynamicValue,
        config: serde_json::Value,
    ) -> Result<Plan> {
        let (resource, schema) = self.resource(type_name).await?;
        let config = self.validated_resource_config(&*resource, &schema, type_name, config).await?;
        let plan = plan_change(&schema, Some(prior_state), &config);
        check(plan.diagnostics.clone())?;
        Ok(plan)
    }

    /// Plans and applies an in-place update. A plan that requires
    /// replacement is reported as an error rather than applied.
    pub async fn update(
        &self,
        type_name: &str,
        prior_state: &DynamicValue,
        config: serde_json::Value,
    ) -> Result<DynamicValue> {
        let (resource, schema) = self.resource(type_name).await?;
        let config = self.validated_resource_config(&*resource, &schema, type_name, config).await?;
        let plan = plan_change(&schema, Some(prior_state), &config);
        check(plan.diagnostics)?;

        if !plan.requires_replace.is_empty() {
            return Err(HarnessError::RequiresReplace(plan.requires_replace));
        }
        if !plan.has_changes {
            return Ok(prior_state.clone());
        }

        let ctx = self.context();
        let response = bounded(
            &ctx,
            self.operation_timeout,
            resource.update(
                ctx.clone(),
                UpdateResourceRequest {
                    type_name: type_name.to_string(),
                    prior_state: prior_state.clone(),
                    planned_state: plan.planned_state,
                    config,
                },
            ),
        )
        .await?;
        check(response.diagnostics)?;

        finalize_state(response.new_state)
    }

    /// Destroys the resource, returning any warnings the handler emitted
    pub async fn delete(&self, type_name: &str, prior_state: &DynamicValue) -> Result<Vec<Diagnostic>> {
        let (resource, _) = self.resource(type_name).await?;

        let ctx = self.context();
        let response = bounded(
            &ctx,
            self.operation_timeout,
            resource.delete(
                ctx.clone(),
                DeleteResourceRequest {
                    type_name: type_name.to_string(),
                    prior_state: prior_state.clone(),
                },
            ),
        )
        .await?;
        check(response.diagnostics)
    }

    /// Imports by ID and refreshes the imported state, the way `terraform import` does
    pub async fn import(&self, type_name: &str, id: &str) -> Result<DynamicValue> {
        let (resource, _) = self.resource(type_name).await?;

        let ctx = self.context();
        let response = bounded(
            &ctx,
            self.operation_timeout,
            resource.import_state(
                ctx.clone(),
                ImportResourceStateRequest {
                    type_name: type_name.to_string(),
                    id: id.to_string(),
                },
            ),
        )
        .await?;
        check(response.diagnostics)?;

        let imported = response
            .imported_resources
            .into_iter()
            .find(|r| r.type_name == type_name)
            .ok_or_else(|| HarnessError::ImportNotFound(format!("{} {}", type_name, id)))?;

        self.read_with(&*resource, type_name, imported.state)
            .await?
            .ok_or_else(|| HarnessError::ImportNotFound(format!("{} {}", type_name, id)))
    }

    pub async fn read_data_source(
        &self,
        type_name: &str,
        config: serde_json::Value,
    ) -> Result<DynamicValue> {
        let data_source = self.data_source(type_name).await?;
        let schema = data_source
            .schema(Context::new(), DataSourceSchemaRequest)
            .await;
        check(schema.diagnostics)?;
        let config = normalize_config(&schema.schema, config)?;

        let validated = data_source
            .validate(
                Context::new(),
                ValidateDataSourceConfigRequest {
                    type_name: type_name.to_string(),
                    config: config.clone(),
                },
            )
            .await;
        check(validated.diagnostics)?;

        let ctx = self.context();
        let response = bounded(
            &ctx,
            self.operation_timeout,
            data_source.read(
                ctx.clone(),
                ReadDataSourceRequest {
                    type_name: type_name.to_string(),
                    config,
                },
            ),
        )
        .await?;
        check(response.diagnostics)?;

        finalize_state(response.state)
    }

    fn context(&self) -> Context {
        Context::new().with_timeout(self.operation_timeout)
    }

    async fn resource(&self, type_name: &str) -> Result<(Box<dyn ResourceWithConfigure>, Schema)> {
        let factory = self
            .resources
            .get(type_name)
            .ok_or_else(|| HarnessError::UnknownResource(type_name.to_string()))?;

        let mut resource = factory();
        let configured = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: self.provider_data.clone(),
                },
            )
            .await;
        check(configured.diagnostics)?;

        let schema = resource.schema(Context::new(), ResourceSchemaRequest).await;
        check(schema.diagnostics)?;

        Ok((resource, schema.schema))
    }

    async fn data_source(&self, type_name: &str) -> Result<Box<dyn DataSourceWithConfigure>> {
        let factory = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| HarnessError::UnknownDataSource(type_name.to_string()))?;

        let mut data_source = factory();
        let configured = data_source
            .configure(
                Context::new(),
                ConfigureDataSourceRequest {
                    provider_data: self.provider_data.clone(),
                },
            )
            .await;
        check(configured.diagnostics)?;

        Ok(data_source)
    }

    async fn validated_resource_config(
        &self,
        resource: &dyn ResourceWithConfigure,
        schema: &Schema,
        type_name: &str,
        config: serde_json::Value,
    ) -> Result<DynamicValue> {
        let config = normalize_config(schema, config)?;
        let validated = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: type_name.to_string(),
                    config: config.clone(),
                },
            )
            .await;
        check(validated.diagnostics)?;
        Ok(config)
    }

    async fn read_with(
        &self,
        resource: &dyn ResourceWithConfigure,
        type_name: &str,
        state: DynamicValue,
    ) -> Result<Option<DynamicValue>> {
        let ctx = self.context();
        let response = bounded(
            &ctx,
            self.operation_timeout,
            resource.read(
                ctx.clone(),
                ReadResourceRequest {
                    type_name: type_name.to_string(),
                    current_state: state,
                },
            ),
        )
        .await?;
        check(response.diagnostics)?;

        response.new_state.map(finalize_state).transpose()
    }
}

/// Runs the future until it completes or the context is cancelled
async fn bounded<T, F>(ctx: &Context, timeout: Duration, future: F) -> Result<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        output = future => Ok(output),
        _ = ctx.cancelled() => Err(HarnessError::Timeout(timeout)),
    }
}

/// Splits diagnostics into a hard failure on errors, or the warnings otherwise
fn check(diagnostics: Vec<Diagnostic>) -> Result<Vec<Diagnostic>> {
    let (errors, warnings): (Vec<_>, Vec<_>) =
        diagnostics.into_iter().partition(Diagnostic::is_error);

    if !errors.is_empty() {
        return Err(HarnessError::Diagnostics(errors));
    }
    for warning in &warnings {
        tracing::warn!(summary = %warning.summary, detail = %warning.detail, "provider warning");
    }
    Ok(warnings)
}

/// Checks a JSON configuration object against the schema and fills every
/// attribute the configuration leaves out with null
fn normalize_config(schema: &Schema, config: serde_json::Value) -> Result<DynamicValue> {
    let mut provided = match Dynamic::from(config) {
        Dynamic::Null => HashMap::new(),
        Dynamic::Map(map) => map,
        other => {
            return Err(HarnessError::Diagnostics(vec![Diagnostic::error(
                "Invalid configuration",
                format!("configuration must be an object, got {}", other.type_name()),
            )]))
        }
    };

    let mut diagnostics = Vec::new();
    let mut unsupported: Vec<&String> = provided
        .keys()
        .filter(|k| schema.attribute(k).is_none())
        .collect();
    unsupported.sort();
    for name in unsupported {
        diagnostics.push(
            Diagnostic::error(
                "Unsupported argument",
                format!("An argument named \"{}\" is not expected here.", name),
            )
            .with_attribute(AttributePath::new(name)),
        );
    }

    let mut normalized = DynamicValue::object();
    for attr in &schema.block.attributes {
        let value = provided.remove(&attr.name).unwrap_or_default();
        let path = AttributePath::new(&attr.name);

        if attr.required && value.is_null() {
            diagnostics.push(
                Diagnostic::error(
                    "Missing required argument",
                    format!("The argument \"{}\" is required, but no definition was found.", attr.name),
                )
                .with_attribute(path),
            );
        } else if attr.is_computed_only() && !value.is_null() {
            diagnostics.push(
                Diagnostic::error(
                    "Value for unconfigurable attribute",
                    format!("Can't configure a value for \"{}\": its value will be decided automatically.", attr.name),
                )
                .with_attribute(path),
            );
        } else if !attr.r#type.accepts(&value) {
            diagnostics.push(
                Diagnostic::error(
                    "Incorrect attribute value type",
                    format!("Inappropriate value for attribute \"{}\": {} required.", attr.name, attr.r#type),
                )
                .with_attribute(path),
            );
        }

        normalized.set_attr(&attr.name, value);
    }

    if diagnostics.is_empty() {
        Ok(normalized)
    } else {
        Err(HarnessError::Diagnostics(diagnostics))
    }
}

/// Computes the planned state for a configuration, given optional prior state
fn plan_change(schema: &Schema, prior: Option<&DynamicValue>, config: &DynamicValue) -> Plan {
    let prior_value = |name: &str| prior.map(|p| p.attr(name).cloned().unwrap_or_default());

    // Proposed new state: configuration wins, computed attributes keep their prior value
    let mut proposed = DynamicValue::object();
    for attr in &schema.block.attributes {
        let configured = config.attr(&attr.name).cloned().unwrap_or_default();
        let value = if !configured.is_null() || !attr.computed {
            configured
        } else {
            prior_value(&attr.name).unwrap_or(Dynamic::Unknown)
        };
        proposed.set_attr(&attr.name, value);
    }

    // Any change makes unconfigured computed values unknown again
    let changed = prior.map_or(true, |p| !values_equal(&p.value, &proposed.value));
    if changed {
        for attr in schema.block.attributes.iter().filter(|a| a.computed) {
            if config.attr(&attr.name).map_or(true, Dynamic::is_null) {
                proposed.set_attr(&attr.name, Dynamic::Unknown);
            }
        }
    }

    let mut requires_replace = Vec::new();
    let mut diagnostics = Vec::new();
    for attr in &schema.block.attributes {
        for modifier in &attr.plan_modifiers {
            let response = modifier.modify(PlanModifyRequest {
                attribute: attr.name.clone(),
                config: config.attr(&attr.name).cloned().unwrap_or_default(),
                state: prior_value(&attr.name),
                plan: proposed.attr(&attr.name).cloned().unwrap_or_default(),
            });
            proposed.set_attr(&attr.name, response.plan);
            diagnostics.extend(response.diagnostics);
            if response.requires_replace && !requires_replace.contains(&attr.name) {
                requires_replace.push(attr.name.clone());
            }
        }
    }

    let has_changes = prior.map_or(true, |p| !values_equal(&p.value, &proposed.value));

    Plan {
        planned_state: proposed,
        requires_replace,
        has_changes,
        diagnostics,
    }
}

/// Round-trips state through the wire encoding and rejects leftover unknowns
fn finalize_state(state: DynamicValue) -> Result<DynamicValue> {
    let encoded = state.encode_msgpack()?;
    let state = DynamicValue::decode_msgpack(&encoded)?;

    if let Some(map) = state.value.as_map() {
        let mut unknown: Vec<String> = map
            .iter()
            .filter(|(_, v)| v.contains_unknown())
            .map(|(k, _)| k.clone())
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(HarnessError::UnknownAfterApply(unknown));
        }
    } else if state.value.contains_unknown() {
        return Err(HarnessError::UnknownAfterApply(vec!["<root>".to_string()]));
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{
        ConfigureDataSourceResponse, DataSource, DataSourceSchemaResponse, ReadDataSourceResponse,
    };
    use crate::provider::{ConfigureProviderResponse, ProviderSchemaResponse};
    use crate::resource::{
        ConfigureResourceResponse, CreateResourceResponse, DeleteResourceResponse,
        ImportResourceStateResponse, ReadResourceResponse, Resource, ResourceSchemaResponse,
        UpdateResourceResponse,
    };
    use crate::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    type Store = Arc<Mutex<HashMap<String, DynamicValue>>>;

    #[derive(Default)]
    struct NotesProvider {
        store: Store,
        slow: bool,
    }

    struct NoteResource {
        store: Option<Store>,
        slow: bool,
    }

    struct NoteDataSource {
        store: Option<Store>,
    }

    fn note_schema() -> Schema {
        SchemaBuilder::new()
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .use_state_for_unknown()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("title", AttributeType::String)
                    .required()
                    .requires_replace()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("body", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("revision", AttributeType::Number)
                    .computed()
                    .build(),
            )
            .build()
    }

    #[async_trait]
    impl Provider for NotesProvider {
        fn type_name(&self) -> &str {
            "notes"
        }

        async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
            ProviderSchemaResponse {
                schema: SchemaBuilder::new()
                    .attribute(
                        AttributeBuilder::new("token", AttributeType::String)
                            .optional()
                            .sensitive()
                            .build(),
                    )
                    .build(),
                diagnostics: vec![],
            }
        }

        async fn configure(
            &mut self,
            _ctx: Context,
            request: ConfigureProviderRequest,
        ) -> ConfigureProviderResponse {
            if request.config.string_attr("token").as_deref() == Some("bad") {
                return ConfigureProviderResponse {
                    diagnostics: vec![Diagnostic::error("Invalid token", "")],
                    provider_data: None,
                };
            }
            ConfigureProviderResponse {
                diagnostics: vec![],
                provider_data: Some(Arc::new(self.store.clone())),
            }
        }

        fn resources(&self) -> HashMap<String, ResourceFactory> {
            let slow = self.slow;
            let mut resources: HashMap<String, ResourceFactory> = HashMap::new();
            resources.insert(
                "notes_note".to_string(),
                Box::new(move || Box::new(NoteResource { store: None, slow }) as Box<dyn ResourceWithConfigure>),
            );
            resources
        }

        fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
            let mut data_sources: HashMap<String, DataSourceFactory> = HashMap::new();
            data_sources.insert(
                "notes_note".to_string(),
                Box::new(|| Box::new(NoteDataSource { store: None }) as Box<dyn DataSourceWithConfigure>),
            );
            data_sources
        }
    }

    fn downcast(provider_data: Option<Arc<dyn Any + Send + Sync>>) -> Option<Store> {
        provider_data.and_then(|d| d.downcast_ref::<Store>().cloned())
    }

    #[async_trait]
    impl Resource for NoteResource {
        fn type_name(&self) -> &str {
            "notes_note"
        }

        async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
            ResourceSchemaResponse {
                schema: note_schema(),
                diagnostics: vec![],
            }
        }

        async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
            if self.slow {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            let Some(store) = &self.store else {
                return CreateResourceResponse::failed(
                    request.planned_state,
                    Diagnostic::error("Provider not configured", ""),
                );
            };
            let mut state = request.planned_state;
            let id = format!("note-{}", store.lock().unwrap().len() + 1);
            state.set_attr("id", id.clone());
            state.set_attr("revision", 1_i64);
            store.lock().unwrap().insert(id, state.clone());
            CreateResourceResponse::new(state)
        }

        async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
            let id = request.current_state.string_attr("id").unwrap_or_default();
            match self.store.as_ref().and_then(|s| s.lock().unwrap().get(&id).cloned()) {
                Some(state) => ReadResourceResponse::found(state),
                None => ReadResourceResponse::removed(),
            }
        }

        async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
            let mut state = request.planned_state;
            let revision = request.prior_state.int_attr("revision").unwrap_or_default();
            state.set_attr("revision", revision + 1);
            if let (Some(store), Some(id)) = (&self.store, state.string_attr("id")) {
                store.lock().unwrap().insert(id, state.clone());
            }
            UpdateResourceResponse::new(state)
        }

        async fn delete(&self, _ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
            if let (Some(store), Some(id)) = (&self.store, request.prior_state.string_attr("id")) {
                store.lock().unwrap().remove(&id);
            }
            DeleteResourceResponse::with_diagnostic(Diagnostic::warning("Deleted", "note removed"))
        }

        async fn import_state(
            &self,
            ctx: Context,
            request: ImportResourceStateRequest,
        ) -> ImportResourceStateResponse {
            let mut response = ImportResourceStateResponse {
                imported_resources: vec![],
                diagnostics: vec![],
            };
            crate::import::import_state_passthrough_id(&ctx, AttributePath::new("id"), &request, &mut response);
            response
        }
    }

    #[async_trait]
    impl ResourceWithConfigure for NoteResource {
        async fn configure(&mut self, _ctx: Context, request: ConfigureResourceRequest) -> ConfigureResourceResponse {
            self.store = downcast(request.provider_data);
            ConfigureResourceResponse { diagnostics: vec![] }
        }
    }

    #[async_trait]
    impl DataSource for NoteDataSource {
        fn type_name(&self) -> &str {
            "notes_note"
        }

        async fn schema(&self, _ctx: Context, _request: DataSourceSchemaRequest) -> DataSourceSchemaResponse {
            DataSourceSchemaResponse {
                schema: SchemaBuilder::new()
                    .attribute(AttributeBuilder::new("id", AttributeType::String).required().build())
                    .attribute(AttributeBuilder::new("title", AttributeType::String).computed().build())
                    .build(),
                diagnostics: vec![],
            }
        }

        async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
            let id = request.config.string_attr("id").unwrap_or_default();
            match self.store.as_ref().and_then(|s| s.lock().unwrap().get(&id).cloned()) {
                Some(note) => {
                    let mut state = request.config;
                    state.copy_attr("title", &note);
                    ReadDataSourceResponse::new(state)
                }
                None => ReadDataSourceResponse::failed(
                    request.config,
                    Diagnostic::error("Note not found", format!("no note with id {}", id)),
                ),
            }
        }
    }

    #[async_trait]
    impl DataSourceWithConfigure for NoteDataSource {
        async fn configure(&mut self, _ctx: Context, request: ConfigureDataSourceRequest) -> ConfigureDataSourceResponse {
            self.store = downcast(request.provider_data);
            ConfigureDataSourceResponse { diagnostics: vec![] }
        }
    }

    async fn configured() -> ProviderHarness<NotesProvider> {
        let mut harness = ProviderHarness::new(NotesProvider::default());
        harness.configure(json!({"token": "t"})).await.unwrap();
        harness
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let harness = configured().await;

        let created = harness
            .create("notes_note", json!({"title": "hello", "body": "first"}))
            .await
            .unwrap();
        assert_eq!(created.string_attr("id").as_deref(), Some("note-1"));
        assert_eq!(created.int_attr("revision"), Some(1));

        let updated = harness
            .update("notes_note", &created, json!({"title": "hello", "body": "second"}))
            .await
            .unwrap();
        assert_eq!(updated.string_attr("id").as_deref(), Some("note-1"));
        assert_eq!(updated.string_attr("body").as_deref(), Some("second"));
        assert_eq!(updated.int_attr("revision"), Some(2));

        let warnings = harness.delete("notes_note", &updated).await.unwrap();
        assert_eq!(warnings.len(), 1);

        assert!(harness.read("notes_note", &updated).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn plan_marks_computed_unknown_and_keeps_stable_ids() {
        let harness = configured().await;
        let created = harness
            .create("notes_note", json!({"title": "hello"}))
            .await
            .unwrap();

        let plan = harness
            .plan("notes_note", &created, json!({"title": "hello", "body": "new"}))
            .await
            .unwrap();
        assert!(plan.has_changes);
        assert!(plan.requires_replace.is_empty());
        assert_eq!(plan.planned_state.string_attr("id").as_deref(), Some("note-1"));
        assert!(plan.planned_state.is_attr_unknown("revision"));

        let noop = harness
            .plan("notes_note", &created, json!({"title": "hello"}))
            .await
            .unwrap();
        assert!(!noop.has_changes);
    }

    #[tokio::test]
    async fn update_of_immutable_attribute_requires_replace() {
        let harness = configured().await;
        let created = harness
            .create("notes_note", json!({"title": "hello"}))
            .await
            .unwrap();

        let err = harness
            .update("notes_note", &created, json!({"title": "goodbye"}))
            .await
            .unwrap_err();
        match err {
            HarnessError::RequiresReplace(attrs) => assert_eq!(attrs, vec!["title".to_string()]),
            other => panic!("expected RequiresReplace, got {other}"),
        }
    }

    #[tokio::test]
    async fn config_is_checked_against_schema() {
        let harness = configured().await;

        let err = harness
            .create("notes_note", json!({"body": 1, "colour": "red", "id": "x"}))
            .await
            .unwrap_err();
        let summaries: Vec<&str> = err.diagnostics().iter().map(|d| d.summary.as_str()).collect();

        assert!(summaries.contains(&"Unsupported argument"));
        assert!(summaries.contains(&"Missing required argument"));
        assert!(summaries.contains(&"Value for unconfigurable attribute"));
        assert!(summaries.contains(&"Incorrect attribute value type"));
    }

    #[tokio::test]
    async fn import_then_read() {
        let harness = configured().await;
        let created = harness
            .create("notes_note", json!({"title": "hello"}))
            .await
            .unwrap();

        let imported = harness.import("notes_note", "note-1").await.unwrap();
        assert_eq!(imported, created);

        let missing = harness.import("notes_note", "note-9").await.unwrap_err();
        assert!(matches!(missing, HarnessError::ImportNotFound(_)));
    }

    #[tokio::test]
    async fn data_source_reads_and_reports_errors() {
        let harness = configured().await;
        harness
            .create("notes_note", json!({"title": "hello"}))
            .await
            .unwrap();

        let note = harness
            .read_data_source("notes_note", json!({"id": "note-1"}))
            .await
            .unwrap();
        assert_eq!(note.string_attr("title").as_deref(), Some("hello"));

        let err = harness
            .read_data_source("notes_note", json!({"id": "note-2"}))
            .await
            .unwrap_err();
        assert_eq!(err.diagnostics()[0].summary, "Note not found");
    }

    #[tokio::test]
    async fn configure_errors_surface_as_diagnostics() {
        let mut harness = ProviderHarness::new(NotesProvider::default());
        let err = harness.configure(json!({"token": "bad"})).await.unwrap_err();
        assert_eq!(err.diagnostics()[0].summary, "Invalid token");
    }

    #[tokio::test]
    async fn unknown_types_are_rejected() {
        let harness = configured().await;
        assert!(matches!(
            harness.create("notes_missing", json!({})).await,
            Err(HarnessError::UnknownResource(_))
        ));
        assert!(matches!(
            harness.read_data_source("notes_missing", json!({})).await,
            Err(HarnessError::UnknownDataSource(_))
        ));
        assert_eq!(harness.resource_types(), vec!["notes_note".to_string()]);
    }

    #[tokio::test]
    async fn slow_operations_hit_the_deadline() {
        let provider = NotesProvider {
            slow: true,
            ..NotesProvider::default()
        };
        let mut harness = ProviderHarness::new(provider).with_operation_timeout(Duration::from_millis(50));
        harness.configure(json!({})).await.unwrap();

        let err = harness
            .create("notes_note", json!({"title": "hello"}))
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::Timeout(_)));
    }

    #[test]
    fn leftover_unknowns_are_rejected() {
        let mut state = DynamicValue::object();
        state.set_attr("id", Dynamic::Unknown);
        let err = finalize_state(state).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownAfterApply(attrs) if attrs == vec!["id".to_string()]));
    }
}
