//! Helpers shared by resource and data source handlers

use crate::api::{ApiError, Client};
use crate::provider_data::LangSmithProviderData;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::import::{import_state_composite_id, import_state_passthrough_id};
use tfplug::resource::{ImportResourceStateRequest, ImportResourceStateResponse};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

pub fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

/// Diagnostic for a failed API call, e.g. "Failed to create dataset"
pub fn api_error(action: &str, kind: &str, err: &ApiError) -> Diagnostic {
    Diagnostic::error(format!("Failed to {} {}", action, kind), format!("API error: {}", err))
}

/// Extracts provider data handed to a resource or data source. Missing data
/// is not an error here: the host may configure handlers before the provider
/// itself, and every operation reports `not_configured` instead.
pub fn configure(
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
    target: &mut Option<LangSmithProviderData>,
) -> Vec<Diagnostic> {
    let Some(data) = provider_data else {
        return vec![];
    };

    match data.downcast_ref::<LangSmithProviderData>() {
        Some(provider_data) => {
            *target = Some(provider_data.clone());
            vec![]
        }
        None => {
            tracing::error!("Failed to downcast provider data to LangSmithProviderData");
            vec![Diagnostic::error(
                "Invalid provider data",
                "Failed to extract LangSmithProviderData from provider data",
            )]
        }
    }
}

pub fn client(provider_data: &Option<LangSmithProviderData>) -> Result<&Client, Diagnostic> {
    provider_data
        .as_ref()
        .map(|data| data.client.as_ref())
        .ok_or_else(not_configured)
}

pub fn required_string(value: &DynamicValue, name: &str) -> Result<String, Diagnostic> {
    value.string_attr(name).ok_or_else(|| {
        Diagnostic::error(
            format!("Missing {}", name),
            format!("The '{}' attribute is required", name),
        )
        .with_attribute(AttributePath::new(name))
    })
}

/// Parses a JSON-encoded string attribute; null stays None
pub fn json_attr(value: &DynamicValue, name: &str) -> Result<Option<Value>, Diagnostic> {
    value
        .string_attr(name)
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|e| {
                Diagnostic::error(
                    format!("Invalid JSON in {}", name),
                    format!("The '{}' attribute must be valid JSON: {}", name, e),
                )
                .with_attribute(AttributePath::new(name))
            })
        })
        .transpose()
}

/// State representation of a remote JSON value. The previously stored string
/// is kept when it encodes the same value, so formatting differences never
/// show up as drift.
pub fn json_state(remote: Option<&Value>, prior: Option<String>) -> Option<String> {
    let remote = remote.filter(|v| !v.is_null())?;

    if let Some(prior) = prior {
        if serde_json::from_str::<Value>(&prior).ok().as_ref() == Some(remote) {
            return Some(prior);
        }
    }
    serde_json::to_string(remote).ok()
}

/// Set-valued attribute as stored in state: the prior ordering when it holds
/// the same elements, the remote ordering otherwise
pub fn set_state(remote: Vec<String>, prior: Option<Vec<String>>) -> Vec<String> {
    match prior {
        Some(prior) if same_elements(&prior, &remote) => prior,
        _ => remote,
    }
}

fn same_elements(a: &[String], b: &[String]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

/// The API reports unset strings as "", which state stores as null
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Import seeding `id` from the import ID
pub fn import_by_id(ctx: &Context, request: &ImportResourceStateRequest) -> ImportResourceStateResponse {
    import_by_attribute(ctx, "id", request)
}

pub fn import_by_attribute(
    ctx: &Context,
    attribute: &str,
    request: &ImportResourceStateRequest,
) -> ImportResourceStateResponse {
    let mut response = empty_import();
    import_state_passthrough_id(ctx, AttributePath::new(attribute), request, &mut response);
    response
}

/// Import of a nested object from a `parent/child` style ID
pub fn import_by_parts(
    ctx: &Context,
    attributes: &[&str],
    request: &ImportResourceStateRequest,
) -> ImportResourceStateResponse {
    let mut response = empty_import();
    import_state_composite_id(ctx, attributes, request, &mut response);
    response
}

fn empty_import() -> ImportResourceStateResponse {
    ImportResourceStateResponse {
        imported_resources: vec![],
        diagnostics: vec![],
    }
}

/// Data sources look an object up by exactly one of `keys`. Unknown values
/// are accepted until they are known.
pub fn validate_lookup(config: &DynamicValue, keys: &[&str]) -> Vec<Diagnostic> {
    if keys.iter().any(|key| config.is_attr_unknown(key)) {
        return vec![];
    }

    let set = keys
        .iter()
        .filter(|key| config.attr(key).is_some_and(|v| !v.is_null()))
        .count();
    if set == 1 {
        return vec![];
    }

    let names = keys.join(", ");
    let detail = if set == 0 {
        format!("One of {} must be set", names)
    } else {
        format!("Only one of {} may be set", names)
    };
    vec![Diagnostic::error("Invalid lookup", detail)]
}

/// Number attributes the API takes as integers must be non-negative and whole
pub fn validate_whole_numbers(config: &DynamicValue, names: &[&str]) -> Vec<Diagnostic> {
    names
        .iter()
        .filter_map(|name| {
            let value = config.number_attr(name)?;
            (value < 0.0 || value.fract() != 0.0).then(|| {
                Diagnostic::error(
                    format!("Invalid {}", name),
                    format!("{} must be a non-negative whole number, got {}", name, value),
                )
                .with_attribute(AttributePath::new(name))
            })
        })
        .collect()
}

/// Turns a 404 into `None`
pub fn found<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Deleting something that is already gone succeeds
pub fn deleted(result: Result<(), ApiError>) -> Result<(), ApiError> {
    match result {
        Err(e) if e.is_not_found() => {
            tracing::debug!("Object already deleted");
            Ok(())
        }
        other => other,
    }
}

/// Object id stored in state; a missing id means the state is unusable
pub fn state_id(state: &DynamicValue) -> Result<String, Diagnostic> {
    required_string(state, "id")
}
