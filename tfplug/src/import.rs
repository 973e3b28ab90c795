//! Import helpers for simplifying resource import implementations

use crate::context::Context;
use crate::resource::{ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource};
use crate::types::{AttributePath, Diagnostic, DynamicValue};

/// Sets the import ID to a specific attribute in state
///
/// Example: ID "5f1c..." -> state.id = "5f1c..."
pub fn import_state_passthrough_id(
    _ctx: &Context,
    attr_path: AttributePath,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    let mut state = DynamicValue::object();

    if let Err(e) = state.set_string(&attr_path, request.id.clone()) {
        response.diagnostics.push(
            Diagnostic::error(
                format!("Failed to set import ID: {}", e),
                format!("Could not set attribute '{}' to value '{}'", attr_path, request.id),
            )
            .with_attribute(attr_path),
        );
        return;
    }

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state,
    });
}

/// Splits a composite import ID on '/' and assigns each part to an attribute
///
/// Example: ID "queue-id/run-id" with attributes ["queue_id", "run_id"]
/// -> state.queue_id = "queue-id", state.run_id = "run-id"
///
/// The last attribute receives the remainder, so it may itself contain '/'.
pub fn import_state_composite_id(
    _ctx: &Context,
    attributes: &[&str],
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    let parts: Vec<&str> = request.id.splitn(attributes.len().max(1), '/').collect();

    if parts.len() != attributes.len() || parts.iter().any(|p| p.is_empty()) {
        response.diagnostics.push(Diagnostic::error(
            "Invalid import ID",
            format!(
                "Expected an import ID of the form {}, got '{}'",
                attributes.join("/"),
                request.id
            ),
        ));
        return;
    }

    let mut state = DynamicValue::object();
    for (attr, part) in attributes.iter().zip(parts) {
        state.set_attr(attr, part);
    }

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str) -> ImportResourceStateRequest {
        ImportResourceStateRequest {
            type_name: "langsmith_example".to_string(),
            id: id.to_string(),
        }
    }

    fn empty_response() -> ImportResourceStateResponse {
        ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        }
    }

    #[test]
    fn passthrough_sets_id() {
        let ctx = Context::new();
        let mut response = empty_response();

        import_state_passthrough_id(&ctx, AttributePath::new("id"), &request("abc"), &mut response);

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.imported_resources.len(), 1);
        assert_eq!(
            response.imported_resources[0].state.string_attr("id"),
            Some("abc".to_string())
        );
        assert_eq!(response.imported_resources[0].type_name, "langsmith_example");
    }

    #[test]
    fn composite_id_splits_into_attributes() {
        let ctx = Context::new();
        let mut response = empty_response();

        import_state_composite_id(
            &ctx,
            &["repo_handle", "commit_hash"],
            &request("my-prompt/abc123"),
            &mut response,
        );

        let state = &response.imported_resources[0].state;
        assert_eq!(state.string_attr("repo_handle"), Some("my-prompt".to_string()));
        assert_eq!(state.string_attr("commit_hash"), Some("abc123".to_string()));
    }

    #[test]
    fn composite_id_rejects_missing_parts() {
        let ctx = Context::new();
        let mut response = empty_response();

        import_state_composite_id(&ctx, &["tag_key_id", "id"], &request("only-one"), &mut response);

        assert!(response.imported_resources.is_empty());
        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0].detail.contains("tag_key_id/id"));
    }

    #[test]
    fn composite_id_rejects_empty_parts() {
        let ctx = Context::new();
        let mut response = empty_response();

        import_state_composite_id(&ctx, &["tag_key_id", "id"], &request("/abc"), &mut response);

        assert!(response.imported_resources.is_empty());
        assert!(response.diagnostics[0].is_error());
    }
}
