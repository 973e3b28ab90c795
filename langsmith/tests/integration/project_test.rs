use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::HarnessError;

const PROJECT: &str = r#"{"id":"5f0c","name":"chatbot","description":"prod traces","extra":{"team":"ml"},"reference_dataset_id":null,"default_dataset_id":null,"tenant_id":"t-1","start_time":"2024-05-01T00:00:00"}"#;

const RENAMED: &str = r#"{"id":"5f0c","name":"chatbot","description":"","extra":{"team":"ml"},"reference_dataset_id":null,"default_dataset_id":null,"tenant_id":"t-1","start_time":"2024-05-01T00:00:00"}"#;

fn config() -> serde_json::Value {
    json!({
        "name": "chatbot",
        "description": "prod traces",
        "extra": "{\"team\": \"ml\"}"
    })
}

#[tokio::test]
async fn project_create_read_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", "/api/v1/sessions")
        .match_header("x-api-key", support::API_KEY)
        .match_body(Matcher::Json(json!({
            "name": "chatbot",
            "description": "prod traces",
            "extra": {"team": "ml"}
        })))
        .with_status(201)
        .with_body(PROJECT)
        .create_async()
        .await;

    let state = harness.create("langsmith_project", config()).await.unwrap();
    create.assert_async().await;

    assert_eq!(state.string_attr("id").as_deref(), Some("5f0c"));
    assert_eq!(state.string_attr("tenant_id").as_deref(), Some("t-1"));
    // Configured JSON formatting survives the round trip
    assert_eq!(state.string_attr("extra").as_deref(), Some("{\"team\": \"ml\"}"));
    assert_eq!(state.string_attr("reference_dataset_id"), None);

    let get = server
        .mock("GET", "/api/v1/sessions/5f0c")
        .with_body(PROJECT)
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_project", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    get.remove_async().await;

    let patch = server
        .mock("PATCH", "/api/v1/sessions/5f0c")
        .match_body(Matcher::Json(json!({
            "name": "chatbot",
            "description": null,
            "extra": {"team": "ml"},
            "default_dataset_id": null
        })))
        .with_body("{}")
        .create_async()
        .await;
    let get = server
        .mock("GET", "/api/v1/sessions/5f0c")
        .with_body(RENAMED)
        .create_async()
        .await;

    let updated = harness
        .update(
            "langsmith_project",
            &state,
            json!({"name": "chatbot", "extra": "{\"team\": \"ml\"}"}),
        )
        .await
        .unwrap();
    patch.assert_async().await;
    get.assert_async().await;

    assert_eq!(updated.string_attr("description"), None);
    assert_eq!(updated.string_attr("start_time").as_deref(), Some("2024-05-01T00:00:00"));

    let delete = server
        .mock("DELETE", "/api/v1/sessions/5f0c")
        .with_status(204)
        .create_async()
        .await;

    let warnings = harness.delete("langsmith_project", &updated).await.unwrap();
    assert!(warnings.is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn project_reference_dataset_change_requires_replace() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _create = server
        .mock("POST", "/api/v1/sessions")
        .with_body(PROJECT)
        .create_async()
        .await;
    let state = harness.create("langsmith_project", config()).await.unwrap();

    let mut changed = config();
    changed["reference_dataset_id"] = json!("d-42");

    let err = harness
        .update("langsmith_project", &state, changed)
        .await
        .unwrap_err();
    match err {
        HarnessError::RequiresReplace(attrs) => {
            assert_eq!(attrs, vec!["reference_dataset_id".to_string()])
        }
        other => panic!("expected replacement, got {other}"),
    }
}

#[tokio::test]
async fn project_unchanged_config_plans_no_changes() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _create = server
        .mock("POST", "/api/v1/sessions")
        .with_body(PROJECT)
        .create_async()
        .await;
    let state = harness.create("langsmith_project", config()).await.unwrap();

    let plan = harness
        .plan("langsmith_project", &state, config())
        .await
        .unwrap();
    assert!(!plan.has_changes);
    assert!(plan.requires_replace.is_empty());
}

#[tokio::test]
async fn project_import_and_removed_remotely() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let get = server
        .mock("GET", "/api/v1/sessions/5f0c")
        .with_body(PROJECT)
        .create_async()
        .await;

    let imported = harness.import("langsmith_project", "5f0c").await.unwrap();
    assert_eq!(imported.string_attr("name").as_deref(), Some("chatbot"));
    assert_eq!(imported.string_attr("extra").as_deref(), Some(r#"{"team":"ml"}"#));
    get.remove_async().await;

    let _gone = server
        .mock("GET", "/api/v1/sessions/5f0c")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;

    assert_eq!(harness.read("langsmith_project", &imported).await.unwrap(), None);

    let _delete = server
        .mock("DELETE", "/api/v1/sessions/5f0c")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;

    assert!(harness.delete("langsmith_project", &imported).await.is_ok());
}

#[tokio::test]
async fn project_rejects_invalid_extra_json() {
    let server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let err = harness
        .create("langsmith_project", json!({"name": "chatbot", "extra": "{oops"}))
        .await
        .unwrap_err();
    assert!(err.diagnostics()[0].summary.contains("Invalid JSON in extra"));
}

#[tokio::test]
async fn project_rejects_unknown_arguments() {
    let server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let err = harness
        .create("langsmith_project", json!({"name": "chatbot", "colour": "blue"}))
        .await
        .unwrap_err();
    assert_eq!(err.diagnostics()[0].summary, "Unsupported argument");
}
