use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::DynamicValue;

#[tokio::test]
async fn ttl_settings_upsert_and_delete_warns() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let upsert = server
        .mock("PUT", "/api/v1/ttl-settings")
        .match_body(Matcher::Json(json!({"default_trace_tier": "shortlived"})))
        .with_body(r#"{"id":"ttl-1","default_trace_tier":"shortlived","tenant_id":"t-1"}"#)
        .create_async()
        .await;

    let state = harness
        .create("langsmith_ttl_settings", json!({"default_trace_tier": "shortlived"}))
        .await
        .unwrap();
    upsert.assert_async().await;
    assert_eq!(state.bool_attr("apply_to_all_projects"), Some(false));
    assert_eq!(state.string_attr("tenant_id").as_deref(), Some("t-1"));

    let warnings = harness.delete("langsmith_ttl_settings", &state).await.unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].summary, "TTL settings not deleted");
}

#[tokio::test]
async fn ttl_settings_reject_unknown_tier() {
    let server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let err = harness
        .create("langsmith_ttl_settings", json!({"default_trace_tier": "forever"}))
        .await
        .unwrap_err();
    assert_eq!(err.diagnostics().len(), 1);
}

#[tokio::test]
async fn org_role_permissions_keep_configured_order() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let role = r#"{"id":"role-1","display_name":"Annotator","name":"CUSTOM","permissions":["runs:read","projects:read"],"organization_id":"o-1"}"#;

    let _create = server
        .mock("POST", "/api/v1/orgs/current/roles")
        .with_body(role)
        .create_async()
        .await;
    let _list = server
        .mock("GET", "/api/v1/orgs/current/roles")
        .with_body(format!("[{}]", role))
        .create_async()
        .await;

    let config = json!({
        "display_name": "Annotator",
        "permissions": ["projects:read", "runs:read"]
    });
    let state = harness.create("langsmith_org_role", config.clone()).await.unwrap();
    assert_eq!(
        state.string_list_attr("permissions"),
        Some(vec!["projects:read".to_string(), "runs:read".to_string()])
    );

    let refreshed = harness.read("langsmith_org_role", &state).await.unwrap().unwrap();
    assert_eq!(refreshed, state);

    let plan = harness.plan("langsmith_org_role", &refreshed, config).await.unwrap();
    assert!(!plan.has_changes);
}

#[tokio::test]
async fn bulk_export_delete_cancels_only_running_exports() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let mut running = DynamicValue::object();
    running.set_attr("id", "exp-1");
    let mut finished = DynamicValue::object();
    finished.set_attr("id", "exp-2");

    let _get_running = server
        .mock("GET", "/api/v1/bulk-exports/exp-1")
        .with_body(r#"{"id":"exp-1","bulk_export_destination_id":"d-1","session_id":"s-1","start_time":"2024-01-01T00:00:00Z","status":"Running"}"#)
        .create_async()
        .await;
    let _get_finished = server
        .mock("GET", "/api/v1/bulk-exports/exp-2")
        .with_body(r#"{"id":"exp-2","bulk_export_destination_id":"d-1","session_id":"s-1","start_time":"2024-01-01T00:00:00Z","status":"Completed"}"#)
        .create_async()
        .await;

    let cancel = server
        .mock("PATCH", "/api/v1/bulk-exports/exp-1")
        .match_body(Matcher::Json(json!({"status": "Cancelled"})))
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let untouched = server
        .mock("PATCH", "/api/v1/bulk-exports/exp-2")
        .expect(0)
        .create_async()
        .await;

    harness.delete("langsmith_bulk_export", &running).await.unwrap();
    harness.delete("langsmith_bulk_export", &finished).await.unwrap();

    cancel.assert_async().await;
    untouched.assert_async().await;
}

#[tokio::test]
async fn bulk_export_destination_needs_both_credentials() {
    let server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let err = harness
        .create(
            "langsmith_bulk_export_destination",
            json!({
                "display_name": "archive",
                "bucket_name": "traces",
                "access_key_id": "AKIA123"
            }),
        )
        .await
        .unwrap_err();
    assert!(!err.diagnostics().is_empty());
}

const PLAYGROUND_PATH: &str = "/api/v1/playground-settings";

const PLAYGROUND: &str = r#"{"id":"ps-1","name":"creative","description":null,"settings":{"model":"gpt-4o","temperature":0.9},"created_at":"2024-06-01T00:00:00","updated_at":"2024-06-01T00:00:00"}"#;

fn playground_config() -> serde_json::Value {
    json!({
        "name": "creative",
        "settings": "{\"model\": \"gpt-4o\", \"temperature\": 0.9}"
    })
}

#[tokio::test]
async fn playground_settings_create_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", PLAYGROUND_PATH)
        .match_body(Matcher::Json(json!({
            "name": "creative",
            "description": null,
            "settings": {"model": "gpt-4o", "temperature": 0.9}
        })))
        .with_body(PLAYGROUND)
        .create_async()
        .await;

    let state = harness
        .create("langsmith_playground_settings", playground_config())
        .await
        .unwrap();
    create.assert_async().await;
    assert_eq!(
        state.string_attr("settings").as_deref(),
        Some("{\"model\": \"gpt-4o\", \"temperature\": 0.9}")
    );

    let list = server
        .mock("GET", PLAYGROUND_PATH)
        .with_body(format!("[{}]", PLAYGROUND))
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_playground_settings", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    list.remove_async().await;

    let patch = server
        .mock("PATCH", "/api/v1/playground-settings/ps-1")
        .match_body(Matcher::PartialJson(json!({"name": "creative", "description": "Warm"})))
        .with_body("{}")
        .create_async()
        .await;
    let list = server
        .mock("GET", PLAYGROUND_PATH)
        .with_body(format!(
            "[{}]",
            PLAYGROUND.replace(r#""description":null"#, r#""description":"Warm""#)
        ))
        .create_async()
        .await;

    let mut described = playground_config();
    described["description"] = json!("Warm");
    let updated = harness
        .update("langsmith_playground_settings", &state, described)
        .await
        .unwrap();
    patch.assert_async().await;
    list.assert_async().await;
    assert_eq!(updated.string_attr("description").as_deref(), Some("Warm"));
    list.remove_async().await;

    let _empty = server
        .mock("GET", PLAYGROUND_PATH)
        .with_body("[]")
        .create_async()
        .await;
    assert_eq!(
        harness.read("langsmith_playground_settings", &updated).await.unwrap(),
        None
    );

    let delete = server
        .mock("DELETE", "/api/v1/playground-settings/ps-1")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let warnings = harness
        .delete("langsmith_playground_settings", &updated)
        .await
        .unwrap();
    assert!(warnings.is_empty());
    delete.assert_async().await;
}
