use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;
use std::collections::HashMap;

const RULES_PATH: &str = "/api/v1/runs/rules";

const RULE: &str = r#"{"id":"r-1","display_name":"sample errors","session_id":"s-1","dataset_id":null,"sampling_rate":0.25,"filter":"eq(error, true)","trace_filter":null,"tree_filter":null,"is_enabled":true,"add_to_annotation_queue_id":null,"add_to_dataset_id":"d-1","created_at":"2024-06-01T00:00:00","updated_at":"2024-06-01T00:00:00"}"#;

const OTHER_RULE: &str = r#"{"id":"r-9","display_name":"someone else","dataset_id":"d-9"}"#;

fn rule_config() -> serde_json::Value {
    json!({
        "display_name": "sample errors",
        "session_id": "s-1",
        "sampling_rate": 0.25,
        "filter": "eq(error, true)",
        "add_to_dataset_id": "d-1"
    })
}

#[tokio::test]
async fn run_rule_create_read_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", RULES_PATH)
        .match_body(Matcher::Json(json!({
            "display_name": "sample errors",
            "session_id": "s-1",
            "dataset_id": null,
            "sampling_rate": 0.25,
            "filter": "eq(error, true)",
            "trace_filter": null,
            "tree_filter": null,
            "is_enabled": true,
            "add_to_annotation_queue_id": null,
            "add_to_dataset_id": "d-1"
        })))
        .with_body(RULE)
        .create_async()
        .await;

    let state = harness.create("langsmith_run_rule", rule_config()).await.unwrap();
    create.assert_async().await;
    assert_eq!(state.string_attr("id").as_deref(), Some("r-1"));
    assert_eq!(state.bool_attr("is_enabled"), Some(true));
    assert_eq!(state.number_attr("sampling_rate"), Some(0.25));

    let list = server
        .mock("GET", RULES_PATH)
        .with_body(format!("[{},{}]", OTHER_RULE, RULE))
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_run_rule", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    list.remove_async().await;

    let patch = server
        .mock("PATCH", "/api/v1/runs/rules/r-1")
        .match_body(Matcher::PartialJson(json!({"is_enabled": false, "sampling_rate": 0.25})))
        .with_body("{}")
        .create_async()
        .await;
    let list = server
        .mock("GET", RULES_PATH)
        .with_body(format!("[{}]", RULE.replace(r#""is_enabled":true"#, r#""is_enabled":false"#)))
        .create_async()
        .await;

    let mut paused = rule_config();
    paused["is_enabled"] = json!(false);
    let updated = harness.update("langsmith_run_rule", &state, paused).await.unwrap();
    patch.assert_async().await;
    list.assert_async().await;
    assert_eq!(updated.bool_attr("is_enabled"), Some(false));

    let delete = server
        .mock("DELETE", "/api/v1/runs/rules/r-1")
        .with_status(204)
        .create_async()
        .await;

    assert!(harness.delete("langsmith_run_rule", &updated).await.unwrap().is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn run_rule_missing_from_list() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _create = server
        .mock("POST", RULES_PATH)
        .with_body(RULE)
        .create_async()
        .await;
    let state = harness.create("langsmith_run_rule", rule_config()).await.unwrap();

    let _list = server
        .mock("GET", RULES_PATH)
        .with_body(format!("[{}]", OTHER_RULE))
        .create_async()
        .await;
    assert_eq!(harness.read("langsmith_run_rule", &state).await.unwrap(), None);

    let _patch = server
        .mock("PATCH", "/api/v1/runs/rules/r-1")
        .with_body("{}")
        .create_async()
        .await;

    let mut renamed = rule_config();
    renamed["display_name"] = json!("sample failures");
    let err = harness
        .update("langsmith_run_rule", &state, renamed)
        .await
        .unwrap_err();
    assert_eq!(err.diagnostics()[0].summary, "Failed to read run rule");
    assert!(err.diagnostics()[0].detail.contains("disappeared after update"));

    let _delete = server
        .mock("DELETE", "/api/v1/runs/rules/r-1")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;
    assert!(harness.delete("langsmith_run_rule", &state).await.is_ok());
}

#[tokio::test]
async fn run_rule_needs_a_target() {
    let server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let err = harness
        .create("langsmith_run_rule", json!({"display_name": "orphan"}))
        .await
        .unwrap_err();
    assert_eq!(err.diagnostics()[0].summary, "Missing rule target");
}

const WEBHOOK: &str = r#"{"id":"wh-1","url":"https://hooks.example.com/prompts","include_prompts":["greeter"],"exclude_prompts":[],"triggers":["commit"],"created_at":"2024-08-01T00:00:00","updated_at":"2024-08-01T00:00:00"}"#;

fn webhook_config() -> serde_json::Value {
    json!({
        "url": "https://hooks.example.com/prompts",
        "headers": {"Authorization": "Bearer s3cret"},
        "include_prompts": ["greeter"]
    })
}

fn auth_headers() -> Option<HashMap<String, String>> {
    Some(HashMap::from([(
        "Authorization".to_string(),
        "Bearer s3cret".to_string(),
    )]))
}

#[tokio::test]
async fn webhook_headers_survive_reads_and_updates() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", "/api/v1/prompt-webhooks")
        .match_body(Matcher::Json(json!({
            "url": "https://hooks.example.com/prompts",
            "headers": {"Authorization": "Bearer s3cret"},
            "include_prompts": ["greeter"],
            "exclude_prompts": null
        })))
        .with_body(WEBHOOK)
        .create_async()
        .await;

    let state = harness.create("langsmith_webhook", webhook_config()).await.unwrap();
    create.assert_async().await;
    assert_eq!(state.string_map_attr("headers"), auth_headers());
    assert_eq!(state.string_list_attr("exclude_prompts"), None);
    assert_eq!(state.string_list_attr("triggers"), Some(vec!["commit".to_string()]));

    let get = server
        .mock("GET", "/api/v1/prompt-webhooks/wh-1")
        .with_body(WEBHOOK)
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_webhook", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    get.remove_async().await;

    let patch = server
        .mock("PATCH", "/api/v1/prompt-webhooks/wh-1")
        .match_body(Matcher::PartialJson(json!({
            "url": "https://hooks.example.com/v2",
            "headers": {"Authorization": "Bearer s3cret"}
        })))
        .with_body("{}")
        .create_async()
        .await;
    let get = server
        .mock("GET", "/api/v1/prompt-webhooks/wh-1")
        .with_body(WEBHOOK.replace("/prompts", "/v2"))
        .create_async()
        .await;

    let mut moved = webhook_config();
    moved["url"] = json!("https://hooks.example.com/v2");
    let updated = harness.update("langsmith_webhook", &state, moved).await.unwrap();
    patch.assert_async().await;
    get.assert_async().await;
    assert_eq!(updated.string_attr("url").as_deref(), Some("https://hooks.example.com/v2"));
    assert_eq!(updated.string_map_attr("headers"), auth_headers());

    let delete = server
        .mock("DELETE", "/api/v1/prompt-webhooks/wh-1")
        .with_status(204)
        .create_async()
        .await;

    assert!(harness.delete("langsmith_webhook", &updated).await.unwrap().is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn webhook_import_has_no_headers() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let get = server
        .mock("GET", "/api/v1/prompt-webhooks/wh-1")
        .with_body(WEBHOOK)
        .create_async()
        .await;

    let imported = harness.import("langsmith_webhook", "wh-1").await.unwrap();
    assert_eq!(imported.string_attr("url").as_deref(), Some("https://hooks.example.com/prompts"));
    assert_eq!(imported.string_map_attr("headers"), None);
    get.remove_async().await;

    let _gone = server
        .mock("GET", "/api/v1/prompt-webhooks/wh-1")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;
    assert_eq!(harness.read("langsmith_webhook", &imported).await.unwrap(), None);
}

#[tokio::test]
async fn alert_rule_rejects_fractional_window() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", "/v1/platform/alerts/s-1")
        .expect(0)
        .create_async()
        .await;

    let err = harness
        .create(
            "langsmith_alert_rule",
            json!({
                "session_id": "s-1",
                "name": "slow runs",
                "attribute": "latency",
                "aggregation": "avg",
                "operator": "gte",
                "threshold": 2.5,
                "window_minutes": 7.5
            }),
        )
        .await
        .unwrap_err();
    create.assert_async().await;

    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].summary, "Invalid window_minutes");
}
