use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::HarnessError;

const EXAMPLE: &str = r#"{"id":"e-1","dataset_id":"d-1","inputs":{"question":"hi"},"outputs":{"answer":"hello"},"metadata":null,"split":["base"],"created_at":"2024-06-01T00:00:00","modified_at":"2024-06-01T00:00:00"}"#;

const ANSWERED: &str = r#"{"id":"e-1","dataset_id":"d-1","inputs":{"question":"hi"},"outputs":{"answer":"hey"},"metadata":null,"split":["base"],"created_at":"2024-06-01T00:00:00","modified_at":"2024-06-02T00:00:00"}"#;

fn config() -> serde_json::Value {
    json!({
        "dataset_id": "d-1",
        "inputs": "{\"question\": \"hi\"}",
        "outputs": "{\"answer\": \"hello\"}",
        "split": ["base"]
    })
}

#[tokio::test]
async fn example_create_read_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", "/api/v1/examples")
        .match_body(Matcher::Json(json!({
            "dataset_id": "d-1",
            "inputs": {"question": "hi"},
            "outputs": {"answer": "hello"},
            "split": ["base"]
        })))
        .with_status(201)
        .with_body(EXAMPLE)
        .create_async()
        .await;

    let state = harness.create("langsmith_example", config()).await.unwrap();
    create.assert_async().await;

    assert_eq!(state.string_attr("id").as_deref(), Some("e-1"));
    assert_eq!(state.string_attr("inputs").as_deref(), Some("{\"question\": \"hi\"}"));
    assert_eq!(state.string_attr("metadata"), None);
    assert_eq!(state.string_list_attr("split"), Some(vec!["base".to_string()]));

    let get = server
        .mock("GET", "/api/v1/examples/e-1")
        .with_body(EXAMPLE)
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_example", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    get.remove_async().await;

    let patch = server
        .mock("PATCH", "/api/v1/examples/e-1")
        .match_body(Matcher::Json(json!({
            "inputs": {"question": "hi"},
            "outputs": {"answer": "hey"},
            "metadata": null,
            "split": ["base"]
        })))
        .with_body("{}")
        .create_async()
        .await;
    let get = server
        .mock("GET", "/api/v1/examples/e-1")
        .with_body(ANSWERED)
        .create_async()
        .await;

    let mut changed = config();
    changed["outputs"] = json!("{\"answer\":\"hey\"}");
    let updated = harness.update("langsmith_example", &state, changed).await.unwrap();
    patch.assert_async().await;
    get.assert_async().await;

    assert_eq!(updated.string_attr("outputs").as_deref(), Some("{\"answer\":\"hey\"}"));
    assert_eq!(updated.string_attr("modified_at").as_deref(), Some("2024-06-02T00:00:00"));

    let delete = server
        .mock("DELETE", "/api/v1/examples/e-1")
        .with_status(204)
        .create_async()
        .await;

    assert!(harness.delete("langsmith_example", &updated).await.unwrap().is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn example_moving_dataset_requires_replace() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _create = server
        .mock("POST", "/api/v1/examples")
        .with_body(EXAMPLE)
        .create_async()
        .await;
    let state = harness.create("langsmith_example", config()).await.unwrap();

    let mut moved = config();
    moved["dataset_id"] = json!("d-2");

    match harness.update("langsmith_example", &state, moved).await.unwrap_err() {
        HarnessError::RequiresReplace(attrs) => assert_eq!(attrs, vec!["dataset_id".to_string()]),
        other => panic!("expected replacement, got {other}"),
    }
}

#[tokio::test]
async fn example_import_then_removed_remotely() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let get = server
        .mock("GET", "/api/v1/examples/e-1")
        .with_body(EXAMPLE)
        .create_async()
        .await;

    let imported = harness.import("langsmith_example", "e-1").await.unwrap();
    assert_eq!(imported.string_attr("dataset_id").as_deref(), Some("d-1"));
    assert_eq!(imported.string_attr("inputs").as_deref(), Some(r#"{"question":"hi"}"#));
    get.remove_async().await;

    let _gone = server
        .mock("GET", "/api/v1/examples/e-1")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;
    assert_eq!(harness.read("langsmith_example", &imported).await.unwrap(), None);

    let _delete = server
        .mock("DELETE", "/api/v1/examples/e-1")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;
    assert!(harness.delete("langsmith_example", &imported).await.is_ok());
}
