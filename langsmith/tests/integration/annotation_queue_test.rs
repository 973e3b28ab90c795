use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;

const QUEUE: &str = r#"{"id":"q-1","name":"review","description":"Weekly review","default_dataset":null,"num_reviewers_per_item":2,"enable_reservations":true,"reservation_minutes":60,"rubric_instructions":"","tenant_id":"t-1","created_at":"2024-06-01T00:00:00","updated_at":"2024-06-01T00:00:00"}"#;

const RENAMED: &str = r#"{"id":"q-1","name":"triage","description":"Weekly review","default_dataset":null,"num_reviewers_per_item":2,"enable_reservations":true,"reservation_minutes":60,"rubric_instructions":"","tenant_id":"t-1","created_at":"2024-06-01T00:00:00","updated_at":"2024-06-03T00:00:00"}"#;

fn config() -> serde_json::Value {
    json!({
        "name": "review",
        "description": "Weekly review",
        "num_reviewers_per_item": 2
    })
}

#[tokio::test]
async fn annotation_queue_create_read_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", "/api/v1/annotation-queues")
        .match_body(Matcher::Json(json!({
            "name": "review",
            "description": "Weekly review",
            "default_dataset": null,
            "num_reviewers_per_item": 2,
            "rubric_instructions": null
        })))
        .with_body(QUEUE)
        .create_async()
        .await;

    let state = harness.create("langsmith_annotation_queue", config()).await.unwrap();
    create.assert_async().await;

    assert_eq!(state.string_attr("id").as_deref(), Some("q-1"));
    assert_eq!(state.int_attr("num_reviewers_per_item"), Some(2));
    assert_eq!(state.bool_attr("enable_reservations"), Some(true));
    assert_eq!(state.int_attr("reservation_minutes"), Some(60));
    assert_eq!(state.string_attr("rubric_instructions"), None);

    let get = server
        .mock("GET", "/api/v1/annotation-queues/q-1")
        .with_body(QUEUE)
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_annotation_queue", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    get.remove_async().await;

    // Server-side defaults do not show up as drift
    let plan = harness
        .plan("langsmith_annotation_queue", &state, config())
        .await
        .unwrap();
    assert!(!plan.has_changes);

    let patch = server
        .mock("PATCH", "/api/v1/annotation-queues/q-1")
        .match_body(Matcher::PartialJson(json!({
            "name": "triage",
            "num_reviewers_per_item": 2
        })))
        .with_body("{}")
        .create_async()
        .await;
    let get = server
        .mock("GET", "/api/v1/annotation-queues/q-1")
        .with_body(RENAMED)
        .create_async()
        .await;

    let mut renamed = config();
    renamed["name"] = json!("triage");
    let updated = harness
        .update("langsmith_annotation_queue", &state, renamed)
        .await
        .unwrap();
    patch.assert_async().await;
    get.assert_async().await;
    assert_eq!(updated.string_attr("name").as_deref(), Some("triage"));
    assert_eq!(updated.string_attr("created_at").as_deref(), Some("2024-06-01T00:00:00"));

    let delete = server
        .mock("DELETE", "/api/v1/annotation-queues/q-1")
        .with_status(204)
        .create_async()
        .await;

    assert!(harness.delete("langsmith_annotation_queue", &updated).await.unwrap().is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn annotation_queue_removed_remotely() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let get = server
        .mock("GET", "/api/v1/annotation-queues/q-1")
        .with_body(QUEUE)
        .create_async()
        .await;

    let imported = harness.import("langsmith_annotation_queue", "q-1").await.unwrap();
    assert_eq!(imported.string_attr("tenant_id").as_deref(), Some("t-1"));
    get.remove_async().await;

    let _gone = server
        .mock("GET", "/api/v1/annotation-queues/q-1")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;
    assert_eq!(harness.read("langsmith_annotation_queue", &imported).await.unwrap(), None);

    let _delete = server
        .mock("DELETE", "/api/v1/annotation-queues/q-1")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;
    assert!(harness.delete("langsmith_annotation_queue", &imported).await.is_ok());
}

#[tokio::test]
async fn annotation_queue_rejects_fractional_counts() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", "/api/v1/annotation-queues")
        .expect(0)
        .create_async()
        .await;

    let err = harness
        .create(
            "langsmith_annotation_queue",
            json!({"name": "review", "num_reviewers_per_item": 1.5, "reservation_minutes": 30}),
        )
        .await
        .unwrap_err();
    create.assert_async().await;

    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].summary, "Invalid num_reviewers_per_item");
}
