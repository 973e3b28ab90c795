use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;

const TAG_KEYS_PATH: &str = "/api/v1/workspaces/current/tag-keys";

#[tokio::test]
async fn tag_key_and_value_lifecycle() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create_key = server
        .mock("POST", TAG_KEYS_PATH)
        .match_body(Matcher::Json(json!({"key": "env", "description": null})))
        .with_body(r#"{"id":"k-1","key":"env","description":null,"created_at":"2024-07-01T00:00:00","updated_at":"2024-07-01T00:00:00"}"#)
        .create_async()
        .await;

    let tag_key = harness
        .create("langsmith_tag_key", json!({"key": "env"}))
        .await
        .unwrap();
    create_key.assert_async().await;
    assert_eq!(tag_key.string_attr("id").as_deref(), Some("k-1"));

    let create_value = server
        .mock("POST", "/api/v1/workspaces/current/tag-keys/k-1/tag-values")
        .match_body(Matcher::Json(json!({"value": "prod", "description": "Production"})))
        .with_body(r#"{"id":"v-1","tag_key_id":"k-1","value":"prod","description":"Production"}"#)
        .create_async()
        .await;

    let tag_value = harness
        .create(
            "langsmith_tag_value",
            json!({"tag_key_id": "k-1", "value": "prod", "description": "Production"}),
        )
        .await
        .unwrap();
    create_value.assert_async().await;
    assert_eq!(tag_value.string_attr("id").as_deref(), Some("v-1"));
    assert_eq!(tag_value.string_attr("tag_key_id").as_deref(), Some("k-1"));

    let plan = harness
        .plan(
            "langsmith_tag_value",
            &tag_value,
            json!({"tag_key_id": "k-2", "value": "prod", "description": "Production"}),
        )
        .await
        .unwrap();
    assert_eq!(plan.requires_replace, vec!["tag_key_id".to_string()]);

    let delete_value = server
        .mock("DELETE", "/api/v1/workspaces/current/tag-keys/k-1/tag-values/v-1")
        .with_status(204)
        .create_async()
        .await;
    let delete_key = server
        .mock("DELETE", "/api/v1/workspaces/current/tag-keys/k-1")
        .with_status(204)
        .create_async()
        .await;

    harness.delete("langsmith_tag_value", &tag_value).await.unwrap();
    harness.delete("langsmith_tag_key", &tag_key).await.unwrap();
    delete_value.assert_async().await;
    delete_key.assert_async().await;
}

#[tokio::test]
async fn tag_value_imports_from_composite_id() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _get = server
        .mock("GET", "/api/v1/workspaces/current/tag-keys/k-1/tag-values/v-1")
        .with_body(r#"{"id":"v-1","value":"prod"}"#)
        .create_async()
        .await;

    let imported = harness.import("langsmith_tag_value", "k-1/v-1").await.unwrap();
    assert_eq!(imported.string_attr("tag_key_id").as_deref(), Some("k-1"));
    assert_eq!(imported.string_attr("value").as_deref(), Some("prod"));
    assert_eq!(imported.string_attr("description"), None);
}

#[tokio::test]
async fn tag_value_import_rejects_malformed_id() {
    let server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let err = harness
        .import("langsmith_tag_value", "just-one-part")
        .await
        .unwrap_err();
    assert!(!err.diagnostics().is_empty());
}
