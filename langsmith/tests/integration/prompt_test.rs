use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;

const GREETER: &str = r#"{"repo":{"id":"r-1","repo_handle":"greeter","full_name":"acme/greeter","owner":"acme","description":"Greets users","readme":"","is_public":false,"is_archived":false,"tags":["demo"],"created_at":"2024-06-01T10:00:00","updated_at":"2024-06-01T10:00:00"}}"#;

const GREETER_PUBLIC: &str = r#"{"repo":{"id":"r-1","repo_handle":"greeter","full_name":"acme/greeter","owner":"acme","description":"Greets users","readme":"","is_public":true,"is_archived":false,"tags":[],"created_at":"2024-06-01T10:00:00","updated_at":"2024-06-02T08:00:00"}}"#;

#[tokio::test]
async fn prompt_create_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", "/api/v1/repos")
        .match_body(Matcher::Json(json!({
            "repo_handle": "greeter",
            "description": "Greets users",
            "is_public": false,
            "tags": ["demo"]
        })))
        .with_body(GREETER)
        .create_async()
        .await;

    let state = harness
        .create(
            "langsmith_prompt",
            json!({"repo_handle": "greeter", "description": "Greets users", "tags": ["demo"]}),
        )
        .await
        .unwrap();
    create.assert_async().await;

    assert_eq!(state.string_attr("full_name").as_deref(), Some("acme/greeter"));
    assert_eq!(state.bool_attr("is_public"), Some(false));
    assert_eq!(state.string_attr("readme"), None);
    assert_eq!(state.string_list_attr("tags"), Some(vec!["demo".to_string()]));

    let patch = server
        .mock("PATCH", "/api/v1/repos/-/greeter")
        .match_body(Matcher::PartialJson(json!({"is_public": true, "tags": []})))
        .with_body(GREETER_PUBLIC)
        .create_async()
        .await;
    let _get = server
        .mock("GET", "/api/v1/repos/-/greeter")
        .with_body(GREETER_PUBLIC)
        .create_async()
        .await;

    let updated = harness
        .update(
            "langsmith_prompt",
            &state,
            json!({"repo_handle": "greeter", "description": "Greets users", "is_public": true}),
        )
        .await
        .unwrap();
    patch.assert_async().await;

    assert_eq!(updated.bool_attr("is_public"), Some(true));
    assert_eq!(updated.string_list_attr("tags"), None);
    assert_eq!(updated.string_attr("created_at").as_deref(), Some("2024-06-01T10:00:00"));

    let delete = server
        .mock("DELETE", "/api/v1/repos/-/greeter")
        .with_status(204)
        .create_async()
        .await;
    harness.delete("langsmith_prompt", &updated).await.unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn prompt_handle_change_requires_replace() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _create = server
        .mock("POST", "/api/v1/repos")
        .with_body(GREETER)
        .create_async()
        .await;
    let state = harness
        .create("langsmith_prompt", json!({"repo_handle": "greeter", "tags": ["demo"]}))
        .await
        .unwrap();

    let plan = harness
        .plan("langsmith_prompt", &state, json!({"repo_handle": "welcomer", "tags": ["demo"]}))
        .await
        .unwrap();
    assert_eq!(plan.requires_replace, vec!["repo_handle".to_string()]);
}

#[tokio::test]
async fn prompt_import_by_handle() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _get = server
        .mock("GET", "/api/v1/repos/-/greeter")
        .with_body(GREETER)
        .create_async()
        .await;

    let imported = harness.import("langsmith_prompt", "greeter").await.unwrap();
    assert_eq!(imported.string_attr("id").as_deref(), Some("r-1"));
    assert_eq!(imported.string_attr("owner").as_deref(), Some("acme"));
}

#[tokio::test]
async fn prompt_commit_is_pushed_and_left_on_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let push = server
        .mock("POST", "/commits/-/greeter")
        .match_body(Matcher::Json(json!({"manifest": {"template": "Hello {name}"}})))
        .with_body(r#"{"commit":{"id":"c-1","commit_hash":"abc123","manifest":{"template":"Hello {name}"},"parent_commit_hash":null,"created_at":"2024-06-01T10:05:00"}}"#)
        .create_async()
        .await;

    let state = harness
        .create(
            "langsmith_prompt_commit",
            json!({"repo_handle": "greeter", "manifest": "{\"template\": \"Hello {name}\"}"}),
        )
        .await
        .unwrap();
    push.assert_async().await;

    assert_eq!(state.string_attr("id").as_deref(), Some("greeter/abc123"));
    assert_eq!(state.string_attr("commit_hash").as_deref(), Some("abc123"));
    assert_eq!(state.string_attr("parent_commit"), None);

    let warnings = harness.delete("langsmith_prompt_commit", &state).await.unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].summary, "Prompt commit not deleted");
}
