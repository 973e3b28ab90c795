use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;

const SECRETS_PATH: &str = "/api/v1/workspaces/current/secrets";

#[tokio::test]
async fn secret_value_is_written_but_never_read_back() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let upsert = server
        .mock("POST", SECRETS_PATH)
        .match_body(Matcher::Json(json!([{"key": "OPENAI_API_KEY", "value": "sk-one"}])))
        .with_body("{}")
        .create_async()
        .await;

    let state = harness
        .create(
            "langsmith_secret",
            json!({"key": "OPENAI_API_KEY", "value": "sk-one"}),
        )
        .await
        .unwrap();
    upsert.assert_async().await;
    assert_eq!(state.string_attr("id").as_deref(), Some("OPENAI_API_KEY"));

    let _list = server
        .mock("GET", SECRETS_PATH)
        .with_body(r#"[{"key":"OPENAI_API_KEY"},{"key":"ANTHROPIC_API_KEY"}]"#)
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_secret", &state).await.unwrap().unwrap();
    assert_eq!(refreshed.string_attr("value").as_deref(), Some("sk-one"));

    let rotate = server
        .mock("POST", SECRETS_PATH)
        .match_body(Matcher::Json(json!([{"key": "OPENAI_API_KEY", "value": "sk-two"}])))
        .with_body("{}")
        .create_async()
        .await;

    let rotated = harness
        .update(
            "langsmith_secret",
            &refreshed,
            json!({"key": "OPENAI_API_KEY", "value": "sk-two"}),
        )
        .await
        .unwrap();
    rotate.assert_async().await;
    assert_eq!(rotated.string_attr("value").as_deref(), Some("sk-two"));

    let delete = server
        .mock("POST", SECRETS_PATH)
        .match_body(Matcher::Json(json!([{"key": "OPENAI_API_KEY", "value": null}])))
        .with_body("{}")
        .create_async()
        .await;

    harness.delete("langsmith_secret", &rotated).await.unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn secret_missing_from_listing_is_removed() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _list = server
        .mock("GET", SECRETS_PATH)
        .with_body(r#"[{"key":"ANTHROPIC_API_KEY"}]"#)
        .create_async()
        .await;

    let mut state = tfplug::DynamicValue::object();
    state.set_attr("id", "OPENAI_API_KEY");
    state.set_attr("key", "OPENAI_API_KEY");
    state.set_attr("value", "sk-one");

    assert_eq!(harness.read("langsmith_secret", &state).await.unwrap(), None);
}

#[tokio::test]
async fn secret_import_leaves_value_unset() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _list = server
        .mock("GET", SECRETS_PATH)
        .with_body(r#"[{"key":"OPENAI_API_KEY"}]"#)
        .create_async()
        .await;

    let imported = harness.import("langsmith_secret", "OPENAI_API_KEY").await.unwrap();
    assert_eq!(imported.string_attr("key").as_deref(), Some("OPENAI_API_KEY"));
    assert_eq!(imported.string_attr("value"), None);
}
