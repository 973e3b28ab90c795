use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::HarnessError;

fn assert_replaces(err: HarnessError, attribute: &str) {
    match err {
        HarnessError::RequiresReplace(attrs) => assert_eq!(attrs, vec![attribute.to_string()]),
        other => panic!("expected replacement of {attribute}, got {other}"),
    }
}

const SERVICE_ACCOUNTS_PATH: &str = "/api/v1/service-accounts";

const ACCOUNT: &str = r#"{"id":"sa-1","name":"ci-bot","organization_id":"o-1","created_at":"2024-06-01T00:00:00"}"#;

#[tokio::test]
async fn service_account_lifecycle() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", SERVICE_ACCOUNTS_PATH)
        .match_body(Matcher::Json(json!({"name": "ci-bot"})))
        .with_body(ACCOUNT)
        .create_async()
        .await;

    let state = harness
        .create("langsmith_service_account", json!({"name": "ci-bot"}))
        .await
        .unwrap();
    create.assert_async().await;
    assert_eq!(state.string_attr("organization_id").as_deref(), Some("o-1"));

    let list = server
        .mock("GET", SERVICE_ACCOUNTS_PATH)
        .with_body(format!("[{}]", ACCOUNT))
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_service_account", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));

    let imported = harness.import("langsmith_service_account", "sa-1").await.unwrap();
    assert_eq!(imported, state);
    list.remove_async().await;

    let err = harness
        .update("langsmith_service_account", &state, json!({"name": "deploy-bot"}))
        .await
        .unwrap_err();
    assert_replaces(err, "name");

    let _empty = server
        .mock("GET", SERVICE_ACCOUNTS_PATH)
        .with_body("[]")
        .create_async()
        .await;
    assert_eq!(harness.read("langsmith_service_account", &state).await.unwrap(), None);

    let delete = server
        .mock("DELETE", SERVICE_ACCOUNTS_PATH)
        .match_body(Matcher::Json(json!({"service_account_ids": ["sa-1"]})))
        .with_status(204)
        .create_async()
        .await;

    assert!(harness.delete("langsmith_service_account", &state).await.unwrap().is_empty());
    delete.assert_async().await;
}

const API_KEYS_PATH: &str = "/api/v1/api-key";

const LISTED_KEY: &str = r#"{"id":"k-1","description":"ci","short_key":"lsv2_sk_...beef","created_at":"2024-06-01T00:00:00"}"#;

#[tokio::test]
async fn service_key_keeps_secret_across_reads() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", API_KEYS_PATH)
        .match_body(Matcher::Json(json!({"description": "ci"})))
        .with_body(r#"{"id":"k-1","key":"lsv2_sk_deadbeef","description":"ci","short_key":"lsv2_sk_...beef","created_at":"2024-06-01T00:00:00"}"#)
        .create_async()
        .await;

    let state = harness
        .create("langsmith_service_key", json!({"description": "ci"}))
        .await
        .unwrap();
    create.assert_async().await;
    assert_eq!(state.string_attr("key").as_deref(), Some("lsv2_sk_deadbeef"));

    let list = server
        .mock("GET", API_KEYS_PATH)
        .with_body(format!("[{}]", LISTED_KEY))
        .create_async()
        .await;

    // Listings never include the full key
    let refreshed = harness.read("langsmith_service_key", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));

    let imported = harness.import("langsmith_service_key", "k-1").await.unwrap();
    assert_eq!(imported.string_attr("key"), None);
    assert_eq!(imported.string_attr("short_key").as_deref(), Some("lsv2_sk_...beef"));
    list.remove_async().await;

    let err = harness
        .update("langsmith_service_key", &state, json!({"description": "deploy"}))
        .await
        .unwrap_err();
    assert_replaces(err, "description");

    let _empty = server
        .mock("GET", API_KEYS_PATH)
        .with_body("[]")
        .create_async()
        .await;
    assert_eq!(harness.read("langsmith_service_key", &state).await.unwrap(), None);

    let delete = server
        .mock("DELETE", "/api/v1/api-key/k-1")
        .with_status(204)
        .create_async()
        .await;

    assert!(harness.delete("langsmith_service_key", &state).await.unwrap().is_empty());
    delete.assert_async().await;
}

const SSO_PATH: &str = "/api/v1/orgs/current/sso-settings";

const SSO: &str = r#"{"id":"sso-1","organization_id":"o-1","metadata_url":"https://idp.example.com/metadata","metadata_xml":null,"default_workspace_ids":["ws-1","ws-2"],"default_workspace_role_id":"role-viewer","provider_id":"p-1"}"#;

fn sso_config() -> serde_json::Value {
    json!({
        "metadata_url": "https://idp.example.com/metadata",
        "default_workspace_ids": ["ws-2", "ws-1"],
        "default_workspace_role_id": "role-viewer"
    })
}

#[tokio::test]
async fn sso_settings_create_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", SSO_PATH)
        .match_body(Matcher::Json(json!({
            "metadata_url": "https://idp.example.com/metadata",
            "metadata_xml": null,
            "default_workspace_ids": ["ws-2", "ws-1"],
            "default_workspace_role_id": "role-viewer"
        })))
        .with_body(SSO)
        .create_async()
        .await;

    let state = harness.create("langsmith_sso_settings", sso_config()).await.unwrap();
    create.assert_async().await;
    assert_eq!(
        state.string_list_attr("default_workspace_ids"),
        Some(vec!["ws-2".to_string(), "ws-1".to_string()])
    );
    assert_eq!(state.string_attr("provider_id").as_deref(), Some("p-1"));

    let list = server
        .mock("GET", SSO_PATH)
        .with_body(format!("[{}]", SSO))
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_sso_settings", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    list.remove_async().await;

    let patch = server
        .mock("PATCH", "/api/v1/orgs/current/sso-settings/sso-1")
        .match_body(Matcher::PartialJson(json!({"default_workspace_role_id": "role-editor"})))
        .with_body("{}")
        .create_async()
        .await;
    let list = server
        .mock("GET", SSO_PATH)
        .with_body(format!("[{}]", SSO.replace("role-viewer", "role-editor")))
        .create_async()
        .await;

    let mut promoted = sso_config();
    promoted["default_workspace_role_id"] = json!("role-editor");
    let updated = harness
        .update("langsmith_sso_settings", &state, promoted)
        .await
        .unwrap();
    patch.assert_async().await;
    list.assert_async().await;
    assert_eq!(
        updated.string_attr("default_workspace_role_id").as_deref(),
        Some("role-editor")
    );

    let delete = server
        .mock("DELETE", "/api/v1/orgs/current/sso-settings/sso-1")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let warnings = harness.delete("langsmith_sso_settings", &updated).await.unwrap();
    assert!(warnings.is_empty());
    delete.assert_async().await;
}

#[tokio::test]
async fn sso_settings_need_exactly_one_metadata_source() {
    let server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let mut both = sso_config();
    both["metadata_xml"] = json!("<EntityDescriptor/>");

    let err = harness
        .create("langsmith_sso_settings", both)
        .await
        .unwrap_err();
    assert_eq!(err.diagnostics()[0].summary, "Conflicting identity provider metadata");
}
