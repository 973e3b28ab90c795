use crate::support;
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::HarnessError;

const PRICES_PATH: &str = "/api/v1/model-price-map";

const PRICE: &str = r#"{"id":"mp-1","name":"gpt-4o","match_pattern":"^gpt-4o$","prompt_cost":2.5,"completion_cost":10.0,"start_time":null,"provider":"openai"}"#;

fn price_config() -> serde_json::Value {
    json!({
        "name": "gpt-4o",
        "match_pattern": "^gpt-4o$",
        "prompt_cost": 2.5,
        "completion_cost": 10.0,
        "provider": "openai"
    })
}

#[tokio::test]
async fn model_price_create_read_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("POST", PRICES_PATH)
        .match_body(Matcher::Json(json!({
            "name": "gpt-4o",
            "match_pattern": "^gpt-4o$",
            "prompt_cost": 2.5,
            "completion_cost": 10.0,
            "start_time": null,
            "provider": "openai"
        })))
        .with_body(PRICE)
        .create_async()
        .await;

    let state = harness.create("langsmith_model_price", price_config()).await.unwrap();
    create.assert_async().await;
    assert_eq!(state.string_attr("id").as_deref(), Some("mp-1"));
    assert_eq!(state.number_attr("completion_cost"), Some(10.0));
    assert_eq!(state.string_list_attr("match_path"), None);

    let list = server
        .mock("GET", PRICES_PATH)
        .with_body(format!("[{}]", PRICE))
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_model_price", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    list.remove_async().await;

    let put = server
        .mock("PUT", "/api/v1/model-price-map/mp-1")
        .match_body(Matcher::PartialJson(json!({"completion_cost": 12.5})))
        .with_body("{}")
        .create_async()
        .await;
    let list = server
        .mock("GET", PRICES_PATH)
        .with_body(format!("[{}]", PRICE.replace("10.0", "12.5")))
        .create_async()
        .await;

    let mut repriced = price_config();
    repriced["completion_cost"] = json!(12.5);
    let updated = harness
        .update("langsmith_model_price", &state, repriced)
        .await
        .unwrap();
    put.assert_async().await;
    list.assert_async().await;
    assert_eq!(updated.number_attr("completion_cost"), Some(12.5));
    list.remove_async().await;

    let _empty = server
        .mock("GET", PRICES_PATH)
        .with_body("[]")
        .create_async()
        .await;
    assert_eq!(harness.read("langsmith_model_price", &updated).await.unwrap(), None);

    let delete = server
        .mock("DELETE", "/api/v1/model-price-map/mp-1")
        .with_status(204)
        .create_async()
        .await;

    assert!(harness.delete("langsmith_model_price", &updated).await.unwrap().is_empty());
    delete.assert_async().await;
}

const USAGE_LIMITS_PATH: &str = "/api/v1/usage-limits";

const LIMIT: &str = r#"{"id":"ul-1","limit_type":"monthly_traces","limit_value":10000,"tenant_id":"t-1","created_at":"2024-06-01T00:00:00","updated_at":"2024-06-01T00:00:00"}"#;

fn limit_config() -> serde_json::Value {
    json!({"limit_type": "monthly_traces", "limit_value": 10000})
}

#[tokio::test]
async fn usage_limit_upsert_read_update_delete() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let create = server
        .mock("PUT", USAGE_LIMITS_PATH)
        .match_body(Matcher::Json(json!({
            "limit_type": "monthly_traces",
            "limit_value": 10000
        })))
        .with_body(LIMIT)
        .create_async()
        .await;

    let state = harness.create("langsmith_usage_limit", limit_config()).await.unwrap();
    create.assert_async().await;
    assert_eq!(state.int_attr("limit_value"), Some(10000));
    assert_eq!(state.string_attr("tenant_id").as_deref(), Some("t-1"));
    create.remove_async().await;

    let list = server
        .mock("GET", USAGE_LIMITS_PATH)
        .with_body(format!("[{}]", LIMIT))
        .create_async()
        .await;

    let refreshed = harness.read("langsmith_usage_limit", &state).await.unwrap();
    assert_eq!(refreshed.as_ref(), Some(&state));
    list.remove_async().await;

    // Updates go through the same upsert, keyed by id
    let update = server
        .mock("PUT", USAGE_LIMITS_PATH)
        .match_body(Matcher::Json(json!({
            "id": "ul-1",
            "limit_type": "monthly_traces",
            "limit_value": 20000
        })))
        .with_body(LIMIT.replace("10000", "20000"))
        .create_async()
        .await;

    let updated = harness
        .update(
            "langsmith_usage_limit",
            &state,
            json!({"limit_type": "monthly_traces", "limit_value": 20000}),
        )
        .await
        .unwrap();
    update.assert_async().await;
    assert_eq!(updated.int_attr("limit_value"), Some(20000));

    let _empty = server
        .mock("GET", USAGE_LIMITS_PATH)
        .with_body("[]")
        .create_async()
        .await;
    assert_eq!(harness.read("langsmith_usage_limit", &updated).await.unwrap(), None);

    let _delete = server
        .mock("DELETE", "/api/v1/usage-limits/ul-1")
        .with_status(404)
        .with_body(support::NOT_FOUND)
        .create_async()
        .await;
    assert!(harness.delete("langsmith_usage_limit", &updated).await.is_ok());
}

#[tokio::test]
async fn usage_limit_type_change_requires_replace() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let _create = server
        .mock("PUT", USAGE_LIMITS_PATH)
        .with_body(LIMIT)
        .create_async()
        .await;
    let state = harness.create("langsmith_usage_limit", limit_config()).await.unwrap();

    let err = harness
        .update(
            "langsmith_usage_limit",
            &state,
            json!({"limit_type": "monthly_longlived_traces", "limit_value": 10000}),
        )
        .await
        .unwrap_err();
    match err {
        HarnessError::RequiresReplace(attrs) => assert_eq!(attrs, vec!["limit_type".to_string()]),
        other => panic!("expected replacement, got {other}"),
    }
}

#[tokio::test]
async fn usage_limit_rejects_fractional_value() {
    let mut server = Server::new_async().await;
    let harness = support::harness(&server).await;

    let upsert = server
        .mock("PUT", USAGE_LIMITS_PATH)
        .expect(0)
        .create_async()
        .await;

    let err = harness
        .create(
            "langsmith_usage_limit",
            json!({"limit_type": "monthly_traces", "limit_value": 10.5}),
        )
        .await
        .unwrap_err();
    upsert.assert_async().await;
    assert_eq!(err.diagnostics()[0].summary, "Invalid limit_value");
}
