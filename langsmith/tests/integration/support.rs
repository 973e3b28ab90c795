use langsmith::LangSmithProvider;
use mockito::ServerGuard;
use serde_json::json;
use tfplug::ProviderHarness;

pub const API_KEY: &str = "lsv2_pt_integration";

/// Harness configured against the mock server
pub async fn harness(server: &ServerGuard) -> ProviderHarness<LangSmithProvider> {
    tfplug::try_init_logging();

    let mut harness = ProviderHarness::new(LangSmithProvider::new());
    harness
        .configure(json!({"api_key": API_KEY, "api_url": server.url()}))
        .await
        .expect("provider should configure against the mock server");
    harness
}

pub const NOT_FOUND: &str = r#"{"detail":"Not Found"}"#;
