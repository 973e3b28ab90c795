//! Test helpers for the LangSmith API

use super::{Client, ClientConfig};

pub fn create_test_client(url: &str) -> Client {
    Client::with_config(ClientConfig::new("ls-test-key").with_api_url(url)).unwrap()
}
