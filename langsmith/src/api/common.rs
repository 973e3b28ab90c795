//! Common types and utilities for the LangSmith API

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Percent-encodes a user-supplied value for use as a single path segment
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Accepts either a single string or a list of strings
pub fn deserialize_string_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<StringOrList>::deserialize(deserializer)?.map(|v| match v {
            StringOrList::One(s) => vec![s],
            StringOrList::Many(list) => list,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_encode_values() {
        let params = ApiQueryParams::new()
            .add("name", "my project")
            .add("limit", 100)
            .add_optional("offset", None::<u32>)
            .add_optional("key", Some("a&b"));

        assert_eq!(
            params.to_query_string(),
            "?name=my%20project&limit=100&key=a%26b"
        );
        assert!(ApiQueryParams::new().to_query_string().is_empty());
        assert!(ApiQueryParams::new().is_empty());
    }

    #[test]
    fn path_segment_escapes_separators() {
        assert_eq!(path_segment("team/prompt"), "team%2Fprompt");
        assert_eq!(path_segment("plain-handle"), "plain-handle");
    }

    #[test]
    fn string_or_list_accepts_both_shapes() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_string_or_list")]
            split: Option<Vec<String>>,
        }

        let one: Holder = serde_json::from_str(r#"{"split":"train"}"#).unwrap();
        let many: Holder = serde_json::from_str(r#"{"split":["train","test"]}"#).unwrap();
        let none: Holder = serde_json::from_str(r#"{}"#).unwrap();
        let null: Holder = serde_json::from_str(r#"{"split":null}"#).unwrap();

        assert_eq!(one.split, Some(vec!["train".to_string()]));
        assert_eq!(many.split, Some(vec!["train".to_string(), "test".to_string()]));
        assert_eq!(none.split, None);
        assert_eq!(null.split, None);
    }
}
