//! GraphQL endpoint configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "http://localhost:4000/graphql".to_string()
}

/// Where and how to reach the GraphQL API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlConfig {
    /// HTTP endpoint queried during the prefetch pass.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// WebSocket endpoint the browser uses for subscriptions.
    #[serde(default)]
    pub subscriptions_endpoint: Option<String>,

    /// Extra headers sent with every query.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for GraphQlConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            subscriptions_endpoint: None,
            headers: BTreeMap::new(),
        }
    }
}

impl GraphQlConfig {
    /// Config for an endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the subscriptions endpoint.
    pub fn with_subscriptions(mut self, endpoint: impl Into<String>) -> Self {
        self.subscriptions_endpoint = Some(endpoint.into());
        self
    }

    /// Add a header sent with every query.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Meta tag announcing the subscriptions endpoint to the page.
    pub fn subscriptions_meta_tag(&self) -> Option<String> {
        self.subscriptions_endpoint.as_ref().map(|url| {
            format!(
                r#"<meta name="graphql-subscriptions" content="{}">"#,
                url.replace('&', "&amp;").replace('"', "&quot;")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: GraphQlConfig = toml::from_str("").unwrap();
        assert_eq!(config, GraphQlConfig::default());
        assert!(config.subscriptions_meta_tag().is_none());
    }

    #[test]
    fn test_from_toml() {
        let config: GraphQlConfig = toml::from_str(
            r#"
            endpoint = "https://api.example.com/graphql"
            subscriptions_endpoint = "wss://api.example.com/graphql"

            [headers]
            x-client = "web"
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "https://api.example.com/graphql");
        assert_eq!(config.headers.get("x-client").map(String::as_str), Some("web"));
    }

    #[test]
    fn test_subscriptions_meta_tag() {
        let config = GraphQlConfig::default().with_subscriptions("wss://x/graphql?a=1&b=2");
        assert_eq!(
            config.subscriptions_meta_tag().unwrap(),
            r#"<meta name="graphql-subscriptions" content="wss://x/graphql?a=1&amp;b=2">"#
        );
    }
}
