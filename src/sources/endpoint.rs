//! HTTP client for remote SPARQL endpoints.

use crate::error::{QuarryError, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Media type requested from the endpoint.
pub const SPARQL_RESULTS_XML: &str = "application/sparql-results+xml";

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for a remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
    /// Extra query-string fields sent with every request, e.g. `default-graph-uri`.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: BTreeMap::new(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// A remote endpoint: one blocking GET per query.
#[derive(Debug, Clone)]
pub struct Endpoint {
    config: EndpointConfig,
    client: Client,
}

impl Endpoint {
    pub fn new(config: EndpointConfig) -> Result<Endpoint> {
        if config.url.trim().is_empty() {
            return Err(QuarryError::ConfigError("endpoint url is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuarryError::HttpError(e.to_string()))?;
        Ok(Endpoint { config, client })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Sends `query` with the configured extra parameters and returns the raw
    /// SPARQL XML results body.
    pub fn execute(&self, query: &str) -> Result<Vec<u8>> {
        let mut fields: Vec<(&str, &str)> = vec![("query", query)];
        fields.extend(self.config.params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let mut request =
            self.client.get(&self.config.url).query(&fields).header(ACCEPT, SPARQL_RESULTS_XML);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        log::debug!("Sending query to {}", self.config.url);
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuarryError::HttpError(format!(
                "Query failed with status {}: {}",
                status, body
            )));
        }
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_json() {
        let config: EndpointConfig =
            serde_json::from_str(r#"{"url": "http://localhost:7878/query"}"#).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.params.is_empty());
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_empty_url_is_rejected() {
        assert!(matches!(
            Endpoint::new(EndpointConfig::new("  ")),
            Err(QuarryError::ConfigError(_))
        ));
    }

    #[test]
    fn test_builder_params() {
        let config = EndpointConfig::new("http://example.org/sparql")
            .with_param("default-graph-uri", "http://example.org/g")
            .with_timeout_secs(5);
        assert_eq!(config.params.get("default-graph-uri").map(String::as_str), Some("http://example.org/g"));
        assert_eq!(config.timeout_secs, 5);
    }
}
