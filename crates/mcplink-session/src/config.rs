//! Configuration types for the session adapter

use crate::credential::Credential;
use crate::error::{Result, SessionError};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Default tool endpoint
pub const DEFAULT_ENDPOINT: &str = "https://lunarcrush.ai/mcp";

/// Session adapter configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionConfig {
    /// Base URL of the MCP endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Query parameter that carries the API key
    #[serde(default = "default_credential_param")]
    pub credential_param: String,

    /// Limit for transport setup, handshake and initial tool fetch, in seconds
    ///
    /// `0` leaves connecting unbounded.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Limit for each tool list or tool call round trip, in seconds
    ///
    /// `0` or `None` leaves the round trip unbounded.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_credential_param() -> String {
    "key".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

#[allow(clippy::unnecessary_wraps)]
fn default_request_timeout() -> Option<u64> {
    Some(30)
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            credential_param: default_credential_param(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Zero means "no limit"
fn seconds(value: Option<u64>) -> Option<Duration> {
    value.filter(|secs| *secs > 0).map(Duration::from_secs)
}

impl SessionConfig {
    /// Build the connection URL with the API key appended as a query parameter
    ///
    /// # Errors
    /// Returns [`SessionError::Config`] if the endpoint is not a valid http(s) URL
    /// or the credential parameter name is empty
    pub fn endpoint_url(&self, credential: &Credential) -> Result<Url> {
        let param = self.credential_param.trim();
        if param.is_empty() {
            return Err(SessionError::Config(
                "credential_param must not be empty".into(),
            ));
        }

        let mut url = Url::parse(self.endpoint.trim()).map_err(|e| {
            SessionError::Config(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SessionError::Config(format!(
                "endpoint '{}' must use http or https",
                self.endpoint
            )));
        }

        url.query_pairs_mut()
            .append_pair(param, credential.expose());
        Ok(url)
    }

    /// Connect timeout as a [`Duration`], if bounded
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        seconds(Some(self.connect_timeout))
    }

    /// Request timeout as a [`Duration`], if bounded
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        seconds(self.request_timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.credential_param, "key");
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_endpoint_url_carries_key() {
        let cred = Credential::new("abc").unwrap();
        let url = SessionConfig::default().endpoint_url(&cred).unwrap();
        assert_eq!(url.as_str(), "https://lunarcrush.ai/mcp?key=abc");
    }

    #[test]
    fn test_endpoint_url_keeps_existing_query() {
        let config = SessionConfig {
            endpoint: "http://localhost:8080/mcp?v=2".into(),
            credential_param: "token".into(),
            ..SessionConfig::default()
        };
        let cred = Credential::new("a b&c").unwrap();
        let url = config.endpoint_url(&cred).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("v".to_string(), "2".to_string()),
                ("token".to_string(), "a b&c".to_string())
            ]
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let cred = Credential::new("abc").unwrap();
        for endpoint in ["not a url", "ftp://example.com/mcp"] {
            let config = SessionConfig {
                endpoint: endpoint.into(),
                ..SessionConfig::default()
            };
            assert!(matches!(
                config.endpoint_url(&cred),
                Err(SessionError::Config(_))
            ));
        }
    }

    #[test]
    fn test_toml_partial_override() {
        let toml_str = r#"
            endpoint = "http://127.0.0.1:3000/mcp"
            request_timeout = 5
        "#;

        let config: SessionConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
        assert_eq!(config.endpoint, "http://127.0.0.1:3000/mcp");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.connect_timeout, 10);
        assert_eq!(config.credential_param, "key");
    }

    #[test]
    fn test_zero_timeouts_mean_unbounded() {
        let toml_str = r#"
            connect_timeout = 0
            request_timeout = 0
        "#;

        let config: SessionConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.request_timeout(), None);

        let unset = SessionConfig {
            request_timeout: None,
            ..SessionConfig::default()
        };
        assert_eq!(unset.request_timeout(), None);
    }
}
