//! Client configuration: base hosts and OAuth application credentials.
//!
//! Both types derive `Deserialize` so an embedding application can keep them
//! in its own configuration files. `Hosts` defaults to the production hosts;
//! overriding it points the clients at a staging environment or a mock
//! server.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTH_URL: &str = "https://auth.olx.com.br";
pub const DEFAULT_APP_URL: &str = "https://apps.olx.com.br";

/// Base URLs of the authentication host and the application host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hosts {
    pub auth_url: String,
    pub app_url: String,
}

impl Hosts {
    pub fn new(auth_url: &str, app_url: &str) -> Self {
        Self {
            auth_url: auth_url.to_string(),
            app_url: app_url.to_string(),
        }
    }

    /// Both hosts on the same origin, as served by the mock server.
    pub fn single(base_url: &str) -> Self {
        Self::new(base_url, base_url)
    }
}

impl Default for Hosts {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_URL, DEFAULT_APP_URL)
    }
}

/// OAuth application credentials, stored verbatim and never validated.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Everything needed to construct a `Client`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub credentials: Credentials,
    #[serde(default)]
    pub hosts: Hosts,
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_hosts_when_omitted() {
        let config = Config::from_json(
            r#"{"credentials":{
                "client_id":"id","client_secret":"secret","redirect_uri":"https://app/cb"
            }}"#,
        )
        .unwrap();
        assert_eq!(config.hosts, Hosts::default());
        assert_eq!(config.credentials.client_id, "id");
    }

    #[test]
    fn config_accepts_host_overrides() {
        let config = Config::from_json(
            r#"{
                "credentials":{"client_id":"id","client_secret":"secret","redirect_uri":"cb"},
                "hosts":{"auth_url":"http://127.0.0.1:9000","app_url":"http://127.0.0.1:9001"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.hosts.auth_url, "http://127.0.0.1:9000");
        assert_eq!(config.hosts.app_url, "http://127.0.0.1:9001");
    }

    #[test]
    fn config_rejects_missing_secret() {
        let result = Config::from_json(r#"{"credentials":{"client_id":"id","redirect_uri":"cb"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let credentials = Credentials::new("id", "hunter2", "cb");
        let printed = format!("{credentials:?}");
        assert!(printed.contains("id"));
        assert!(!printed.contains("hunter2"));
    }
}
