//! Preconfigured request issuers, one per base host.
//!
//! An `Issuer` joins its base URL with an operation path and stamps the
//! default content type on every request it builds. Nothing else is
//! injected: the access token always travels in the body.

use tracing::trace;

use crate::config::Hosts;
use crate::http::{HttpMethod, HttpRequest};

/// Default content type an issuer declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// `application/x-www-form-urlencoded`, expected by the token endpoint.
    Form,
    /// `application/json`, used by every application-host endpoint.
    Json,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Form => "application/x-www-form-urlencoded",
            ContentType::Json => "application/json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer {
    base_url: String,
    content_type: ContentType,
}

impl Issuer {
    pub fn new(base_url: &str, content_type: ContentType) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            content_type,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Absolute URL for `path`, which must start with `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        trace!(%method, path, "building request");
        HttpRequest {
            method,
            url: self.url(path),
            headers: vec![(
                "content-type".to_string(),
                self.content_type.as_str().to_string(),
            )],
            body,
        }
    }
}

/// The pair of issuers every client is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuers {
    pub auth: Issuer,
    pub app: Issuer,
}

impl Issuers {
    pub fn new(hosts: &Hosts) -> Self {
        Self {
            auth: Issuer::new(&hosts.auth_url, ContentType::Form),
            app: Issuer::new(&hosts.app_url, ContentType::Json),
        }
    }
}
