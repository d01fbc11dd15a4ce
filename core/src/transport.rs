//! The I/O seam: executes an `HttpRequest` and returns an `HttpResponse`.
//!
//! Any HTTP library can sit behind `HttpTransport`. `UreqTransport` is the
//! default, a blocking ureq agent with status-as-error disabled so that 4xx
//! and 5xx responses come back as data and go through normalization like
//! every other response. Pooling, TLS and timeouts are ureq's defaults.

use std::fmt;

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait HttpTransport {
    /// Perform exactly one round-trip. `Err` means no response was received.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent. With `http_status_as_error` left
    /// enabled, ureq drops error bodies and only the status survives, as
    /// `ApiError::Status`.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        debug!(method = %request.method, url, "dispatching request");

        let headers = request.headers.as_slice();
        let result = match (request.method, &request.body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };
        let mut response = match result {
            Ok(response) => response,
            // An agent with status-as-error enabled has already discarded the body.
            Err(ureq::Error::StatusCode(status)) => {
                debug!(status, "response received without body");
                return Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: String::new(),
                });
            }
            Err(e) => {
                let message = format!("{} {url} failed", request.method);
                return Err(TransportError::with_source(message, e));
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
            })
            .collect();
        // ureq caps bodies at 10 MiB by default; listings and catalogs may be larger.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(|e| {
                TransportError::with_source(format!("reading response from {url} failed"), e)
            })?;

        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, headers, body })
    }
}
