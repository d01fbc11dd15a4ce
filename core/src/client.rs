//! Blocking clients that execute requests through an `HttpTransport`.
//!
//! # Design
//! `Client` holds the OAuth credentials and exposes only the two operations
//! that need them. Everything after token exchange lives on `Autoupload`,
//! which holds no credentials and takes the access token per call. Both are
//! thin: build the request, execute it once, normalize the response. No
//! retries and no mutable state, so sharing either across threads needs no
//! locking beyond what the transport itself requires.

use crate::autoupload::AutouploadClient;
use crate::config::{Config, Credentials, Hosts};
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::issuer::Issuers;
use crate::oauth::OAuthClient;
use crate::transport::{HttpTransport, UreqTransport};
use crate::types::{AccessToken, ApiResult, Listing};

/// Credential-holding client for the authentication host.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    oauth: OAuthClient,
    issuers: Issuers,
    transport: T,
}

impl Client<UreqTransport> {
    /// Client against the production hosts. Values are stored verbatim.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        let credentials = Credentials::new(client_id, client_secret, redirect_uri);
        Self::with_transport(credentials, &Hosts::default(), UreqTransport::new())
    }

    pub fn from_config(config: Config) -> Self {
        Self::with_transport(config.credentials, &config.hosts, UreqTransport::new())
    }
}

impl<T: HttpTransport> Client<T> {
    pub fn with_transport(credentials: Credentials, hosts: &Hosts, transport: T) -> Self {
        let issuers = Issuers::new(hosts);
        Self {
            oauth: OAuthClient::from_issuer(credentials, issuers.auth.clone()),
            issuers,
            transport,
        }
    }

    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    pub fn auth_url(&self, autoupload: bool, state: Option<&str>) -> String {
        self.oauth.auth_url(autoupload, state)
    }

    /// Exchange an authorization code for an access token.
    pub fn get_token(&self, code: &str) -> Result<AccessToken, ApiError> {
        let request = self.oauth.build_get_token(code)?;
        let response = self.transport.execute(&request)?;
        self.oauth.parse_get_token(response)
    }

    /// Listing service on the same hosts, sharing this client's transport.
    pub fn autoupload(&self) -> Autoupload<T>
    where
        T: Clone,
    {
        Autoupload {
            requests: AutouploadClient::from_issuer(self.issuers.app.clone()),
            transport: self.transport.clone(),
        }
    }
}

/// Token-scoped listing operations on the application host.
#[derive(Debug, Clone)]
pub struct Autoupload<T = UreqTransport> {
    requests: AutouploadClient,
    transport: T,
}

impl Autoupload<UreqTransport> {
    pub fn new() -> Self {
        Self::with_transport(&Hosts::default(), UreqTransport::new())
    }
}

impl Default for Autoupload<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpTransport> Autoupload<T> {
    pub fn with_transport(hosts: &Hosts, transport: T) -> Self {
        Self {
            requests: AutouploadClient::new(hosts),
            transport,
        }
    }

    pub fn requests(&self) -> &AutouploadClient {
        &self.requests
    }

    /// Active listings of the token's owner.
    pub fn published(&self, token: &AccessToken) -> Result<ApiResult, ApiError> {
        self.send(self.requests.build_published(token)?)
    }

    pub fn basic_user_info(&self, token: &AccessToken) -> Result<ApiResult, ApiError> {
        self.send(self.requests.build_basic_user_info(token)?)
    }

    /// Create or update listings. An accepted import returns a tracking token
    /// for `import_status`.
    pub fn publish(
        &self,
        token: &AccessToken,
        listings: &[Listing],
    ) -> Result<ApiResult, ApiError> {
        self.send(self.requests.build_publish(token, listings)?)
    }

    pub fn delete<S: AsRef<str>>(
        &self,
        token: &AccessToken,
        ids: &[S],
    ) -> Result<ApiResult, ApiError> {
        self.send(self.requests.build_delete(token, ids)?)
    }

    pub fn import_status(
        &self,
        token: &AccessToken,
        import_token: &str,
    ) -> Result<ApiResult, ApiError> {
        self.send(self.requests.build_import_status(token, import_token)?)
    }

    pub fn car_info(
        &self,
        token: &AccessToken,
        brand_id: Option<u32>,
        model_id: Option<u32>,
    ) -> Result<ApiResult, ApiError> {
        self.send(self.requests.build_car_info(token, brand_id, model_id)?)
    }

    pub fn moto_info(
        &self,
        token: &AccessToken,
        brand_id: Option<u32>,
        model_id: Option<u32>,
    ) -> Result<ApiResult, ApiError> {
        self.send(self.requests.build_moto_info(token, brand_id, model_id)?)
    }

    pub fn moto_cubiccms_info(&self, token: &AccessToken) -> Result<ApiResult, ApiError> {
        self.send(self.requests.build_moto_cubiccms_info(token)?)
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResult, ApiError> {
        let response = self.transport.execute(&request)?;
        self.requests.parse(response)
    }
}
