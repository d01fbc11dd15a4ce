//! Authorization-URL building and OAuth token exchange.
//!
//! `OAuthClient` is the only part of the crate that holds credentials. Like
//! `AutouploadClient` it never touches the network: `build_get_token`
//! produces an `HttpRequest` and `parse_get_token` consumes the response.

use serde::Serialize;
use tracing::trace;

use crate::config::{Credentials, Hosts};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::issuer::{ContentType, Issuer};
use crate::normalize::normalize;
use crate::types::AccessToken;

pub const AUTHORIZE_PATH: &str = "/oauth";
pub const TOKEN_PATH: &str = "/oauth/token";

const SCOPE_BASIC: &str = "basic_user_info";
const SCOPE_AUTOUPLOAD: &str = "basic_user_info%20autoupload";

#[derive(Serialize)]
struct TokenForm<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: Credentials,
    auth: Issuer,
}

impl OAuthClient {
    pub fn new(credentials: Credentials, hosts: &Hosts) -> Self {
        Self::from_issuer(credentials, Issuer::new(&hosts.auth_url, ContentType::Form))
    }

    pub fn from_issuer(credentials: Credentials, auth: Issuer) -> Self {
        Self { credentials, auth }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// URL of the authorization page the user is redirected to.
    ///
    /// Values are interpolated as given, without percent-encoding; callers
    /// with reserved characters in `client_id`, `redirect_uri` or `state`
    /// must encode them first.
    pub fn auth_url(&self, autoupload: bool, state: Option<&str>) -> String {
        let scope = if autoupload { SCOPE_AUTOUPLOAD } else { SCOPE_BASIC };
        let mut url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={scope}",
            self.auth.url(AUTHORIZE_PATH),
            self.credentials.client_id,
            self.credentials.redirect_uri,
        );
        if let Some(state) = state {
            url.push_str("&state=");
            url.push_str(state);
        }
        url
    }

    pub fn build_get_token(&self, code: &str) -> Result<HttpRequest, ApiError> {
        let form = TokenForm {
            code,
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
            redirect_uri: &self.credentials.redirect_uri,
            grant_type: "authorization_code",
        };
        let body = serde_urlencoded::to_string(&form)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.auth.request(HttpMethod::Post, TOKEN_PATH, Some(body)))
    }

    pub fn parse_get_token(&self, response: HttpResponse) -> Result<AccessToken, ApiError> {
        let body = normalize(response)?;
        let token = body
            .get("access_token")
            .and_then(|token| token.as_str())
            .ok_or(ApiError::MissingField("access_token"))?;
        trace!("token exchange succeeded");
        Ok(AccessToken::new(token))
    }
}
