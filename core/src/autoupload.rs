//! Stateless request builder and response parser for the listing API.
//!
//! # Design
//! `AutouploadClient` holds only the application-host issuer. Every
//! operation takes the access token explicitly and sends it as the
//! `access_token` body field. `build_*` methods produce an `HttpRequest`;
//! all responses go through the same `parse`, since results are passed
//! through as JSON.

use serde::Serialize;

use crate::config::Hosts;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::issuer::{ContentType, Issuer};
use crate::normalize::normalize;
use crate::types::{listing_deletions, AccessToken, ApiResult, ImportBody, Listing, TokenBody};

pub const PUBLISHED_PATH: &str = "/autoupload/published";
pub const BASIC_USER_INFO_PATH: &str = "/oauth_api/basic_user_info";
pub const IMPORT_PATH: &str = "/autoupload/import";
pub const CAR_INFO_PATH: &str = "/autoupload/car_info";
pub const MOTO_INFO_PATH: &str = "/autoupload/moto_info";
pub const MOTO_CUBICCMS_INFO_PATH: &str = "/autoupload/moto_cubiccms_info";

/// Catalog path with the optional brand/model filters.
///
/// Filtering is hierarchical: a missing or zero `brand_id` drops both
/// filters.
pub fn catalog_path(base: &str, brand_id: Option<u32>, model_id: Option<u32>) -> String {
    match (brand_id.filter(|id| *id != 0), model_id.filter(|id| *id != 0)) {
        (None, _) => base.to_string(),
        (Some(brand), None) => format!("{base}/{brand}"),
        (Some(brand), Some(model)) => format!("{base}/{brand}/{model}"),
    }
}

#[derive(Debug, Clone)]
pub struct AutouploadClient {
    app: Issuer,
}

impl AutouploadClient {
    pub fn new(hosts: &Hosts) -> Self {
        Self::from_issuer(Issuer::new(&hosts.app_url, ContentType::Json))
    }

    pub fn from_issuer(app: Issuer) -> Self {
        Self { app }
    }

    pub fn build_published(&self, token: &AccessToken) -> Result<HttpRequest, ApiError> {
        self.token_only(HttpMethod::Post, PUBLISHED_PATH, token)
    }

    pub fn build_basic_user_info(&self, token: &AccessToken) -> Result<HttpRequest, ApiError> {
        self.token_only(HttpMethod::Post, BASIC_USER_INFO_PATH, token)
    }

    pub fn build_publish(
        &self,
        token: &AccessToken,
        listings: &[Listing],
    ) -> Result<HttpRequest, ApiError> {
        self.import(token, listings)
    }

    pub fn build_delete<S: AsRef<str>>(
        &self,
        token: &AccessToken,
        ids: &[S],
    ) -> Result<HttpRequest, ApiError> {
        self.import(token, &listing_deletions(ids))
    }

    /// `import_token` is the tracking token returned by an accepted import.
    pub fn build_import_status(
        &self,
        token: &AccessToken,
        import_token: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.token_only(HttpMethod::Post, &format!("{IMPORT_PATH}/{import_token}"), token)
    }

    pub fn build_car_info(
        &self,
        token: &AccessToken,
        brand_id: Option<u32>,
        model_id: Option<u32>,
    ) -> Result<HttpRequest, ApiError> {
        self.token_only(HttpMethod::Post, &catalog_path(CAR_INFO_PATH, brand_id, model_id), token)
    }

    pub fn build_moto_info(
        &self,
        token: &AccessToken,
        brand_id: Option<u32>,
        model_id: Option<u32>,
    ) -> Result<HttpRequest, ApiError> {
        self.token_only(HttpMethod::Post, &catalog_path(MOTO_INFO_PATH, brand_id, model_id), token)
    }

    pub fn build_moto_cubiccms_info(&self, token: &AccessToken) -> Result<HttpRequest, ApiError> {
        self.token_only(HttpMethod::Post, MOTO_CUBICCMS_INFO_PATH, token)
    }

    pub fn parse(&self, response: HttpResponse) -> Result<ApiResult, ApiError> {
        normalize(response)
    }

    fn token_only(
        &self,
        method: HttpMethod,
        path: &str,
        token: &AccessToken,
    ) -> Result<HttpRequest, ApiError> {
        let body = TokenBody {
            access_token: token.as_str(),
        };
        self.json(method, path, &body)
    }

    fn import<T: Serialize>(
        &self,
        token: &AccessToken,
        ad_list: &[T],
    ) -> Result<HttpRequest, ApiError> {
        let body = ImportBody {
            access_token: token.as_str(),
            ad_list,
        };
        self.json(HttpMethod::Put, IMPORT_PATH, &body)
    }

    fn json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.app.request(method, path, Some(body)))
    }
}
