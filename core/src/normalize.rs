//! Response/error normalization shared by every operation.
//!
//! A 2xx response yields its JSON body. A non-2xx response yields the body
//! the service sent as `ApiError::Remote`, or `ApiError::Status` when there
//! was none. Transport failures never reach this module; they are returned
//! by the transport itself.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

pub fn normalize(response: HttpResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(remote_error(response));
    }
    // 204 and friends.
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn remote_error(response: HttpResponse) -> ApiError {
    let HttpResponse { status, body, .. } = response;
    if body.trim().is_empty() {
        return ApiError::Status { status };
    }
    let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
    ApiError::Remote { status, body }
}
