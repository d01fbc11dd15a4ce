//! Domain types for the autoupload API.
//!
//! # Design
//! Listing payloads are owned by the remote service, so they stay an open
//! `string → value` map. Only the envelopes this crate builds itself
//! (`TokenBody`, `ImportBody`, `ListingOperation`) get concrete structs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A listing (ad), passed through unmodified.
pub type Listing = Map<String, Value>;

/// Deserialized body of a successful response; shape depends on the
/// operation.
pub type ApiResult = Value;

/// OAuth access token. The caller owns storage, expiry and refresh.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Operation a `ListingOperation` requests on the import endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Delete,
}

/// A degenerate listing that only names an id and an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingOperation {
    pub id: String,
    pub operation: Operation,
}

impl ListingOperation {
    pub fn delete(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operation: Operation::Delete,
        }
    }
}

/// One delete operation per id, in order.
pub fn listing_deletions<S: AsRef<str>>(ids: &[S]) -> Vec<ListingOperation> {
    ids.iter().map(|id| ListingOperation::delete(id.as_ref())).collect()
}

/// Body of every token-scoped request without a payload.
#[derive(Debug, Serialize)]
pub struct TokenBody<'a> {
    pub access_token: &'a str,
}

/// Body of `PUT /autoupload/import`.
#[derive(Debug, Serialize)]
pub struct ImportBody<'a, T: Serialize> {
    pub access_token: &'a str,
    pub ad_list: &'a [T],
}

/// Processing state of an import, as reported by the import-status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Pending,
    Error,
    Queued,
    Accepted,
    Refused,
}

impl ImportStatus {
    /// Reads the `status` field of an import-status result.
    pub fn of(result: &ApiResult) -> Option<Self> {
        result.get("status")?.as_str()?.parse().ok()
    }

    /// Whether the service is done with the import.
    pub fn is_final(&self) -> bool {
        matches!(self, ImportStatus::Error | ImportStatus::Accepted | ImportStatus::Refused)
    }
}

impl FromStr for ImportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ImportStatus::Pending),
            "error" => Ok(ImportStatus::Error),
            "queued" => Ok(ImportStatus::Queued),
            "accepted" => Ok(ImportStatus::Accepted),
            "refused" => Ok(ImportStatus::Refused),
            other => Err(format!("unknown import status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deletions_preserve_order() {
        let ops = listing_deletions(&["id1", "id2"]);
        let value = serde_json::to_value(&ops).unwrap();
        assert_eq!(
            value,
            json!([
                {"id": "id1", "operation": "delete"},
                {"id": "id2", "operation": "delete"}
            ])
        );
    }

    #[test]
    fn deletions_of_nothing_is_empty() {
        let ids: Vec<String> = Vec::new();
        assert!(listing_deletions(&ids).is_empty());
    }

    #[test]
    fn import_status_reads_status_field() {
        let result = json!({"token": "t-1", "status": "queued"});
        assert_eq!(ImportStatus::of(&result), Some(ImportStatus::Queued));
        assert!(!ImportStatus::Queued.is_final());
        assert!(ImportStatus::Refused.is_final());
    }

    #[test]
    fn import_status_unknown_value_is_none() {
        assert_eq!(ImportStatus::of(&json!({"status": "lost"})), None);
        assert_eq!(ImportStatus::of(&json!({})), None);
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("tok-xyz");
        assert_eq!(token.as_str(), "tok-xyz");
        assert!(!format!("{token:?}").contains("tok-xyz"));
    }
}
