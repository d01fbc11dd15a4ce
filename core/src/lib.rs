//! Blocking client for a classifieds platform's OAuth and autoupload API.
//!
//! # Overview
//! Two hosts are involved: the authentication host (authorization URL,
//! token exchange) and the application host (listing operations). Each
//! operation is one REST call; results are returned as the JSON body the
//! service sent, errors as the remote error body or the raw transport
//! failure.
//!
//! # Design
//! - `OAuthClient` and `AutouploadClient` only build `HttpRequest` values and
//!   parse `HttpResponse` values (host-does-IO), so they are deterministic and
//!   usable with any HTTP stack.
//! - `Client` (credentials) and `Autoupload` (token-scoped, no credentials)
//!   execute those requests through an `HttpTransport`, `UreqTransport` by
//!   default.
//! - The access token is always sent as a body field, never as a header.
//!
//! ```no_run
//! use autoupload_core::{Autoupload, Client};
//!
//! let client = Client::new("client-id", "client-secret", "https://example.com/cb");
//! println!("send the user to {}", client.auth_url(true, Some("csrf-state")));
//!
//! let token = client.get_token("code-from-redirect")?;
//! let ads = Autoupload::new().published(&token)?;
//! println!("{ads}");
//! # Ok::<(), autoupload_core::ApiError>(())
//! ```

pub mod autoupload;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod issuer;
pub mod normalize;
pub mod oauth;
pub mod transport;
pub mod types;

pub use autoupload::AutouploadClient;
pub use client::{Autoupload, Client};
pub use config::{Config, Credentials, Hosts};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use issuer::{ContentType, Issuer, Issuers};
pub use oauth::OAuthClient;
pub use transport::{HttpTransport, UreqTransport};
pub use types::{AccessToken, ApiResult, ImportStatus, Listing, ListingOperation, Operation};
