#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the hutch broker management client
//!
//! A hyper-based client over a tower stack with:
//! - TLS via rustls (WebPKI or native roots), plain HTTP allowed by default
//! - Connection pooling (HTTP/1.1 and HTTP/2 via ALPN)
//! - A per-request deadline (30s by default) that also covers the body
//! - Default `User-Agent`, `Accept` and basic `Authorization` headers
//! - Transparent response decompression (gzip, brotli, deflate)
//! - Body size limits applied to decompressed bytes
//!
//! Request URLs are never normalized: `%2f` and other escapes reach the
//! server exactly as written.
//!
//! # Example
//!
//! ```ignore
//! use hutch_http::{BasicCredentials, HttpClient, Transport};
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .credentials(BasicCredentials::new("guest", "guest"))
//!     .build()?;
//!
//! let request = http::Request::get("http://localhost:15672/api/vhosts/%2f")
//!     .body(bytes::Bytes::new())?;
//! let raw = client.send(request).await?;
//! assert!(raw.status.is_success());
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod secret;
mod tls;
mod transport;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{
    BasicCredentials, DEFAULT_MAX_BODY_SIZE, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
    HttpClientConfig, JSON_MEDIA_TYPE, TlsRootConfig, TransportSecurity,
};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{DefaultHeadersLayer, DefaultHeadersService};
pub use response::{ERROR_BODY_PREVIEW_LIMIT, RawResponse, ResponseBody};
pub use secret::SecretString;
pub use tls::native_root_certs;
pub use transport::Transport;
