use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::HttpError;
use crate::secret::SecretString;

/// Default User-Agent string for HTTP requests
pub const DEFAULT_USER_AGENT: &str = concat!("hutch-http/", env!("CARGO_PKG_VERSION"));

/// Media type requested from the management API
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Default deadline for one request, body included
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum response body size (10 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// TLS root certificate configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Use Mozilla's root certificates (webpki-roots, no OS dependency)
    #[default]
    WebPki,
    /// Use OS native root certificate store
    Native,
}

/// Transport security configuration
///
/// The broker's management listener serves plain HTTP unless TLS is set up
/// explicitly, so plain HTTP is accepted by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// Accept both `http://` and `https://` URLs
    #[default]
    AllowInsecureHttp,
    /// Require TLS for all connections (HTTPS only)
    TlsOnly,
}

/// HTTP basic credentials attached to every request.
#[derive(Clone)]
pub struct BasicCredentials {
    username: String,
    password: SecretString,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Encode as an `Authorization` header value.
    ///
    /// The returned value is marked sensitive so it is never printed by
    /// `http`'s `Debug` implementation.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if the encoded value is not a
    /// valid header.
    pub fn header_value(&self) -> Result<http::HeaderValue, HttpError> {
        let raw = format!("{}:{}", self.username, self.password.expose());
        let mut value = http::HeaderValue::try_from(format!("Basic {}", STANDARD.encode(raw)))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &self.password)
            .finish()
    }
}

/// Overall HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Deadline for one request, from buffer admission to the last body
    /// byte (default: 30 seconds)
    pub request_timeout: Duration,

    /// Maximum response body size in bytes (default: 10 MiB)
    pub max_body_size: usize,

    /// User-Agent header value
    pub user_agent: String,

    /// Value for the `Accept` header added to every request (default: JSON)
    ///
    /// `None` leaves the header to the caller.
    pub accept: Option<String>,

    /// Basic credentials added as an `Authorization` header (default: none)
    pub credentials: Option<BasicCredentials>,

    /// Transport security mode (default: `AllowInsecureHttp`)
    pub transport: TransportSecurity,

    /// TLS root certificate strategy (default: `WebPki`)
    pub tls_roots: TlsRootConfig,

    /// Buffer capacity for concurrent request handling (default: 1024)
    ///
    /// Requests beyond this many in flight fail fast with `Overloaded`.
    pub buffer_capacity: usize,

    /// Timeout for idle pooled connections (default: 90 seconds)
    pub pool_idle_timeout: Option<Duration>,

    /// Maximum number of idle connections per host (default: 32)
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept: Some(JSON_MEDIA_TYPE.to_owned()),
            credentials: None,
            transport: TransportSecurity::default(),
            tls_roots: TlsRootConfig::default(),
            buffer_capacity: 1024,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}

impl HttpClientConfig {
    /// Configuration for tests against local mock servers
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024,
            buffer_capacity: 256,
            pool_idle_timeout: Some(Duration::from_secs(10)),
            pool_max_idle_per_host: 4,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_config_requests_json_with_finite_timeout() {
        let config = HttpClientConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.accept.as_deref(), Some("application/json"));
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(config.transport, TransportSecurity::AllowInsecureHttp);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn testing_preset_keeps_json_accept() {
        let config = HttpClientConfig::for_testing();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.accept.as_deref(), Some(JSON_MEDIA_TYPE));
    }

    #[test]
    fn basic_credentials_encode_header() {
        let creds = BasicCredentials::new("guest", "guest");
        let value = creds.header_value().unwrap();
        assert_eq!(value.to_str().unwrap(), "Basic Z3Vlc3Q6Z3Vlc3Q=");
        assert!(value.is_sensitive());
    }

    #[test]
    fn basic_credentials_debug_hides_password() {
        let creds = BasicCredentials::new("admin", "hunter2");
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("admin"));
        assert!(!dbg.contains("hunter2"));
    }
}
