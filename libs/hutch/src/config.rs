use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hutch_http::{BasicCredentials, HttpClientConfig, SecretString};

use crate::client::Client;
use crate::error::{HutchError, Result};
use crate::logging::{LogSink, SharedLogSink, TracingSink};

/// Virtual host used when none is configured.
pub const DEFAULT_VIRTUAL_HOST: &str = "/";

/// User-Agent sent by the broker client
pub const USER_AGENT: &str = concat!("hutch/", env!("CARGO_PKG_VERSION"));

const BUILD_OPERATION: &str = "ClientConfigBuilder::build";

/// Sealed description of how to reach the broker.
///
/// Only [`ClientConfigBuilder::build`] creates one, so every instance has
/// passed validation.
#[derive(Clone)]
pub struct ClientConfig {
    host_url: String,
    username: String,
    password: SecretString,
    virtual_host: String,
    timeout: Option<Duration>,
    log_sink: Option<SharedLogSink>,
}

impl ClientConfig {
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Base URL without a trailing slash, e.g. `http://localhost:15672`.
    #[must_use]
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    #[must_use]
    pub fn virtual_host(&self) -> &str {
        &self.virtual_host
    }

    /// Request timeout; `None` keeps the transport default.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn log_sink(&self) -> Option<&SharedLogSink> {
        self.log_sink.as_ref()
    }

    /// HTTP stack settings derived from this configuration.
    ///
    /// Without a configured timeout the transport default
    /// ([`DEFAULT_REQUEST_TIMEOUT`](hutch_http::DEFAULT_REQUEST_TIMEOUT)) applies.
    #[must_use]
    pub fn http_config(&self) -> HttpClientConfig {
        let mut http = HttpClientConfig {
            user_agent: USER_AGENT.to_owned(),
            credentials: Some(BasicCredentials::new(
                self.username.clone(),
                self.password.clone(),
            )),
            ..HttpClientConfig::default()
        };
        if let Some(timeout) = self.timeout {
            http.request_timeout = timeout;
        }
        http
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host_url", &self.host_url)
            .field("username", &self.username)
            .field("password", &self.password)
            .field("virtual_host", &self.virtual_host)
            .field("timeout", &self.timeout)
            .field("logging", &self.log_sink.is_some())
            .finish()
    }
}

/// Fluent builder for [`ClientConfig`].
///
/// ```ignore
/// let client = ClientConfigBuilder::new()
///     .connect_to("http://localhost:15672")
///     .authenticate_as("guest", "guest")
///     .timeout_after(Duration::from_secs(5))
///     .enable_tracing()
///     .connect()?;
/// ```
#[derive(Clone)]
pub struct ClientConfigBuilder {
    host_url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    virtual_host: String,
    timeout: Option<Duration>,
    log_sink: Option<SharedLogSink>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            host_url: None,
            username: None,
            password: None,
            virtual_host: DEFAULT_VIRTUAL_HOST.to_owned(),
            timeout: None,
            log_sink: None,
        }
    }
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("host_url", &self.host_url)
            .field("username", &self.username)
            .field("password", &self.password)
            .field("virtual_host", &self.virtual_host)
            .field("timeout", &self.timeout)
            .field("logging", &self.log_sink.is_some())
            .finish()
    }
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Management API base URL, e.g. `http://localhost:15672`.
    #[must_use]
    pub fn connect_to(mut self, host_url: impl Into<String>) -> Self {
        self.host_url = Some(host_url.into());
        self
    }

    #[must_use]
    pub fn authenticate_as(
        mut self,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Virtual host used by vhost-scoped operations (default `/`).
    #[must_use]
    pub fn use_virtual_host(mut self, name: impl Into<String>) -> Self {
        self.virtual_host = name.into();
        self
    }

    /// Per-request timeout. Zero keeps the transport default.
    #[must_use]
    pub fn timeout_after(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn enable_logging(mut self, sink: impl LogSink + 'static) -> Self {
        self.log_sink = Some(Arc::new(sink));
        self
    }

    /// Send the client's log lines to `tracing`.
    #[must_use]
    pub fn enable_tracing(self) -> Self {
        self.enable_logging(TracingSink)
    }

    /// Validate and seal the configuration.
    ///
    /// # Errors
    /// Returns [`HutchError::Configuration`] naming the first field that is
    /// missing, blank or (for the host URL) not an absolute `http`/`https`
    /// URL.
    pub fn build(self) -> Result<ClientConfig> {
        let host_url = required(self.host_url, "host_url")?;
        let host_url = validate_host_url(&host_url)?;
        let username = required(self.username, "username")?;
        let password = match self.password {
            Some(password) if !password.is_blank() => password,
            _ => return Err(HutchError::configuration("password", BUILD_OPERATION)),
        };
        let virtual_host = required(Some(self.virtual_host), "virtual_host")?;

        Ok(ClientConfig {
            host_url,
            username,
            password,
            virtual_host,
            timeout: self.timeout.filter(|t| !t.is_zero()),
            log_sink: self.log_sink,
        })
    }

    /// Validate, seal and compose a [`Client`] in one step.
    ///
    /// # Errors
    /// Returns [`HutchError::Configuration`] for an invalid configuration
    /// and [`HutchError::Transport`] if the HTTP stack cannot be set up.
    pub fn connect(self) -> Result<Client> {
        Client::new(self.build()?)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(HutchError::configuration(field, BUILD_OPERATION)),
    }
}

fn validate_host_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |detail: String| HutchError::Configuration {
        field: "host_url",
        operation: BUILD_OPERATION,
        detail: Some(detail),
    };

    let uri: http::Uri = trimmed
        .parse()
        .map_err(|e: http::uri::InvalidUri| invalid(e.to_string()))?;
    match uri.scheme_str() {
        Some("http" | "https") => {}
        Some(other) => return Err(invalid(format!("unsupported scheme `{other}`"))),
        None => return Err(invalid("expected an absolute URL".to_owned())),
    }
    if uri.authority().is_none() {
        return Err(invalid("missing host".to_owned()));
    }
    Ok(trimmed.to_owned())
}
