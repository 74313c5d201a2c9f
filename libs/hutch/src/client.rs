use std::sync::Arc;

use hutch_http::{HttpClientBuilder, Transport};

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::error::{HutchError, Result};
use crate::logging::sink_or_noop;
use crate::resources::{
    ChannelClient, ConnectionClient, ParameterClient, UserClient, VirtualHostClient,
};
use crate::transport::TransportCore;

/// Entry point to the management API.
///
/// Owns one [`TransportCore`] shared by every resource client. Cloning is
/// cheap and clones share the same connection pool.
///
/// ```ignore
/// let client = Client::builder()
///     .connect_to("http://localhost:15672")
///     .authenticate_as("guest", "guest")
///     .connect()?;
///
/// let cancel = CancellationToken::new();
/// for conn in client.connections().get_all(&cancel).await? {
///     println!("{} ({})", conn.name, conn.state);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    connections: ConnectionClient,
    channels: ChannelClient,
    users: UserClient,
    parameters: ParameterClient,
    vhosts: VirtualHostClient,
}

impl Client {
    /// Compose a client over the pooled HTTP stack.
    ///
    /// Must be called from within a Tokio runtime. No connection is opened
    /// until the first operation.
    ///
    /// # Errors
    /// [`HutchError::Transport`] if the HTTP stack cannot be set up (TLS
    /// roots, malformed default headers).
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClientBuilder::with_config(config.http_config())
            .build()
            .map_err(HutchError::Transport)?;
        Ok(Self::with_transport(config, Arc::new(http)))
    }

    /// Compose a client over any [`Transport`].
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let log = sink_or_noop(config.log_sink());
        let core = TransportCore::new(transport, config.host_url(), log);

        Self {
            connections: ConnectionClient::new(core.clone()),
            channels: ChannelClient::new(core.clone()),
            users: UserClient::new(core.clone()),
            parameters: ParameterClient::new(core.clone(), config.virtual_host()),
            vhosts: VirtualHostClient::new(core),
            config,
        }
    }

    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    #[must_use]
    pub fn connections(&self) -> &ConnectionClient {
        &self.connections
    }

    #[must_use]
    pub fn channels(&self) -> &ChannelClient {
        &self.channels
    }

    #[must_use]
    pub fn users(&self) -> &UserClient {
        &self.users
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterClient {
        &self.parameters
    }

    #[must_use]
    pub fn vhosts(&self) -> &VirtualHostClient {
        &self.vhosts
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
