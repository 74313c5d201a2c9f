use tokio_util::sync::CancellationToken;

use super::ChannelClient;
use crate::error::Result;
use crate::mapper::ResponseMapper;
use crate::model::{CommandResult, Connection};
use crate::path::{ResourcePath, require};
use crate::transport::TransportCore;

const NAMESPACE: &str = "api/connections";

/// Client connections, plus their channels through [`channels`](Self::channels).
#[derive(Debug, Clone)]
pub struct ConnectionClient {
    core: TransportCore,
    mapper: ResponseMapper,
    channels: ChannelClient,
}

impl ConnectionClient {
    pub(crate) fn new(core: TransportCore) -> Self {
        Self {
            channels: ChannelClient::new(core.clone()),
            core,
            mapper: ResponseMapper,
        }
    }

    #[must_use]
    pub fn channels(&self) -> &ChannelClient {
        &self.channels
    }

    /// All connections on the broker, in the broker's order.
    ///
    /// # Errors
    /// Cancellation, transport, response or decode failures.
    pub async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Connection>> {
        self.core.log().info("listing all connections");
        let raw = self.core.get(NAMESPACE, cancel).await?;
        self.mapper.decode_many(raw, cancel)
    }

    /// # Errors
    /// `InvalidArgument` for a blank name; otherwise as [`Self::get_all`].
    pub async fn get(&self, name: &str, cancel: &CancellationToken) -> Result<Connection> {
        let name = require(name, "name", "ConnectionClient::get")?;
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!("fetching connection '{name}'"));
        let raw = self.core.get(path.as_str(), cancel).await?;
        self.mapper.decode(raw, cancel)
    }

    /// Close a connection.
    ///
    /// Closing one that is already gone surfaces the broker's 404 as
    /// `HutchError::Response`.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank name, then cancellation, transport or
    /// response failures.
    pub async fn delete(&self, name: &str, cancel: &CancellationToken) -> Result<CommandResult> {
        let name = require(name, "name", "ConnectionClient::delete")?;
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!("closing connection '{name}'"));
        let raw = self.core.delete(path.as_str(), cancel).await?;
        self.mapper.command_result(raw, cancel)
    }
}
