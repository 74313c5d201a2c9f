use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::mapper::ResponseMapper;
use crate::model::Channel;
use crate::path::{ResourcePath, require};
use crate::transport::TransportCore;

const NAMESPACE: &str = "api/channels";

/// Read-only access to open channels.
#[derive(Debug, Clone)]
pub struct ChannelClient {
    core: TransportCore,
    mapper: ResponseMapper,
}

impl ChannelClient {
    pub(crate) fn new(core: TransportCore) -> Self {
        Self {
            core,
            mapper: ResponseMapper,
        }
    }

    /// All channels on the broker, in the broker's order.
    ///
    /// # Errors
    /// Cancellation, transport, response or decode failures.
    pub async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Channel>> {
        self.core.log().info("listing all channels");
        let raw = self.core.get(NAMESPACE, cancel).await?;
        self.mapper.decode_many(raw, cancel)
    }

    /// # Errors
    /// `InvalidArgument` for a blank name; otherwise as [`Self::get_all`].
    pub async fn get(&self, name: &str, cancel: &CancellationToken) -> Result<Channel> {
        let name = require(name, "name", "ChannelClient::get")?;
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!("fetching channel '{name}'"));
        let raw = self.core.get(path.as_str(), cancel).await?;
        self.mapper.decode(raw, cancel)
    }
}
