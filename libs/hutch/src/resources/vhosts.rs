use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::mapper::ResponseMapper;
use crate::model::{CommandResult, VirtualHost};
use crate::path::{ResourcePath, require};
use crate::transport::TransportCore;

const NAMESPACE: &str = "api/vhosts";

#[derive(Debug, Clone)]
pub struct VirtualHostClient {
    core: TransportCore,
    mapper: ResponseMapper,
}

impl VirtualHostClient {
    pub(crate) fn new(core: TransportCore) -> Self {
        Self {
            core,
            mapper: ResponseMapper,
        }
    }

    /// # Errors
    /// Cancellation, transport, response or decode failures.
    pub async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<VirtualHost>> {
        self.core.log().info("listing all virtual hosts");
        let raw = self.core.get(NAMESPACE, cancel).await?;
        self.mapper.decode_many(raw, cancel)
    }

    /// Fetch one virtual host; `/` is sent as `%2f`.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank name; otherwise as [`Self::get_all`].
    pub async fn get(&self, name: &str, cancel: &CancellationToken) -> Result<VirtualHost> {
        let name = require(name, "name", "VirtualHostClient::get")?;
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!("fetching virtual host '{name}'"));
        let raw = self.core.get(path.as_str(), cancel).await?;
        self.mapper.decode(raw, cancel)
    }

    /// # Errors
    /// `InvalidArgument` for a blank name, then cancellation, transport or
    /// response failures.
    pub async fn create(&self, name: &str, cancel: &CancellationToken) -> Result<CommandResult> {
        let name = require(name, "name", "VirtualHostClient::create")?;
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!("creating virtual host '{name}'"));
        let raw = self
            .core
            .put(path.as_str(), &serde_json::json!({}), cancel)
            .await?;
        self.mapper.command_result(raw, cancel)
    }

    /// # Errors
    /// `InvalidArgument` for a blank name, then cancellation, transport or
    /// response failures.
    pub async fn delete(&self, name: &str, cancel: &CancellationToken) -> Result<CommandResult> {
        let name = require(name, "name", "VirtualHostClient::delete")?;
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!("deleting virtual host '{name}'"));
        let raw = self.core.delete(path.as_str(), cancel).await?;
        self.mapper.command_result(raw, cancel)
    }
}
