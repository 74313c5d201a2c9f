use tokio_util::sync::CancellationToken;

use crate::error::{HutchError, Result};
use crate::mapper::ResponseMapper;
use crate::model::{CommandResult, User, UserSettings};
use crate::path::{ResourcePath, require};
use crate::transport::TransportCore;

const NAMESPACE: &str = "api/users";

/// Management users and their tags.
#[derive(Debug, Clone)]
pub struct UserClient {
    core: TransportCore,
    mapper: ResponseMapper,
}

impl UserClient {
    pub(crate) fn new(core: TransportCore) -> Self {
        Self {
            core,
            mapper: ResponseMapper,
        }
    }

    /// # Errors
    /// Cancellation, transport, response or decode failures.
    pub async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<User>> {
        self.core.log().info("listing all users");
        let raw = self.core.get(NAMESPACE, cancel).await?;
        self.mapper.decode_many(raw, cancel)
    }

    /// # Errors
    /// `InvalidArgument` for a blank name; otherwise as [`Self::get_all`].
    pub async fn get(&self, name: &str, cancel: &CancellationToken) -> Result<User> {
        let name = require(name, "name", "UserClient::get")?;
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!("fetching user '{name}'"));
        let raw = self.core.get(path.as_str(), cancel).await?;
        self.mapper.decode(raw, cancel)
    }

    /// Create or replace a user.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank name or password, then cancellation,
    /// transport or response failures.
    pub async fn create(
        &self,
        name: &str,
        settings: &UserSettings,
        cancel: &CancellationToken,
    ) -> Result<CommandResult> {
        let name = require(name, "name", "UserClient::create")?;
        if settings.password.trim().is_empty() {
            return Err(HutchError::invalid_argument("password", "UserClient::create"));
        }
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!(
            "creating user '{name}' with tags [{}]",
            settings.tags
        ));
        let raw = self.core.put(path.as_str(), settings, cancel).await?;
        self.mapper.command_result(raw, cancel)
    }

    /// # Errors
    /// `InvalidArgument` for a blank name, then cancellation, transport or
    /// response failures.
    pub async fn delete(&self, name: &str, cancel: &CancellationToken) -> Result<CommandResult> {
        let name = require(name, "name", "UserClient::delete")?;
        let path = ResourcePath::new(NAMESPACE).segment(name);
        self.core.log().info(&format!("deleting user '{name}'"));
        let raw = self.core.delete(path.as_str(), cancel).await?;
        self.mapper.command_result(raw, cancel)
    }
}
