use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::mapper::ResponseMapper;
use crate::model::{CommandResult, Parameter, ParameterSettings};
use crate::path::{ResourcePath, require};
use crate::transport::TransportCore;

const NAMESPACE: &str = "api/parameters";

/// Runtime parameters, grouped by component and scoped to a virtual host.
///
/// Vhost-scoped operations target the configured virtual host unless the
/// client was rescoped with [`in_vhost`](Self::in_vhost).
#[derive(Debug, Clone)]
pub struct ParameterClient {
    core: TransportCore,
    mapper: ResponseMapper,
    vhost: Arc<str>,
}

impl ParameterClient {
    pub(crate) fn new(core: TransportCore, vhost: &str) -> Self {
        Self {
            core,
            mapper: ResponseMapper,
            vhost: Arc::from(vhost),
        }
    }

    /// A copy of this client scoped to another virtual host.
    #[must_use]
    pub fn in_vhost(&self, vhost: &str) -> Self {
        Self {
            core: self.core.clone(),
            mapper: self.mapper,
            vhost: Arc::from(vhost),
        }
    }

    /// Virtual host targeted by scoped operations.
    #[must_use]
    pub fn vhost(&self) -> &str {
        &self.vhost
    }

    /// Every parameter in every component and vhost.
    ///
    /// # Errors
    /// Cancellation, transport, response or decode failures.
    pub async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Parameter>> {
        self.core.log().info("listing all parameters");
        let raw = self.core.get(NAMESPACE, cancel).await?;
        self.mapper.decode_many(raw, cancel)
    }

    /// Parameters of one component across all vhosts.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank component; otherwise as [`Self::get_all`].
    pub async fn get_all_in_component(
        &self,
        component: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Parameter>> {
        let component = require(component, "component", "ParameterClient::get_all_in_component")?;
        let path = ResourcePath::new(NAMESPACE).segment(component);
        self.core
            .log()
            .info(&format!("listing parameters of component '{component}'"));
        let raw = self.core.get(path.as_str(), cancel).await?;
        self.mapper.decode_many(raw, cancel)
    }

    /// Parameters of one component in the scoped vhost.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank component or vhost; otherwise as
    /// [`Self::get_all`].
    pub async fn get_all_in_component_vhost(
        &self,
        component: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Parameter>> {
        const OP: &str = "ParameterClient::get_all_in_component_vhost";
        let component = require(component, "component", OP)?;
        let vhost = require(&self.vhost, "vhost", OP)?;
        let path = ResourcePath::new(NAMESPACE).segment(component).segment(vhost);
        self.core.log().info(&format!(
            "listing parameters of component '{component}' in vhost '{vhost}'"
        ));
        let raw = self.core.get(path.as_str(), cancel).await?;
        self.mapper.decode_many(raw, cancel)
    }

    /// # Errors
    /// `InvalidArgument` for a blank component, name or vhost; otherwise as
    /// [`Self::get_all`].
    pub async fn get(
        &self,
        component: &str,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Parameter> {
        let path = self.scoped_path(component, name, "ParameterClient::get")?;
        self.core
            .log()
            .info(&format!("fetching parameter '{component}/{name}' in vhost '{}'", self.vhost));
        let raw = self.core.get(path.as_str(), cancel).await?;
        self.mapper.decode(raw, cancel)
    }

    /// Create or replace a parameter in the scoped vhost.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank component, name or vhost, then
    /// cancellation, transport or response failures.
    pub async fn create(
        &self,
        component: &str,
        name: &str,
        value: Value,
        cancel: &CancellationToken,
    ) -> Result<CommandResult> {
        let path = self.scoped_path(component, name, "ParameterClient::create")?;
        let settings = ParameterSettings {
            component: component.to_owned(),
            vhost: self.vhost.to_string(),
            name: name.to_owned(),
            value,
        };
        self.core
            .log()
            .info(&format!("creating parameter '{component}/{name}' in vhost '{}'", self.vhost));
        let raw = self.core.put(path.as_str(), &settings, cancel).await?;
        self.mapper.command_result(raw, cancel)
    }

    /// # Errors
    /// `InvalidArgument` for a blank component, name or vhost, then
    /// cancellation, transport or response failures.
    pub async fn delete(
        &self,
        component: &str,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<CommandResult> {
        let path = self.scoped_path(component, name, "ParameterClient::delete")?;
        self.core
            .log()
            .info(&format!("deleting parameter '{component}/{name}' in vhost '{}'", self.vhost));
        let raw = self.core.delete(path.as_str(), cancel).await?;
        self.mapper.command_result(raw, cancel)
    }

    fn scoped_path(
        &self,
        component: &str,
        name: &str,
        operation: &'static str,
    ) -> Result<ResourcePath> {
        let component = require(component, "component", operation)?;
        let name = require(name, "name", operation)?;
        let vhost = require(&self.vhost, "vhost", operation)?;
        Ok(ResourcePath::new(NAMESPACE)
            .segment(component)
            .segment(vhost)
            .segment(name))
    }
}
