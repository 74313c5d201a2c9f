//! Broker-side objects as the management API reports them.
//!
//! Every model tolerates missing and unknown fields so that newer broker
//! versions decode without changes here.

mod channel;
mod command;
mod connection;
mod parameter;
mod user;
mod vhost;

pub use channel::{Channel, ConnectionDetails};
pub use command::{BrokerErrorBody, CommandResult};
pub use connection::Connection;
pub use parameter::{Parameter, ParameterSettings};
pub use user::{User, UserSettings, UserTag, UserTags};
pub use vhost::VirtualHost;
