#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Typed client for the RabbitMQ HTTP management API
//!
//! Lists, fetches, creates and deletes broker objects (connections,
//! channels, users, runtime parameters, virtual hosts) without hand-built
//! URLs or JSON.
//!
//! - One [`Client`] owns one pooled HTTP stack ([`hutch_http`]) shared by
//!   every resource client
//! - Every operation takes a [`CancellationToken`]; firing it resolves the
//!   call to [`HutchError::Cancelled`] and aborts the in-flight request
//! - Identifiers are percent-encoded per segment; the default virtual host
//!   `/` is sent as `%2f` and never normalized away
//! - Failures are one [`HutchError`] type: bad input and configuration are
//!   reported before any request, broker statuses as `Response`, malformed
//!   bodies as `Decode`
//! - No automatic retries
//!
//! # Example
//!
//! ```ignore
//! use hutch::{Client, UserSettings, UserTag};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = Client::builder()
//!     .connect_to("http://localhost:15672")
//!     .authenticate_as("guest", "guest")
//!     .enable_tracing()
//!     .connect()?;
//!
//! let cancel = CancellationToken::new();
//! let settings = UserSettings::new("s3cret").with_tag(UserTag::Monitoring);
//! client.users().create("metrics", &settings, &cancel).await?;
//! let vhost = client.vhosts().get("/", &cancel).await?;
//! ```
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod client;
mod config;
mod error;
mod logging;
mod mapper;
pub mod model;
mod path;
pub mod resources;
mod settings;
mod transport;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_VIRTUAL_HOST, USER_AGENT};
pub use error::{ErrorKind, HutchError, Result};
pub use logging::{LogSink, SharedLogSink, TracingSink};
pub use mapper::ResponseMapper;
pub use model::{
    BrokerErrorBody, Channel, CommandResult, Connection, ConnectionDetails, Parameter,
    ParameterSettings, User, UserSettings, UserTag, UserTags, VirtualHost,
};
pub use path::{ResourcePath, encode_segment};
pub use resources::{
    ChannelClient, ConnectionClient, ParameterClient, UserClient, VirtualHostClient,
};
pub use settings::{ClientSettings, ENV_PREFIX};
pub use transport::TransportCore;

pub use hutch_http::{HttpError, RawResponse, SecretString, Transport};
pub use tokio_util::sync::CancellationToken;
