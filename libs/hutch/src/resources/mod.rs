//! One client per resource family, all sharing a single [`TransportCore`].
//!
//! Every operation validates its identifiers, builds an encoded relative
//! path, logs one line through the configured sink, issues the request and
//! maps the response.
//!
//! [`TransportCore`]: crate::TransportCore

mod channels;
mod connections;
mod parameters;
mod users;
mod vhosts;

pub use channels::ChannelClient;
pub use connections::ConnectionClient;
pub use parameters::ParameterClient;
pub use users::UserClient;
pub use vhosts::VirtualHostClient;
