use serde::{Deserialize, Serialize};

/// A channel multiplexed over a connection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub name: String,
    pub node: String,
    pub number: u32,
    pub user: String,
    pub vhost: String,
    pub state: String,
    pub consumer_count: u32,
    pub prefetch_count: u32,
    pub messages_unacknowledged: u64,
    pub messages_unconfirmed: u64,
    pub confirm: bool,
    pub transactional: bool,
    pub connection_details: ConnectionDetails,
}

/// The owning connection as embedded in a channel record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionDetails {
    pub name: String,
    pub peer_host: String,
    pub peer_port: u16,
}
