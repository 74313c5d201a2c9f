use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An AMQP (or other protocol) client connection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub name: String,
    pub node: String,
    pub vhost: String,
    pub user: String,
    pub state: String,
    pub protocol: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub channels: u32,
    pub host: String,
    pub port: u16,
    pub peer_host: String,
    pub peer_port: u16,
    pub ssl: bool,
    pub auth_mechanism: String,
    /// Negotiated heartbeat timeout in seconds
    pub timeout: u32,
    pub frame_max: u64,
    pub recv_oct: u64,
    pub send_oct: u64,
    /// Milliseconds since the Unix epoch
    pub connected_at: u64,
    pub client_properties: Map<String, Value>,
}
