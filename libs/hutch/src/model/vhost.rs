use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualHost {
    pub name: String,
    pub description: String,
    pub tracing: bool,
    pub messages: u64,
    pub messages_ready: u64,
    pub messages_unacknowledged: u64,
}
