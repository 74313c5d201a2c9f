use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A runtime parameter, e.g. a federation upstream or a shovel definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub component: String,
    pub vhost: String,
    pub name: String,
    pub value: Value,
}

/// Body of `PUT api/parameters/{component}/{vhost}/{name}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSettings {
    pub component: String,
    pub vhost: String,
    pub name: String,
    pub value: Value,
}
