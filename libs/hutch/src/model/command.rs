use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Outcome of a command that returns no model (create, delete, close).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandResult {
    pub status: u16,
    /// Canonical reason phrase for `status`
    pub reason: Option<String>,
}

impl CommandResult {
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_owned),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error envelope the broker sends with non-success statuses:
/// `{"error": "Object Not Found", "reason": "Not Found"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerErrorBody {
    pub error: Option<String>,
    pub reason: Option<String>,
}
