//! Relative URL construction for management API resources.

use std::fmt;

use crate::error::{HutchError, Result};

/// Relative path under the management API, e.g. `api/vhosts/%2f`.
///
/// Segments appended with [`segment`](Self::segment) are percent-encoded,
/// so a literal `/` (the default virtual host) becomes `%2f`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// Start from a fixed namespace such as `api/connections`.
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self(namespace.trim_matches('/').to_owned())
    }

    /// Append one percent-encoded segment.
    #[must_use]
    pub fn segment(mut self, value: &str) -> Self {
        self.0.push('/');
        self.0.push_str(&encode_segment(value));
        self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Percent-encode a path segment using the broker's lowercase `%2f` for `/`.
#[must_use]
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).replace("%2F", "%2f")
}

/// Reject empty or whitespace-only identifiers before any request is built.
pub(crate) fn require<'a>(
    value: &'a str,
    field: &'static str,
    operation: &'static str,
) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(HutchError::invalid_argument(field, operation));
    }
    Ok(value)
}
