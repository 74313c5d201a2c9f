use hutch_http::HttpError;
use http::StatusCode;
use thiserror::Error;

/// Result alias used by every broker operation.
pub type Result<T, E = HutchError> = std::result::Result<T, E>;

/// Failures surfaced by the management client.
///
/// Argument and configuration problems are raised before any request is
/// sent. A non-success HTTP status is a [`HutchError::Response`], never a
/// transport failure.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HutchError {
    #[error("{operation}: invalid argument `{field}` (empty or whitespace)")]
    InvalidArgument {
        field: &'static str,
        operation: &'static str,
    },

    /// A request body could not be serialized to JSON.
    #[error("{operation}: invalid argument `body`: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: missing or invalid configuration `{field}`{}", detail_suffix(.detail))]
    Configuration {
        field: &'static str,
        operation: &'static str,
        detail: Option<String>,
    },

    #[error("transport failure: {0}")]
    Transport(#[source] HttpError),

    #[error("operation cancelled")]
    Cancelled,

    /// The broker answered with a non-success status.
    #[error("broker returned {status}{}", detail_suffix(.reason))]
    Response {
        status: StatusCode,
        /// Body text, cut to a bounded preview
        body: String,
        /// `error` field of the broker's JSON envelope, when present
        error: Option<String>,
        /// `reason` field of the broker's JSON envelope, when present
        reason: Option<String>,
    },

    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map_or_else(String::new, |d| format!(": {d}"))
}

/// Fieldless mirror of [`HutchError`] for matching and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    Configuration,
    Transport,
    Cancelled,
    Response,
    Decode,
}

impl HutchError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } | Self::Encode { .. } => ErrorKind::InvalidArgument,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Response { .. } => ErrorKind::Response,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTP status of a broker response error.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub(crate) fn invalid_argument(field: &'static str, operation: &'static str) -> Self {
        Self::InvalidArgument { field, operation }
    }

    pub(crate) fn configuration(field: &'static str, operation: &'static str) -> Self {
        Self::Configuration {
            field,
            operation,
            detail: None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn kind_mirrors_variant() {
        assert_eq!(
            HutchError::invalid_argument("name", "ConnectionClient::get").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(HutchError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            HutchError::Transport(HttpError::Overloaded).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn not_found_is_detected_from_status() {
        let err = HutchError::Response {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
            error: Some("Object Not Found".to_owned()),
            reason: Some("Not Found".to_owned()),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!HutchError::Cancelled.is_not_found());
    }

    #[test]
    fn display_names_field_and_operation() {
        let err = HutchError::configuration("host_url", "ClientConfigBuilder::build");
        assert_eq!(
            err.to_string(),
            "ClientConfigBuilder::build: missing or invalid configuration `host_url`"
        );

        let err = HutchError::Response {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
            error: None,
            reason: Some("no such vhost".to_owned()),
        };
        assert_eq!(err.to_string(), "broker returned 404 Not Found: no such vhost");
    }
}
