//! Caller-facing log channel.
//!
//! Clients log one informational line per operation and one error line per
//! transport failure. Where those lines go is up to the caller; when no sink
//! is configured they are dropped.

use std::sync::Arc;

/// Receives the client's informational and error lines.
///
/// Implementations must be cheap and must not block; they are called on
/// the request path.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Shared handle to a sink.
pub type SharedLogSink = Arc<dyn LogSink>;

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Forwards every line to `tracing` under the `hutch` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "hutch", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "hutch", "{message}");
    }
}

/// Sink used when logging is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NoopSink;

impl LogSink for NoopSink {
    fn info(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

pub(crate) fn sink_or_noop(sink: Option<&SharedLogSink>) -> SharedLogSink {
    sink.map_or_else(|| Arc::new(NoopSink) as SharedLogSink, Arc::clone)
}
