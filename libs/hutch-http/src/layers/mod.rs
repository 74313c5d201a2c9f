//! Tower layers for the HTTP client middleware stack
//!
//! - [`DefaultHeadersLayer`] - Adds User-Agent, Accept and Authorization headers

mod default_headers;

pub use default_headers::{DefaultHeadersLayer, DefaultHeadersService};
