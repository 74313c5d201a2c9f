use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request;
use crate::response::{RawResponse, ResponseBody};
use crate::transport::Transport;
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tower::Service;
use tower::buffer::Buffer;

/// Type alias for the future type of the inner service
pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Type alias for the buffered service
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// HTTP client over a buffered tower stack
///
/// `HttpClient` is `Clone + Send + Sync`; clones share one connection pool
/// and one buffer worker. Use [`HttpClientBuilder`] to configure it and
/// [`Transport::send`] to exchange a request for a buffered [`RawResponse`].
///
/// ```ignore
/// let client = HttpClient::builder()
///     .credentials(BasicCredentials::new("guest", "guest"))
///     .build()?;
///
/// let request = http::Request::get("http://localhost:15672/api/vhosts/%2f")
///     .body(Bytes::new())?;
/// let raw = client.send(request).await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) request_timeout: Duration,
    pub(crate) transport_security: TransportSecurity,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_body_size", &self.max_body_size)
            .field("request_timeout", &self.request_timeout)
            .field("transport_security", &self.transport_security)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    /// Create a builder for configuring the HTTP client
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }
}

#[async_trait]
impl Transport for HttpClient {
    /// Send one request and buffer its response.
    ///
    /// The configured timeout bounds the whole exchange, body included, so
    /// a peer that stalls mid-body fails with `HttpError::Timeout`.
    async fn send(&self, request: Request<Bytes>) -> Result<RawResponse, HttpError> {
        let (mut parts, body) = request.into_parts();
        parts.uri = request::validate_url(&parts.uri.to_string(), self.transport_security)?;
        let request = Request::from_parts(parts, Full::new(body));

        let mut service = self.service.clone();
        let max_body_size = self.max_body_size;
        let exchange = async move {
            let response = request::dispatch(&mut service, request).await?;
            RawResponse::read(response, max_body_size).await
        };

        tokio::time::timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| HttpError::Timeout(self.request_timeout))?
    }
}

/// Map buffer errors to `HttpError`
///
/// The buffer hands back the inner service error boxed, or its own error
/// once the worker has gone away.
pub fn map_buffer_error(err: tower::BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(err) => {
            tracing::error!(
                error = %err,
                "buffer worker closed unexpectedly; service unavailable"
            );
            HttpError::ServiceClosed
        }
    }
}

/// Reserve a buffer slot without waiting.
///
/// A full buffer yields `HttpError::Overloaded` right away.
pub async fn try_acquire_buffer_slot(service: &mut BufferedService) -> Result<(), HttpError> {
    use std::task::Poll;

    let poll_result = std::future::poll_fn(|cx| match service.poll_ready(cx) {
        Poll::Ready(result) => Poll::Ready(Some(result)),
        Poll::Pending => Poll::Ready(None),
    })
    .await;

    match poll_result {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(map_buffer_error(e)),
        None => Err(HttpError::Overloaded),
    }
}
