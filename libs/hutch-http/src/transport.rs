//! The seam between the broker client and the HTTP stack.

use crate::error::HttpError;
use crate::response::RawResponse;
use async_trait::async_trait;
use bytes::Bytes;

/// Sends one fully built request and buffers the whole response.
///
/// Any HTTP status is a successful send; only transport-level failures are
/// `Err`. [`HttpClient`](crate::HttpClient) is the production
/// implementation. The request URI is absolute and must not be normalized.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: http::Request<Bytes>) -> Result<RawResponse, HttpError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: http::Request<Bytes>) -> Result<RawResponse, HttpError> {
        (**self).send(request).await
    }
}
