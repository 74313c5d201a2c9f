use crate::error::HttpError;
use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;

/// Maximum body preview size kept in error values (8KB).
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Type alias for the boxed response body (after decompression).
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// Fully buffered HTTP response.
///
/// This is what [`crate::Transport`] implementations hand back; nothing about
/// the status is interpreted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    /// Buffer a streamed response, whatever its status.
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if the decompressed body exceeds
    /// `limit`, or `HttpError::Transport` if the connection fails mid-body.
    pub(crate) async fn read(
        response: Response<ResponseBody>,
        limit: usize,
    ) -> Result<Self, HttpError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = read_body_limited(response, limit).await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Response with a status and body and no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Response carrying a JSON body.
    #[must_use]
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        let mut response = Self::new(status, value.to_string());
        response.headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        response
    }

    /// Returns `true` when the body holds nothing but whitespace.
    #[must_use]
    pub fn is_body_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Body text cut to [`ERROR_BODY_PREVIEW_LIMIT`] bytes.
    #[must_use]
    pub fn body_preview(&self) -> String {
        let end = self.body.len().min(ERROR_BODY_PREVIEW_LIMIT);
        String::from_utf8_lossy(&self.body[..end]).into_owned()
    }
}

/// Read the (possibly decompressed) body, enforcing the byte limit on the
/// decompressed data.
pub(crate) async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpError> {
    let (_parts, body) = response.into_parts();

    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
