use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, header};
use hutch_http::{JSON_MEDIA_TYPE, RawResponse, Transport};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{HutchError, Result};
use crate::logging::SharedLogSink;

/// Shared HTTP execution layer under every resource client.
///
/// Holds one long-lived [`Transport`] for the lifetime of the composed
/// client. Relative paths are appended to the host URL verbatim, so
/// percent-escapes such as the default vhost's `%2f` are never decoded.
/// Clones share the same transport.
#[derive(Clone)]
pub struct TransportCore {
    transport: Arc<dyn Transport>,
    base_url: Arc<str>,
    log: SharedLogSink,
}

impl TransportCore {
    /// Wrap `transport` for requests relative to `base_url`.
    ///
    /// A trailing `/` on `base_url` is dropped; nothing is sent until the
    /// first operation.
    pub fn new(transport: Arc<dyn Transport>, base_url: &str, log: SharedLogSink) -> Self {
        Self {
            transport,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            log,
        }
    }

    /// # Errors
    /// [`HutchError::Cancelled`] when `cancel` fires first,
    /// [`HutchError::Transport`] on connection, timeout or TLS failure.
    pub async fn get(&self, relative: &str, cancel: &CancellationToken) -> Result<RawResponse> {
        self.execute(Method::GET, relative, None, cancel).await
    }

    /// # Errors
    /// See [`TransportCore::get`].
    pub async fn delete(&self, relative: &str, cancel: &CancellationToken) -> Result<RawResponse> {
        self.execute(Method::DELETE, relative, None, cancel).await
    }

    /// Send `body` as JSON with PUT.
    ///
    /// # Errors
    /// [`HutchError::Encode`] if `body` cannot be serialized,
    /// otherwise see [`TransportCore::get`].
    pub async fn put<B: Serialize + ?Sized + Sync>(
        &self,
        relative: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let body = encode_body(body, "TransportCore::put")?;
        self.execute(Method::PUT, relative, Some(body), cancel).await
    }

    /// Send `body` as JSON with POST.
    ///
    /// # Errors
    /// [`HutchError::Encode`] if `body` cannot be serialized,
    /// otherwise see [`TransportCore::get`].
    pub async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        relative: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let body = encode_body(body, "TransportCore::post")?;
        self.execute(Method::POST, relative, Some(body), cancel).await
    }

    pub(crate) fn log(&self) -> &SharedLogSink {
        &self.log
    }

    /// Absolute URL for a relative path.
    ///
    /// `%2F` in the path is canonicalized to `%2f`; a query string after
    /// `?` is appended untouched.
    #[must_use]
    pub fn absolute_url(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches('/');
        let (path, query) = match relative.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (relative, None),
        };
        let mut url = format!("{}/{}", self.base_url, path.replace("%2F", "%2f"));
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    async fn execute(
        &self,
        method: Method,
        relative: &str,
        body: Option<Bytes>,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let url = self.absolute_url(relative);
        if cancel.is_cancelled() {
            self.log.info(&format!("{method} {url}: cancelled before sending"));
            return Err(HutchError::Cancelled);
        }

        let mut builder = Request::builder().method(method.clone()).uri(url.as_str());
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, JSON_MEDIA_TYPE);
        }
        let request = builder.body(body.unwrap_or_default()).map_err(|e| {
            self.log
                .error(&format!("{method} {url}: could not build request: {e}"));
            HutchError::Transport(e.into())
        })?;

        tracing::debug!(%method, %url, "sending management API request");

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                self.log.info(&format!("{method} {url}: cancelled"));
                return Err(HutchError::Cancelled);
            }
            result = self.transport.send(request) => result,
        };

        result.map_err(|e| {
            self.log.error(&format!("{method} {url} failed: {e}"));
            HutchError::Transport(e)
        })
    }
}

impl std::fmt::Debug for TransportCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportCore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B, operation: &'static str) -> Result<Bytes> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|source| HutchError::Encode { operation, source })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::logging::LogSink;
    use async_trait::async_trait;
    use hutch_http::HttpError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<(Method, String, Option<String>, Bytes)>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, request: Request<Bytes>) -> Result<RawResponse, HttpError> {
            let content_type = request
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            self.requests.lock().unwrap().push((
                request.method().clone(),
                request.uri().to_string(),
                content_type,
                request.body().clone(),
            ));
            Ok(RawResponse::new(http::StatusCode::NO_CONTENT, ""))
        }
    }

    struct Refused;

    #[async_trait]
    impl Transport for Refused {
        async fn send(&self, _request: Request<Bytes>) -> Result<RawResponse, HttpError> {
            Err(HttpError::Transport("connection refused".into()))
        }
    }

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl LogSink for Lines {
        fn info(&self, message: &str) {
            self.0.lock().unwrap().push(format!("info: {message}"));
        }
        fn error(&self, message: &str) {
            self.0.lock().unwrap().push(format!("error: {message}"));
        }
    }

    fn core(transport: Arc<dyn Transport>, log: SharedLogSink) -> TransportCore {
        TransportCore::new(transport, "http://localhost:15672/", log)
    }

    fn quiet() -> SharedLogSink {
        crate::logging::sink_or_noop(None)
    }

    #[test]
    fn absolute_url_keeps_escapes() {
        let core = core(Arc::new(Recorder::default()), quiet());
        assert_eq!(
            core.absolute_url("api/vhosts/%2f"),
            "http://localhost:15672/api/vhosts/%2f"
        );
        assert_eq!(
            core.absolute_url("/api/parameters/shovel/%2F/a%2Fb"),
            "http://localhost:15672/api/parameters/shovel/%2f/a%2fb"
        );
    }

    #[test]
    fn absolute_url_leaves_query_alone() {
        let core = core(Arc::new(Recorder::default()), quiet());
        assert_eq!(
            core.absolute_url("api/vhosts/%2F?name=a%2Fb"),
            "http://localhost:15672/api/vhosts/%2f?name=a%2Fb"
        );
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("unsupported value"))
        }
    }

    #[tokio::test]
    async fn unserializable_body_keeps_cause_and_sends_nothing() {
        use std::error::Error as _;

        let recorder = Arc::new(Recorder::default());
        let core = core(recorder.clone(), quiet());

        let err = core
            .put("api/vhosts/staging", &Unserializable, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
        assert!(matches!(err, HutchError::Encode { operation: "TransportCore::put", .. }));
        let source = err.source().expect("serialization cause is kept");
        assert!(source.to_string().contains("unsupported value"));
        assert!(recorder.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_sends_json_body() {
        let recorder = Arc::new(Recorder::default());
        let core = core(recorder.clone(), quiet());

        core.put(
            "api/vhosts/staging",
            &serde_json::json!({}),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let requests = recorder.requests.lock().unwrap();
        let (method, uri, content_type, body) = &requests[0];
        assert_eq!(method, Method::PUT);
        assert_eq!(uri, "http://localhost:15672/api/vhosts/staging");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(&body[..], b"{}");
    }

    #[tokio::test]
    async fn get_sends_no_body_and_keeps_default_vhost() {
        let recorder = Arc::new(Recorder::default());
        let core = core(recorder.clone(), quiet());

        core.get("api/parameters/shovel/%2f", &CancellationToken::new())
            .await
            .unwrap();

        let requests = recorder.requests.lock().unwrap();
        let (method, uri, content_type, body) = &requests[0];
        assert_eq!(method, Method::GET);
        assert_eq!(uri, "http://localhost:15672/api/parameters/shovel/%2f");
        assert!(content_type.is_none());
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let recorder = Arc::new(Recorder::default());
        let core = core(recorder.clone(), quiet());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = core.delete("api/users/ghost", &cancel).await.unwrap_err();
        assert!(matches!(err, HutchError::Cancelled));
        assert!(recorder.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_logged_once() {
        let lines = Arc::new(Lines::default());
        let core = core(Arc::new(Refused), lines.clone());

        let err = core
            .get("api/connections", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, HutchError::Transport(HttpError::Transport(_))));
        let lines = lines.0.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("error: GET http://localhost:15672/api/connections"));
    }
}
