use crate::config::HttpClientConfig;
use crate::error::HttpError;
use http::header::{ACCEPT, AUTHORIZATION, HeaderName, USER_AGENT};
use http::{HeaderValue, Request, Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that adds a fixed set of headers to every request.
///
/// A header already present on the request is left untouched, so callers can
/// override any default per request.
#[derive(Clone, Debug, Default)]
pub struct DefaultHeadersLayer {
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl DefaultHeadersLayer {
    /// Create an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the layer for User-Agent, Accept and basic credentials.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if a configured value is not a
    /// valid header value
    pub fn from_config(config: &HttpClientConfig) -> Result<Self, HttpError> {
        let mut headers = vec![(USER_AGENT, HeaderValue::from_str(&config.user_agent)?)];
        if let Some(accept) = &config.accept {
            headers.push((ACCEPT, HeaderValue::from_str(accept)?));
        }
        if let Some(credentials) = &config.credentials {
            headers.push((AUTHORIZATION, credentials.header_value()?));
        }
        Ok(Self {
            headers: Arc::new(headers),
        })
    }

    /// Add one more default header.
    #[must_use]
    pub fn with(mut self, name: HeaderName, value: HeaderValue) -> Self {
        Arc::make_mut(&mut self.headers).push((name, value));
        self
    }
}

impl<S> Layer<S> for DefaultHeadersLayer {
    type Service = DefaultHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultHeadersService {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Service that adds default headers to requests
#[derive(Clone, Debug)]
pub struct DefaultHeadersService<S> {
    inner: S,
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DefaultHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        for (name, value) in self.headers.iter() {
            if !req.headers().contains_key(name) {
                req.headers_mut().insert(name.clone(), value.clone());
            }
        }
        self.inner.call(req)
    }
}
