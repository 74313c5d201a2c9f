//! Request admission: URL checks and the hand-off to the buffered stack.

use crate::client::{BufferedService, map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::ResponseBody;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use tower::Service;

/// Parse a URL with `http::Uri` and check it against the security mode.
///
/// `http::Uri` keeps the path bytes as given, so encoded slashes survive.
pub(crate) fn validate_url(
    url: &str,
    transport_security: TransportSecurity,
) -> Result<http::Uri, HttpError> {
    let uri: http::Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::ParseError,
            reason: e.to_string(),
        })?;

    if uri.authority().is_none() {
        return Err(HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::MissingAuthority,
            reason: "missing host/authority".to_owned(),
        });
    }

    match uri.scheme_str() {
        Some("https") => Ok(uri),
        Some("http") => match transport_security {
            TransportSecurity::AllowInsecureHttp => Ok(uri),
            TransportSecurity::TlsOnly => Err(HttpError::InvalidScheme {
                scheme: "http".to_owned(),
                reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
            }),
        },
        Some(scheme) => Err(HttpError::InvalidScheme {
            scheme: scheme.to_owned(),
            reason: "only http:// and https:// schemes are supported".to_owned(),
        }),
        None => Err(HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::MissingScheme,
            reason: "missing scheme".to_owned(),
        }),
    }
}

/// Push a finished request through the buffered service.
///
/// Resolves once the response head arrives; the body is still streaming.
pub(crate) async fn dispatch(
    service: &mut BufferedService,
    request: Request<Full<Bytes>>,
) -> Result<Response<ResponseBody>, HttpError> {
    try_acquire_buffer_slot(service).await?;
    service.call(request).await.map_err(map_buffer_error)
}
