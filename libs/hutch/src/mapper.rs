//! Conversion from raw HTTP responses to typed results.

use hutch_http::RawResponse;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::{HutchError, Result};
use crate::model::{BrokerErrorBody, CommandResult};

/// Turns a buffered response into a model or a structured failure.
///
/// A success status with a blank body decodes to `T::default()` (or an
/// empty list). A non-success status always becomes
/// [`HutchError::Response`], whatever the body holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMapper;

impl ResponseMapper {
    /// # Errors
    /// [`HutchError::Cancelled`], [`HutchError::Response`] for a non-success
    /// status, [`HutchError::Decode`] for a body of the wrong shape.
    pub fn decode<T: DeserializeOwned + Default>(
        &self,
        raw: RawResponse,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let raw = checked(raw, cancel)?;
        if raw.is_body_blank() {
            return Ok(T::default());
        }
        from_body(&raw)
    }

    /// Decode a JSON array, keeping the broker's order.
    ///
    /// # Errors
    /// See [`ResponseMapper::decode`].
    pub fn decode_many<T: DeserializeOwned>(
        &self,
        raw: RawResponse,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>> {
        let raw = checked(raw, cancel)?;
        if raw.is_body_blank() {
            return Ok(Vec::new());
        }
        from_body(&raw)
    }

    /// Status of a command whose success body is not interpreted.
    ///
    /// # Errors
    /// [`HutchError::Cancelled`] or [`HutchError::Response`].
    pub fn command_result(
        &self,
        raw: RawResponse,
        cancel: &CancellationToken,
    ) -> Result<CommandResult> {
        let raw = checked(raw, cancel)?;
        Ok(CommandResult::from_status(raw.status))
    }
}

fn checked(raw: RawResponse, cancel: &CancellationToken) -> Result<RawResponse> {
    if cancel.is_cancelled() {
        return Err(HutchError::Cancelled);
    }
    if raw.status.is_success() {
        return Ok(raw);
    }

    let envelope: BrokerErrorBody = serde_json::from_slice(&raw.body).unwrap_or_default();
    Err(HutchError::Response {
        status: raw.status,
        body: raw.body_preview(),
        error: envelope.error,
        reason: envelope.reason,
    })
}

fn from_body<T: DeserializeOwned>(raw: &RawResponse) -> Result<T> {
    serde_json::from_slice(&raw.body).map_err(|source| HutchError::Decode {
        source,
        body: raw.body_preview(),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::model::{Connection, VirtualHost};
    use http::StatusCode;
    use serde_json::json;

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    #[test]
    fn decodes_single_model() {
        let raw = RawResponse::json(StatusCode::OK, &json!({"name": "staging", "tracing": true}));
        let vhost: VirtualHost = ResponseMapper.decode(raw, &token()).unwrap();
        assert_eq!(vhost.name, "staging");
        assert!(vhost.tracing);
    }

    #[test]
    fn decode_many_keeps_order() {
        let raw = RawResponse::json(
            StatusCode::OK,
            &json!([{"name": "conn-1"}, {"name": "conn-2"}]),
        );
        let conns: Vec<Connection> = ResponseMapper.decode_many(raw, &token()).unwrap();
        let names: Vec<_> = conns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["conn-1", "conn-2"]);
    }

    #[test]
    fn blank_success_body_yields_default() {
        let raw = RawResponse::new(StatusCode::NO_CONTENT, "  \n");
        let vhost: VirtualHost = ResponseMapper.decode(raw.clone(), &token()).unwrap();
        assert_eq!(vhost, VirtualHost::default());

        let list: Vec<VirtualHost> = ResponseMapper.decode_many(raw, &token()).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn non_success_carries_broker_envelope() {
        let raw = RawResponse::json(
            StatusCode::NOT_FOUND,
            &json!({"error": "Object Not Found", "reason": "Not Found"}),
        );
        match ResponseMapper.decode::<VirtualHost>(raw, &token()) {
            Err(HutchError::Response {
                status,
                body,
                error,
                reason,
            }) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(body.contains("Object Not Found"));
                assert_eq!(error.as_deref(), Some("Object Not Found"));
                assert_eq!(reason.as_deref(), Some("Not Found"));
            }
            other => panic!("expected Response, got {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body_is_kept_as_text() {
        let raw = RawResponse::new(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        match ResponseMapper.command_result(raw, &token()) {
            Err(HutchError::Response {
                status, body, error, ..
            }) => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "<html>bad gateway</html>");
                assert!(error.is_none());
            }
            other => panic!("expected Response, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let raw = RawResponse::new(StatusCode::OK, "{\"name\": ");
        let err = ResponseMapper.decode::<VirtualHost>(raw, &token()).unwrap_err();
        assert!(matches!(err, HutchError::Decode { .. }));

        let raw = RawResponse::json(StatusCode::OK, &json!({"name": "not-a-list"}));
        let err = ResponseMapper
            .decode_many::<VirtualHost>(raw, &token())
            .unwrap_err();
        assert!(matches!(err, HutchError::Decode { .. }));
    }

    #[test]
    fn command_result_reports_status() {
        let raw = RawResponse::new(StatusCode::NO_CONTENT, "");
        let result = ResponseMapper.command_result(raw, &token()).unwrap();
        assert_eq!(result.status, 204);
        assert_eq!(result.reason.as_deref(), Some("No Content"));
        assert!(result.is_success());
    }

    #[test]
    fn cancelled_token_wins() {
        let cancel = token();
        cancel.cancel();
        let raw = RawResponse::json(StatusCode::OK, &json!([]));
        let err = ResponseMapper
            .decode_many::<VirtualHost>(raw, &cancel)
            .unwrap_err();
        assert!(matches!(err, HutchError::Cancelled));
    }
}
