use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::ai_sdk_core::error::{
    map_http_status_to_rate_limited_error, map_http_status_to_upstream_error, SdkError,
    TransportError,
};

/// Error body returned by Sarvam endpoints, both as an HTTP error payload and
/// inline in the chat event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarvamErrorData {
    pub error: SarvamInnerError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarvamInnerError {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
}

impl SarvamErrorData {
    /// JSON rendering used for stream `Error` parts.
    pub fn to_part_value(&self) -> JsonValue {
        let mut out = serde_json::Map::new();
        out.insert("message".into(), JsonValue::String(self.error.message.clone()));
        if let Some(t) = &self.error.r#type {
            out.insert("type".into(), JsonValue::String(t.clone()));
        }
        JsonValue::Object(out)
    }
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<SarvamErrorData>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Map a transport failure to the SDK error surfaced to callers.
pub fn map_transport_error_to_sdk_error(te: TransportError) -> SdkError {
    match te {
        TransportError::HttpStatus {
            status,
            body,
            retry_after_ms,
            headers,
            ..
        } => {
            if status == 429 {
                return map_http_status_to_rate_limited_error(status, body, retry_after_ms, headers);
            }
            // 401 keeps the generic status message.
            let message = if status == 401 {
                None
            } else {
                parse_error_message(&body)
            };
            map_http_status_to_upstream_error(status, body, retry_after_ms, headers, message)
        }
        other => SdkError::Transport(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai_sdk_core::error::build_http_status_transport_error;

    #[test]
    fn parses_backend_message() {
        let te = build_http_status_transport_error(
            400,
            r#"{"error":{"message":"Invalid language","type":"invalid_request_error"}}"#.into(),
            None,
            Vec::new(),
        );
        match map_transport_error_to_sdk_error(te) {
            SdkError::Upstream { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid language");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn type_field_is_optional() {
        let te = build_http_status_transport_error(
            500,
            r#"{"error":{"message":"boom"}}"#.into(),
            None,
            Vec::new(),
        );
        match map_transport_error_to_sdk_error(te) {
            SdkError::Upstream { message, .. } => assert_eq!(message, "boom"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unparsable_body_falls_back_to_status() {
        let te = build_http_status_transport_error(502, "<html>".into(), None, Vec::new());
        match map_transport_error_to_sdk_error(te) {
            SdkError::Upstream { message, .. } => assert_eq!(message, "http status 502"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unauthorized_keeps_generic_message() {
        let te = build_http_status_transport_error(
            401,
            r#"{"error":{"message":"key sk-123 invalid"}}"#.into(),
            None,
            Vec::new(),
        );
        match map_transport_error_to_sdk_error(te) {
            SdkError::Upstream { status, message, source } => {
                assert_eq!(status, 401);
                assert_eq!(message, "http status 401");
                assert!(source.is_some());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        let te = build_http_status_transport_error(429, "{}".into(), Some(1500), Vec::new());
        match map_transport_error_to_sdk_error(te) {
            SdkError::RateLimited { retry_after_ms, .. } => assert_eq!(retry_after_ms, Some(1500)),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn network_errors_pass_through() {
        let err = map_transport_error_to_sdk_error(TransportError::Network("reset".into()));
        assert!(matches!(err, SdkError::Transport(TransportError::Network(_))));
    }

    #[test]
    fn part_value_includes_type_when_present() {
        let data = SarvamErrorData {
            error: SarvamInnerError {
                message: "overloaded".into(),
                r#type: Some("server_error".into()),
            },
        };
        assert_eq!(
            data.to_part_value(),
            serde_json::json!({"message": "overloaded", "type": "server_error"})
        );
    }
}
