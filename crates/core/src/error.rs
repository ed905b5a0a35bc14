use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("rate limited")]
    RateLimited {
        /// Milliseconds suggested by Retry-After if present
        retry_after_ms: Option<u64>,
        #[source]
        source: Option<Box<TransportError>>,
    },
    #[error("upstream error (status {status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        #[source]
        source: Option<Box<TransportError>>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("unsupported functionality: {functionality}")]
    UnsupportedFunctionality { functionality: String },
    #[error("invalid response data: {message}")]
    InvalidResponseData {
        message: String,
        /// Offending payload, when one is available
        data: Option<Value>,
    },
}

impl SdkError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SdkError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn unsupported(functionality: impl Into<String>) -> Self {
        SdkError::UnsupportedFunctionality {
            functionality: functionality.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>, data: Option<Value>) -> Self {
        SdkError::InvalidResponseData {
            message: message.into(),
            data,
        }
    }

    /// Format error details for better debugging visibility
    pub fn format_details(&self) -> String {
        match self {
            SdkError::RateLimited {
                retry_after_ms,
                source,
            } => {
                let mut msg = String::from("rate limited");

                if let Some(ms) = retry_after_ms {
                    msg.push_str(&format!(" (retry after {}ms)", ms));
                }

                // The upstream body is more useful than the generic label.
                if let Some(src) = source {
                    if let TransportError::HttpStatus { body, status, .. } = src.as_ref() {
                        msg = format!("http status {}: {}", status, body);
                    }
                }

                msg
            }
            SdkError::Upstream {
                status,
                message,
                source,
            } => {
                let mut msg = format!("http status {}: {}", status, message);

                if let Some(src) = source {
                    if let TransportError::HttpStatus { body, .. } = src.as_ref() {
                        if !message.contains(body) && !body.is_empty() {
                            msg.push_str(&format!(" [body: {}]", body));
                        }
                    }
                }

                msg
            }
            SdkError::Transport(te) => format!("transport error: {}", te),
            SdkError::Serde(se) => format!("serde error: {}", se),
            SdkError::InvalidArgument { message } => format!("invalid argument: {}", message),
            SdkError::UnsupportedFunctionality { functionality } => {
                format!("unsupported functionality: {}", functionality)
            }
            SdkError::InvalidResponseData { message, data } => match data {
                Some(d) => format!("invalid response data: {} [data: {}]", message, d),
                None => format!("invalid response data: {}", message),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http status {status}: {sanitized}")]
    HttpStatus {
        status: u16,
        /// upstream body (should be treated as sensitive; only log sanitized)
        body: String,
        /// Retry-After header (ms) if available
        retry_after_ms: Option<u64>,
        /// Sanitized message for display
        sanitized: String,
        /// Upstream response headers (lowercased keys where possible)
        headers: Vec<(String, String)>,
    },
    #[error("network: {0}")]
    Network(String),
    #[error("connect timeout after {0:?}")]
    ConnectTimeout(Duration),
    #[error("idle read timeout after {0:?}")]
    IdleReadTimeout(Duration),
    #[error("body read error: {0}")]
    BodyRead(String),
    #[error("stream closed")]
    StreamClosed,
    #[error("other: {0}")]
    Other(String),
}

pub fn http_status_fallback_message(status: u16) -> String {
    format!("http status {status}")
}

pub fn build_http_status_transport_error(
    status: u16,
    body: String,
    retry_after_ms: Option<u64>,
    headers: Vec<(String, String)>,
) -> TransportError {
    TransportError::HttpStatus {
        status,
        body,
        retry_after_ms,
        sanitized: http_status_fallback_message(status),
        headers,
    }
}

pub fn map_http_status_to_upstream_error(
    status: u16,
    body: String,
    retry_after_ms: Option<u64>,
    headers: Vec<(String, String)>,
    message: Option<String>,
) -> SdkError {
    let fallback = http_status_fallback_message(status);
    let source = build_http_status_transport_error(status, body, retry_after_ms, headers);
    SdkError::Upstream {
        status,
        message: message.unwrap_or(fallback),
        source: Some(Box::new(source)),
    }
}

pub fn map_http_status_to_rate_limited_error(
    status: u16,
    body: String,
    retry_after_ms: Option<u64>,
    headers: Vec<(String, String)>,
) -> SdkError {
    let source = build_http_status_transport_error(status, body, retry_after_ms, headers);
    SdkError::RateLimited {
        retry_after_ms,
        source: Some(Box::new(source)),
    }
}

/// Short rendering of an upstream body for log lines: minified JSON, or a
/// byte count for anything else.
pub fn display_body_for_error(body: &str) -> String {
    let trimmed = body.trim();
    let looks_like_json = trimmed.starts_with('{') || trimmed.starts_with('[');
    if looks_like_json {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(v) => v.to_string(),
            Err(_) => format!("{} bytes", body.len()),
        }
    } else {
        format!("{} bytes", body.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        display_body_for_error, map_http_status_to_rate_limited_error,
        map_http_status_to_upstream_error, SdkError, TransportError,
    };
    use serde_json::json;

    #[test]
    fn upstream_helper_prefers_parsed_message() {
        let mapped = map_http_status_to_upstream_error(
            400,
            "{\"error\":{\"message\":\"bad language\"}}".into(),
            None,
            vec![("x-request-id".into(), "r1".into())],
            Some("bad language".into()),
        );

        match mapped {
            SdkError::Upstream {
                status,
                message,
                source,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad language");
                match source.as_deref() {
                    Some(TransportError::HttpStatus { sanitized, headers, .. }) => {
                        assert_eq!(sanitized, "http status 400");
                        assert_eq!(headers.len(), 1);
                    }
                    other => panic!("unexpected source: {other:?}"),
                }
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn upstream_helper_falls_back_to_status_text() {
        let mapped =
            map_http_status_to_upstream_error(503, "unavailable".into(), None, Vec::new(), None);
        match mapped {
            SdkError::Upstream { message, .. } => assert_eq!(message, "http status 503"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn rate_limited_details_surface_upstream_body() {
        let mapped =
            map_http_status_to_rate_limited_error(429, "slow down".into(), Some(2500), Vec::new());
        match &mapped {
            SdkError::RateLimited { retry_after_ms, .. } => {
                assert_eq!(*retry_after_ms, Some(2500))
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
        assert_eq!(mapped.format_details(), "http status 429: slow down");
    }

    #[test]
    fn unsupported_and_invalid_response_render_their_payload() {
        let unsupported = SdkError::unsupported("streaming translation");
        assert_eq!(
            unsupported.format_details(),
            "unsupported functionality: streaming translation"
        );

        let invalid = SdkError::invalid_response("no choices", Some(json!({"choices": []})));
        assert_eq!(
            invalid.format_details(),
            "invalid response data: no choices [data: {\"choices\":[]}]"
        );
        assert_eq!(invalid.to_string(), "invalid response data: no choices");
    }

    #[test]
    fn body_display_minifies_json_and_counts_text() {
        assert_eq!(display_body_for_error(" { \"a\" : 1 } "), "{\"a\":1}");
        assert_eq!(display_body_for_error("oops"), "4 bytes");
        assert_eq!(display_body_for_error("{broken"), "7 bytes");
    }
}
