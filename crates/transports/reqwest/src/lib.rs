use crate::ai_sdk_core::error::{display_body_for_error, TransportError};
use crate::ai_sdk_core::transport::{
    emit_transport_event, HttpTransport, MultipartForm, MultipartValue, TransportBody,
    TransportConfig, TransportEvent,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::error::Error as StdError;
use std::pin::Pin;
use std::time::{Duration, Instant, SystemTime};
use tracing::debug;

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// [`HttpTransport`] backed by a pooled `reqwest::Client`. Cloning shares the pool.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    fn configure_builder(
        mut builder: reqwest::ClientBuilder,
        cfg: &TransportConfig,
    ) -> reqwest::ClientBuilder {
        builder = builder
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .pool_idle_timeout(Duration::from_secs(90));
        if let Some(req_timeout) = cfg.request_timeout {
            builder = builder.timeout(req_timeout);
        }
        builder.connect_timeout(cfg.connect_timeout)
    }

    fn try_new_with_builder(
        cfg: &TransportConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, TransportError> {
        let client = Self::configure_builder(builder, cfg)
            .build()
            .map_err(|err| {
                TransportError::Other(format!(
                    "reqwest client build failed: {}",
                    format_reqwest_error_chain(&err)
                ))
            })?;
        Ok(Self { client })
    }

    pub fn try_new(cfg: &TransportConfig) -> Result<Self, TransportError> {
        Self::try_new_with_builder(cfg, Client::builder())
    }

    /// Infallible constructor; falls back to a default client if the
    /// configured one cannot be built.
    pub fn new(cfg: &TransportConfig) -> Self {
        match Self::try_new(cfg) {
            Ok(transport) => transport,
            Err(err) => {
                debug!(
                    target: "ai_sdk::transport::reqwest",
                    error = %err,
                    "falling back to reqwest::Client::new after transport init failure"
                );
                Self {
                    client: Client::new(),
                }
            }
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

/// Request facts captured before sending, reused for every observer event
/// emitted about that request.
struct RequestProbe {
    started_at: SystemTime,
    start: Instant,
    method: String,
    url: String,
    request_headers: Vec<(String, String)>,
    request_body: Option<TransportBody>,
    is_stream: bool,
}

impl RequestProbe {
    fn capture(
        req: &RequestBuilder,
        fallback_method: &str,
        url: &str,
        headers: &[(String, String)],
        request_body: Option<TransportBody>,
        is_stream: bool,
    ) -> Self {
        let snapshot = req.try_clone().and_then(|r| r.build().ok());
        let (method, url, request_headers) = match snapshot.as_ref() {
            Some(built) => (
                built.method().to_string(),
                built.url().to_string(),
                header_pairs(built.headers()),
            ),
            None => (fallback_method.to_string(), url.to_string(), headers.to_vec()),
        };
        Self {
            started_at: SystemTime::now(),
            start: Instant::now(),
            method,
            url,
            request_headers,
            request_body,
            is_stream,
        }
    }

    fn emit(
        &self,
        status: Option<u16>,
        response_headers: Vec<(String, String)>,
        response_body: Option<TransportBody>,
        response_size: Option<usize>,
        error: Option<String>,
    ) {
        emit_transport_event(TransportEvent {
            started_at: self.started_at,
            latency: Some(self.start.elapsed()),
            method: self.method.clone(),
            url: self.url.clone(),
            status,
            request_headers: self.request_headers.clone(),
            response_headers,
            request_body: self.request_body.clone(),
            response_body,
            response_size,
            error,
            is_stream: self.is_stream,
        });
    }
}

fn cleaned_body(body: &Value, cfg: &TransportConfig) -> Value {
    if cfg.strip_null_fields {
        crate::ai_sdk_core::json::without_null_fields(body)
    } else {
        body.clone()
    }
}

fn with_headers(mut req: RequestBuilder, headers: &[(String, String)], skip_content_type: bool) -> RequestBuilder {
    for (k, v) in headers {
        // The body encoder owns content-type for JSON and multipart requests.
        if skip_content_type && k.eq_ignore_ascii_case("content-type") {
            continue;
        }
        req = req.header(k, v);
    }
    req
}

/// Send the request and turn non-2xx statuses into [`TransportError::HttpStatus`].
async fn send_checked(
    req: RequestBuilder,
    probe: &RequestProbe,
    cfg: &TransportConfig,
) -> Result<(Response, Vec<(String, String)>), TransportError> {
    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            let detail = format_reqwest_error_chain(&e);
            debug!(target: "ai_sdk::transport::reqwest", %detail, url = %probe.url, "reqwest send failed");
            probe.emit(None, Vec::new(), None, None, Some(detail.clone()));
            return Err(if e.is_connect() {
                TransportError::Network(format!("connect: {detail}"))
            } else if e.is_timeout() {
                TransportError::ConnectTimeout(cfg.connect_timeout)
            } else {
                TransportError::Network(detail)
            });
        }
    };

    let status = resp.status();
    let res_headers = header_pairs(resp.headers());
    if status.is_success() {
        return Ok((resp, res_headers));
    }

    let retry_after_ms = resp
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_retry_after_ms);
    let body_text = resp.text().await.unwrap_or_default();
    let sanitized = display_body_for_error(&body_text);
    debug!(
        target: "ai_sdk::transport::reqwest",
        status = status.as_u16(),
        body = %sanitized,
        url = %probe.url,
        "upstream returned error status"
    );
    probe.emit(
        Some(status.as_u16()),
        res_headers.clone(),
        Some(TransportBody::Text(body_text.clone())),
        Some(body_text.len()),
        Some(format!("HTTP {}: {}", status.as_u16(), sanitized)),
    );
    Err(TransportError::HttpStatus {
        status: status.as_u16(),
        body: body_text,
        retry_after_ms,
        sanitized,
        headers: res_headers,
    })
}

async fn read_json(
    resp: Response,
    res_headers: Vec<(String, String)>,
    probe: &RequestProbe,
) -> Result<(Value, Vec<(String, String)>), TransportError> {
    let status = resp.status().as_u16();
    let text = resp
        .text()
        .await
        .map_err(|e| TransportError::BodyRead(e.to_string()))?;
    let json: Value = serde_json::from_str(&text)
        .map_err(|_| TransportError::BodyRead("invalid json".into()))?;
    probe.emit(
        Some(status),
        res_headers.clone(),
        Some(TransportBody::Json(json.clone())),
        Some(text.len()),
        None,
    );
    Ok((json, res_headers))
}

fn build_form(form: &MultipartForm) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for field in &form.fields {
        match &field.value {
            MultipartValue::Text(text) => {
                out = out.text(field.name.clone(), text.clone());
            }
            MultipartValue::Bytes {
                data,
                filename,
                content_type,
            } => {
                let mut part = Part::bytes(data.clone());
                if let Some(name) = filename {
                    part = part.file_name(name.clone());
                }
                if let Some(ct) = content_type {
                    part = part
                        .mime_str(ct)
                        .map_err(|e| TransportError::Other(e.to_string()))?;
                }
                out = out.part(field.name.clone(), part);
            }
        }
    }
    Ok(out)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    type StreamResponse = (ByteStream, Vec<(String, String)>);

    fn into_stream(resp: Self::StreamResponse) -> (ByteStream, Vec<(String, String)>) {
        resp
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError> {
        let body = cleaned_body(body, cfg);
        let req = with_headers(self.client.post(url).json(&body), headers, true);
        let probe = RequestProbe::capture(
            &req,
            "POST",
            url,
            headers,
            Some(TransportBody::Json(body)),
            true,
        );
        let (resp, res_headers) = send_checked(req, &probe, cfg).await?;
        probe.emit(
            Some(resp.status().as_u16()),
            res_headers.clone(),
            None,
            None,
            None,
        );

        let idle = cfg.idle_read_timeout;
        let mut inner = resp.bytes_stream();
        let s = async_stream::try_stream! {
            loop {
                match tokio::time::timeout(idle, inner.next()).await {
                    Err(_) => Err(TransportError::IdleReadTimeout(idle))?,
                    Ok(None) => break,
                    Ok(Some(Err(e))) => {
                        if e.is_timeout() {
                            Err(TransportError::IdleReadTimeout(idle))?;
                        } else {
                            Err(TransportError::BodyRead(e.to_string()))?;
                        }
                    }
                    Ok(Some(Ok(bytes))) => yield bytes,
                }
            }
        };
        Ok((Box::pin(s), res_headers))
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        let body = cleaned_body(body, cfg);
        let req = with_headers(self.client.post(url).json(&body), headers, true);
        let probe = RequestProbe::capture(
            &req,
            "POST",
            url,
            headers,
            Some(TransportBody::Json(body)),
            false,
        );
        let (resp, res_headers) = send_checked(req, &probe, cfg).await?;
        read_json(resp, res_headers, &probe).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        headers: &[(String, String)],
        form: &MultipartForm,
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        let req = with_headers(self.client.post(url).multipart(build_form(form)?), headers, true);
        let probe = RequestProbe::capture(
            &req,
            "POST",
            url,
            headers,
            Some(TransportBody::Form(form.describe())),
            false,
        );
        let (resp, res_headers) = send_checked(req, &probe, cfg).await?;
        read_json(resp, res_headers, &probe).await
    }

    async fn get_bytes(
        &self,
        url: &str,
        headers: &[(String, String)],
        cfg: &TransportConfig,
    ) -> Result<(Bytes, Vec<(String, String)>), TransportError> {
        let req = with_headers(self.client.get(url), headers, false);
        let probe = RequestProbe::capture(&req, "GET", url, headers, None, false);
        let (resp, res_headers) = send_checked(req, &probe, cfg).await?;
        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TransportError::BodyRead(e.to_string()))?;
        probe.emit(
            Some(status),
            res_headers.clone(),
            None,
            Some(bytes.len()),
            None,
        );
        Ok((bytes, res_headers))
    }
}

fn header_pairs(headers: &http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}

fn parse_retry_after_ms(s: &str) -> Option<u64> {
    // Only the delta-seconds form is understood; HTTP dates are ignored.
    s.trim().parse::<u64>().ok().map(|secs| secs.saturating_mul(1000))
}

fn format_reqwest_error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(src) = current {
        out.push_str(": ");
        out.push_str(&src.to_string());
        current = src.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_returns_transport_error_when_client_build_fails() {
        let cfg = TransportConfig::default();
        let err = match ReqwestTransport::try_new_with_builder(
            &cfg,
            Client::builder().user_agent("bad\nagent"),
        ) {
            Ok(_) => panic!("invalid user-agent should fail reqwest client build"),
            Err(err) => err,
        };
        match err {
            TransportError::Other(message) => {
                assert!(
                    message.contains("reqwest client build failed"),
                    "unexpected message: {message}"
                );
            }
            other => panic!("unexpected transport error variant: {other:?}"),
        }
    }

    #[test]
    fn retry_after_accepts_delta_seconds_only() {
        assert_eq!(parse_retry_after_ms(" 3 "), Some(3000));
        assert_eq!(parse_retry_after_ms("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn header_pairs_skip_non_ascii_values() {
        let mut map = http::HeaderMap::new();
        map.insert("x-request-id", http::HeaderValue::from_static("abc"));
        map.insert(
            "x-binary",
            http::HeaderValue::from_bytes(&[0xfa, 0xfb]).unwrap(),
        );
        let pairs = header_pairs(&map);
        assert_eq!(pairs, vec![("x-request-id".to_string(), "abc".to_string())]);
    }

    #[test]
    fn multipart_form_builds_with_audio_part() {
        let mut form = MultipartForm::new();
        form.push_bytes(
            "file",
            vec![1, 2, 3],
            Some("audio.wav".into()),
            Some("audio/wav".into()),
        );
        form.push_text("model", "saarika:v2");
        assert!(build_form(&form).is_ok());

        let mut bad = MultipartForm::new();
        bad.push_bytes("file", vec![0], None, Some("not a mime".into()));
        assert!(matches!(build_form(&bad), Err(TransportError::Other(_))));
    }
}
