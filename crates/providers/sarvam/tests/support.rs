//! In-memory transport and fixtures shared by the Sarvam tests.

use crate::ai_sdk_core::error::TransportError;
use crate::ai_sdk_core::json::without_null_fields;
use crate::ai_sdk_core::transport::{HttpTransport, MultipartForm, TransportConfig};
use crate::ai_sdk_core::PartStream;
use crate::ai_sdk_types::v2 as v2t;
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::{stream, TryStreamExt};
use serde_json::Value;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use crate::provider_sarvam::config::SarvamConfig;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub form: Option<MultipartForm>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
enum ScriptedChunk {
    Data(Bytes),
    Fail(String),
}

#[derive(Clone, Default)]
pub(crate) struct TestTransport {
    chunks: Arc<Mutex<Vec<ScriptedChunk>>>,
    json_response: Arc<Mutex<Value>>,
    download: Arc<Mutex<Option<(Bytes, Vec<(String, String)>)>>>,
    response_headers: Arc<Mutex<Vec<(String, String)>>>,
    next_error: Arc<Mutex<Option<TransportError>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunks(self, chunks: Vec<Bytes>) -> Self {
        self.chunks
            .lock()
            .unwrap()
            .extend(chunks.into_iter().map(ScriptedChunk::Data));
        self
    }

    /// Fail the byte stream after the chunks queued so far.
    pub fn with_stream_failure(self, message: &str) -> Self {
        self.chunks
            .lock()
            .unwrap()
            .push(ScriptedChunk::Fail(message.to_string()));
        self
    }

    pub fn with_json(self, value: Value) -> Self {
        *self.json_response.lock().unwrap() = value;
        self
    }

    pub fn with_download(self, bytes: &[u8], content_type: &str) -> Self {
        *self.download.lock().unwrap() = Some((
            Bytes::copy_from_slice(bytes),
            vec![("content-type".into(), content_type.into())],
        ));
        self
    }

    pub fn with_response_headers(self, headers: Vec<(String, String)>) -> Self {
        *self.response_headers.lock().unwrap() = headers;
        self
    }

    /// Fail the next request of any kind.
    pub fn with_error(self, error: TransportError) -> Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }

    pub fn last_body(&self) -> Value {
        self.last_request().body.expect("last request had no json body")
    }

    fn record(
        &self,
        method: &'static str,
        url: &str,
        headers: &[(String, String)],
        body: Option<Value>,
        form: Option<MultipartForm>,
    ) -> Result<(), TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers.to_vec(),
            body,
            form,
        });
        match self.next_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn cleaned(body: &Value, cfg: &TransportConfig) -> Value {
        if cfg.strip_null_fields {
            without_null_fields(body)
        } else {
            body.clone()
        }
    }
}

pub(crate) struct TestStreamResponse {
    headers: Vec<(String, String)>,
    chunks: Vec<ScriptedChunk>,
}

#[async_trait]
impl HttpTransport for TestTransport {
    type StreamResponse = TestStreamResponse;

    fn into_stream(
        resp: Self::StreamResponse,
    ) -> (
        Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>,
        Vec<(String, String)>,
    ) {
        let items = resp.chunks.into_iter().map(|c| match c {
            ScriptedChunk::Data(b) => Ok(b),
            ScriptedChunk::Fail(msg) => Err(TransportError::Network(msg)),
        });
        (Box::pin(stream::iter(items)), resp.headers)
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError> {
        self.record("POST", url, headers, Some(Self::cleaned(body, cfg)), None)?;
        Ok(TestStreamResponse {
            headers: self.response_headers.lock().unwrap().clone(),
            chunks: self.chunks.lock().unwrap().clone(),
        })
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        self.record("POST", url, headers, Some(Self::cleaned(body, cfg)), None)?;
        Ok((
            self.json_response.lock().unwrap().clone(),
            self.response_headers.lock().unwrap().clone(),
        ))
    }

    async fn post_multipart(
        &self,
        url: &str,
        headers: &[(String, String)],
        form: &MultipartForm,
        _cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        self.record("POST", url, headers, None, Some(form.clone()))?;
        Ok((
            self.json_response.lock().unwrap().clone(),
            self.response_headers.lock().unwrap().clone(),
        ))
    }

    async fn get_bytes(
        &self,
        url: &str,
        headers: &[(String, String)],
        _cfg: &TransportConfig,
    ) -> Result<(Bytes, Vec<(String, String)>), TransportError> {
        self.record("GET", url, headers, None, None)?;
        self.download
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::Other("no download scripted".into()))
    }
}

pub(crate) fn json_chunk(value: Value) -> Bytes {
    Bytes::from(format!("data: {}\n\n", value))
}

pub(crate) fn done_chunk() -> Bytes {
    Bytes::from_static(b"data: [DONE]\n\n")
}

pub(crate) fn test_config() -> Arc<SarvamConfig> {
    Arc::new(SarvamConfig {
        base_url: "https://sarvam.test".into(),
        api_key: Some("test-key".into()),
        ..Default::default()
    })
}

pub(crate) async fn collect_parts(stream: PartStream) -> Vec<v2t::StreamPart> {
    stream
        .try_collect()
        .await
        .expect("stream should not fail")
}
