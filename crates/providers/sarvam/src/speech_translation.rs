//! Speech-to-English translation. Shares the transcription trait and
//! response shape.

use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::ai_sdk_core::transport::{HttpTransport, MultipartForm};
use crate::ai_sdk_core::{
    ModelResponseMeta, SdkError, TranscriptionModel, TranscriptionOptions, TranscriptionResponse,
};

use crate::provider_sarvam::api_types::SarvamTranscriptionResponse;
use crate::provider_sarvam::config::SarvamConfig;
use crate::provider_sarvam::request::{decode_response, post_multipart, scoped_metadata};
use crate::provider_sarvam::transcription::{audio_bytes, audio_filename, segments_from_timestamps};

pub struct SarvamSpeechTranslationModel<
    T: HttpTransport = crate::reqwest_transport::ReqwestTransport,
> {
    model_id: String,
    config: Arc<SarvamConfig>,
    http: T,
}

impl<T: HttpTransport> SarvamSpeechTranslationModel<T> {
    pub fn new(model_id: impl Into<String>, config: Arc<SarvamConfig>, http: T) -> Self {
        Self {
            model_id: model_id.into(),
            config,
            http,
        }
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync> TranscriptionModel for SarvamSpeechTranslationModel<T> {
    fn provider_name(&self) -> &'static str {
        "sarvam.transcription"
    }
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(
        &self,
        options: TranscriptionOptions,
    ) -> Result<TranscriptionResponse, SdkError> {
        let mut form = MultipartForm::new();
        form.push_bytes(
            "file",
            audio_bytes(&options.audio)?,
            Some(audio_filename(&options.media_type)),
            Some(options.media_type.clone()),
        );
        form.push_text("model", self.model_id.clone());

        let url = self.config.endpoint("/speech-to-text-translate");
        let (raw, headers) =
            post_multipart(&self.http, &self.config, &url, &options.headers, &form).await?;
        let response: SarvamTranscriptionResponse =
            decode_response(&raw, "speech translation")?;

        let segments = response
            .timestamps
            .as_ref()
            .map(segments_from_timestamps)
            .unwrap_or_default();
        let provider_metadata = scoped_metadata(
            &self.config.provider_scope_name,
            [("request_id", response.request_id.map(JsonValue::String))],
        );

        Ok(TranscriptionResponse {
            text: response.transcript,
            duration_in_seconds: segments.last().map(|s| s.end_second),
            segments,
            language: response.language_code,
            warnings: Vec::new(),
            provider_metadata,
            response: ModelResponseMeta {
                timestamp: SystemTime::now(),
                model_id: self.model_id.clone(),
                headers: Some(headers),
            },
            response_body: Some(raw),
        })
    }
}
