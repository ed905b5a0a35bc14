use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::ai_sdk_core::transport::{HttpTransport, MultipartForm};
use crate::ai_sdk_core::{
    AudioData, ModelResponseMeta, SdkError, TranscriptionModel, TranscriptionOptions,
    TranscriptionResponse, TranscriptionSegment,
};

use crate::provider_sarvam::api_types::{SarvamTimestamps, SarvamTranscriptionResponse};
use crate::provider_sarvam::config::{SarvamConfig, SarvamLanguageCode};
use crate::provider_sarvam::request::{
    decode_response, post_multipart, scoped_metadata, scoped_options,
};

pub const SAARIKA_V1: &str = "saarika:v1";

/// Transcription knobs. Set on the model they override the same keys given
/// per call under `providerOptions.sarvam`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SarvamTranscriptionSettings {
    #[serde(default)]
    pub with_timestamps: Option<bool>,
    #[serde(default)]
    pub with_diarization: Option<bool>,
    #[serde(default)]
    pub num_speakers: Option<u32>,
}

impl SarvamTranscriptionSettings {
    fn overlay(self, model: &SarvamTranscriptionSettings) -> Self {
        Self {
            with_timestamps: model.with_timestamps.or(self.with_timestamps),
            with_diarization: model.with_diarization.or(self.with_diarization),
            num_speakers: model.num_speakers.or(self.num_speakers),
        }
    }
}

/// Decode call audio into raw bytes for upload.
pub(crate) fn audio_bytes(audio: &AudioData) -> Result<Vec<u8>, SdkError> {
    match audio {
        AudioData::Bytes { bytes } => Ok(bytes.clone()),
        AudioData::Base64(b64) => B64
            .decode(b64.trim())
            .map_err(|e| SdkError::invalid_argument(format!("audio is not valid base64: {e}"))),
    }
}

/// Upload file name derived from the media type, e.g. `audio.wav`.
pub(crate) fn audio_filename(media_type: &str) -> String {
    let ext = media_type
        .split(';')
        .next()
        .and_then(|t| t.split('/').nth(1))
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or("bin");
    let ext = ext.strip_prefix("x-").unwrap_or(ext);
    let ext = if ext == "mpeg" { "mp3" } else { ext };
    format!("audio.{ext}")
}

pub(crate) fn segments_from_timestamps(ts: &SarvamTimestamps) -> Vec<TranscriptionSegment> {
    ts.words
        .iter()
        .zip(ts.start_time_seconds.iter())
        .zip(ts.end_time_seconds.iter())
        .map(|((text, start), end)| TranscriptionSegment {
            text: text.clone(),
            start_second: *start,
            end_second: *end,
        })
        .collect()
}

pub struct SarvamTranscriptionModel<T: HttpTransport = crate::reqwest_transport::ReqwestTransport>
{
    model_id: String,
    /// `None` asks the backend to detect the spoken language.
    language: Option<SarvamLanguageCode>,
    settings: SarvamTranscriptionSettings,
    config: Arc<SarvamConfig>,
    http: T,
}

impl<T: HttpTransport> SarvamTranscriptionModel<T> {
    pub fn new(
        model_id: impl Into<String>,
        language: Option<SarvamLanguageCode>,
        settings: SarvamTranscriptionSettings,
        config: Arc<SarvamConfig>,
        http: T,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            language,
            settings,
            config,
            http,
        }
    }

    fn build_form(&self, options: &TranscriptionOptions) -> Result<MultipartForm, SdkError> {
        if self.model_id == SAARIKA_V1 && self.language.is_none() {
            return Err(SdkError::invalid_argument(
                "Language code unknown is not supported for model saarika:v1",
            ));
        }
        let call: SarvamTranscriptionSettings =
            scoped_options(&options.provider_options, &self.config.provider_scope_name)?;
        let settings = call.overlay(&self.settings);

        let mut form = MultipartForm::new();
        form.push_bytes(
            "file",
            audio_bytes(&options.audio)?,
            Some(audio_filename(&options.media_type)),
            Some(options.media_type.clone()),
        );
        form.push_text("model", self.model_id.clone());
        form.push_text(
            "language_code",
            self.language.map(|l| l.as_str()).unwrap_or("unknown"),
        );
        form.push_text(
            "with_timestamps",
            settings.with_timestamps.unwrap_or(false).to_string(),
        );
        form.push_text(
            "with_diarization",
            settings.with_diarization.unwrap_or(false).to_string(),
        );
        if let Some(n) = settings.num_speakers {
            form.push_text("num_speakers", n.to_string());
        }
        Ok(form)
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync> TranscriptionModel for SarvamTranscriptionModel<T> {
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
        let options = crate::ai_sdk_core::request_builder::defaults::build_transcription_options(
            options,
            &self.config.provider_scope_name,
            self.config.default_options.as_ref(),
        );
        let form = self.build_form(&options)?;
        let url = self.config.endpoint("/speech-to-text");
        let (raw, headers) =
            post_multipart(&self.http, &self.config, &url, &options.headers, &form).await?;
        let response: SarvamTranscriptionResponse = decode_response(&raw, "transcription")?;

        let segments = response
            .timestamps
            .as_ref()
            .map(segments_from_timestamps)
            .unwrap_or_default();
        let duration_in_seconds = segments.last().map(|s| s.end_second);
        let provider_metadata = scoped_metadata(
            &self.config.provider_scope_name,
            [
                ("request_id", response.request_id.map(JsonValue::String)),
                ("diarized_transcript", response.diarized_transcript),
            ],
        );

        Ok(TranscriptionResponse {
            text: response.transcript,
            segments,
            language: response.language_code,
            duration_in_seconds,
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
