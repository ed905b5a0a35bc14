use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::ai_sdk_core::transport::HttpTransport;
use crate::ai_sdk_core::{ModelResponseMeta, SdkError, SpeechModel, SpeechOptions, SpeechResponse};
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::api_types::SarvamSpeechResponse;
use crate::provider_sarvam::config::{SarvamConfig, SarvamLanguageCode};
use crate::provider_sarvam::request::{decode_response, post_json, scoped_options};

pub const SUPPORTED_OUTPUT_FORMATS: [&str; 6] = ["mp3", "opus", "aac", "flac", "wav", "pcm"];
const DEFAULT_OUTPUT_FORMAT: &str = "wav";
const SAMPLE_RATES: [u32; 4] = [8000, 16000, 22050, 24000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SarvamSpeaker {
    Meera,
    Pavithra,
    Maitreyi,
    Arvind,
    Amol,
    Amartya,
    Diya,
    Neel,
    Misha,
    Vian,
    Arjun,
    Maya,
    Anushka,
    Abhilash,
    Manisha,
    Vidya,
    Arya,
    Karun,
    Hitesh,
}

impl SarvamSpeaker {
    /// Parse a voice name as given in call options.
    pub fn from_voice(voice: &str) -> Result<Self, SdkError> {
        serde_json::from_value(JsonValue::String(voice.to_string()))
            .map_err(|_| SdkError::invalid_argument(format!("unknown Sarvam speaker '{voice}'")))
    }

    /// Voice used when neither settings nor the call pick one.
    pub fn default_for_model(model_id: &str) -> Self {
        match model_id {
            "bulbul:v2" => SarvamSpeaker::Manisha,
            _ => SarvamSpeaker::Meera,
        }
    }
}

/// Synthesis knobs. Set on the model they override the same keys given per
/// call under `providerOptions.sarvam`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SarvamSpeechSettings {
    #[serde(default)]
    pub speaker: Option<SarvamSpeaker>,
    #[serde(default)]
    pub pitch: Option<f64>,
    #[serde(default)]
    pub pace: Option<f64>,
    #[serde(default)]
    pub loudness: Option<f64>,
    #[serde(default)]
    pub speech_sample_rate: Option<u32>,
    #[serde(default)]
    pub enable_preprocessing: Option<bool>,
}

fn check_range(name: &str, value: Option<f64>, min: f64, max: f64) -> Result<(), SdkError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(SdkError::invalid_argument(format!(
            "{name} must be between {min} and {max}, got {v}"
        ))),
        _ => Ok(()),
    }
}

impl SarvamSpeechSettings {
    fn overlay(self, model: &SarvamSpeechSettings) -> Self {
        Self {
            speaker: model.speaker.or(self.speaker),
            pitch: model.pitch.or(self.pitch),
            pace: model.pace.or(self.pace),
            loudness: model.loudness.or(self.loudness),
            speech_sample_rate: model.speech_sample_rate.or(self.speech_sample_rate),
            enable_preprocessing: model.enable_preprocessing.or(self.enable_preprocessing),
        }
    }

    fn validate(&self) -> Result<(), SdkError> {
        check_range("pitch", self.pitch, -0.75, 0.75)?;
        check_range("pace", self.pace, 0.5, 2.0)?;
        check_range("loudness", self.loudness, 0.3, 3.0)?;
        if let Some(rate) = self.speech_sample_rate {
            if !SAMPLE_RATES.contains(&rate) {
                return Err(SdkError::invalid_argument(format!(
                    "speech_sample_rate must be one of 8000, 16000, 22050, 24000, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

pub struct SarvamSpeechModel<T: HttpTransport = crate::reqwest_transport::ReqwestTransport> {
    model_id: String,
    language: SarvamLanguageCode,
    settings: SarvamSpeechSettings,
    config: Arc<SarvamConfig>,
    http: T,
}

impl<T: HttpTransport> SarvamSpeechModel<T> {
    pub fn new(
        model_id: impl Into<String>,
        language: SarvamLanguageCode,
        settings: SarvamSpeechSettings,
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

    fn build_request_body(
        &self,
        options: &SpeechOptions,
    ) -> Result<(JsonValue, Vec<v2t::CallWarning>), SdkError> {
        let mut warnings = Vec::new();
        let call: SarvamSpeechSettings =
            scoped_options(&options.provider_options, &self.config.provider_scope_name)?;
        let settings = call.overlay(&self.settings);
        settings.validate()?;

        let speaker = match (settings.speaker, options.voice.as_deref()) {
            (Some(speaker), _) => speaker,
            (None, Some(voice)) => SarvamSpeaker::from_voice(voice)?,
            (None, None) => SarvamSpeaker::default_for_model(&self.model_id),
        };

        let response_format = match options.output_format.as_deref() {
            None => DEFAULT_OUTPUT_FORMAT,
            Some(f) if SUPPORTED_OUTPUT_FORMATS.contains(&f) => f,
            Some(f) => {
                warnings.push(v2t::CallWarning::UnsupportedSetting {
                    setting: "outputFormat".into(),
                    details: Some(format!(
                        "Unsupported output format: {f}. Using {DEFAULT_OUTPUT_FORMAT} instead."
                    )),
                });
                DEFAULT_OUTPUT_FORMAT
            }
        };

        for (setting, present) in [
            ("speed", options.speed.is_some()),
            ("instructions", options.instructions.is_some()),
            ("language", options.language.is_some()),
        ] {
            if present {
                warnings.push(v2t::CallWarning::UnsupportedSetting {
                    setting: setting.into(),
                    details: None,
                });
            }
        }

        let mut body = serde_json::Map::new();
        body.insert("model".into(), json!(self.model_id));
        body.insert("text".into(), json!(options.text));
        body.insert("target_language_code".into(), json!(self.language));
        body.insert("speaker".into(), json!(speaker));
        body.insert("response_format".into(), json!(response_format));
        if let Some(v) = settings.pitch {
            body.insert("pitch".into(), json!(v));
        }
        if let Some(v) = settings.pace {
            body.insert("pace".into(), json!(v));
        }
        if let Some(v) = settings.loudness {
            body.insert("loudness".into(), json!(v));
        }
        if let Some(v) = settings.speech_sample_rate {
            body.insert("speech_sample_rate".into(), json!(v));
        }
        if let Some(v) = settings.enable_preprocessing {
            body.insert("enable_preprocessing".into(), json!(v));
        }
        Ok((JsonValue::Object(body), warnings))
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync> SpeechModel for SarvamSpeechModel<T> {
    fn provider_name(&self) -> &'static str {
        "sarvam.speech"
    }
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(&self, options: SpeechOptions) -> Result<SpeechResponse, SdkError> {
        let options = crate::ai_sdk_core::request_builder::defaults::build_speech_options(
            options,
            &self.config.provider_scope_name,
            self.config.default_options.as_ref(),
        );
        let (body, warnings) = self.build_request_body(&options)?;
        let url = self.config.endpoint("/text-to-speech");
        let (raw, headers) =
            post_json(&self.http, &self.config, &url, &options.headers, &body).await?;
        let response: SarvamSpeechResponse = decode_response(&raw, "speech")?;

        let first = response.audios.first().ok_or_else(|| {
            SdkError::invalid_response("speech response contained no audio", Some(raw.clone()))
        })?;
        let audio = B64.decode(first.trim()).map_err(|e| {
            SdkError::invalid_response(format!("speech audio is not valid base64: {e}"), None)
        })?;

        Ok(SpeechResponse {
            audio,
            warnings,
            request_body: Some(body),
            response: ModelResponseMeta {
                timestamp: SystemTime::now(),
                model_id: self.model_id.clone(),
                headers: Some(headers),
            },
            response_body: Some(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voices_parse_by_lowercase_name() {
        assert_eq!(SarvamSpeaker::from_voice("anushka").unwrap(), SarvamSpeaker::Anushka);
        assert!(matches!(
            SarvamSpeaker::from_voice("alloy"),
            Err(SdkError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn model_defaults_pick_voice() {
        assert_eq!(SarvamSpeaker::default_for_model("bulbul:v1"), SarvamSpeaker::Meera);
        assert_eq!(SarvamSpeaker::default_for_model("bulbul:v2"), SarvamSpeaker::Manisha);
        assert_eq!(SarvamSpeaker::default_for_model("bulbul:v9"), SarvamSpeaker::Meera);
    }

    #[test]
    fn ranges_are_enforced() {
        let ok = SarvamSpeechSettings {
            pitch: Some(0.75),
            pace: Some(0.5),
            loudness: Some(3.0),
            speech_sample_rate: Some(24000),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad_pitch = SarvamSpeechSettings {
            pitch: Some(1.0),
            ..Default::default()
        };
        assert!(bad_pitch.validate().is_err());

        let bad_rate = SarvamSpeechSettings {
            speech_sample_rate: Some(44100),
            ..Default::default()
        };
        assert!(bad_rate.validate().is_err());
    }
}
