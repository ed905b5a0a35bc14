use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::ai_sdk_core::transport::HttpTransport;
use crate::ai_sdk_core::{GenerateResponse, LanguageModel, SdkError, StreamResponse};
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::api_types::SarvamTranslationResponse;
use crate::provider_sarvam::config::{source_language_code, SarvamConfig, SarvamLanguageCode};
use crate::provider_sarvam::request::{decode_response, post_json, scoped_metadata, user_prompt_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumeralsFormat {
    #[default]
    International,
    Native,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeakerGender {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationMode {
    #[default]
    Formal,
    ModernColloquial,
    ClassicColloquial,
    CodeMixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputScript {
    Roman,
    FullyNative,
    SpokenFormInNative,
}

pub const MAYURA_V1: &str = "mayura:v1";
pub const SARVAM_TRANSLATE_V1: &str = "sarvam-translate:v1";

#[derive(Debug, Clone, PartialEq)]
pub struct SarvamTranslationSettings {
    /// Source language; `None` lets the backend detect it.
    pub from: Option<SarvamLanguageCode>,
    pub to: SarvamLanguageCode,
    pub numerals_format: Option<NumeralsFormat>,
    pub speaker_gender: Option<SpeakerGender>,
    pub mode: Option<TranslationMode>,
    /// Backend model, `mayura:v1` when unset.
    pub model: Option<String>,
    pub enable_preprocessing: Option<bool>,
    pub output_script: Option<OutputScript>,
}

impl SarvamTranslationSettings {
    pub fn new(to: SarvamLanguageCode) -> Self {
        Self {
            from: None,
            to,
            numerals_format: None,
            speaker_gender: None,
            mode: None,
            model: None,
            enable_preprocessing: None,
            output_script: None,
        }
    }

    pub fn from_language(mut self, from: SarvamLanguageCode) -> Self {
        self.from = Some(from);
        self
    }
}

pub struct SarvamTranslationModel<T: HttpTransport = crate::reqwest_transport::ReqwestTransport> {
    model_id: String,
    settings: SarvamTranslationSettings,
    config: Arc<SarvamConfig>,
    http: T,
}

impl<T: HttpTransport> SarvamTranslationModel<T> {
    pub fn new(settings: SarvamTranslationSettings, config: Arc<SarvamConfig>, http: T) -> Self {
        Self {
            model_id: settings.model.clone().unwrap_or_else(|| MAYURA_V1.into()),
            settings,
            config,
            http,
        }
    }

    fn validate(&self) -> Result<(), SdkError> {
        let s = &self.settings;
        if s.from == Some(s.to) {
            return Err(SdkError::invalid_argument(
                "Source and target languages code must be different.",
            ));
        }
        if self.model_id == SARVAM_TRANSLATE_V1 {
            if s.mode.unwrap_or_default() != TranslationMode::Formal {
                return Err(SdkError::invalid_argument(
                    "Sarvam 'sarvam-translate:v1' only support mode formal.",
                ));
            }
            if s.from.is_none() {
                return Err(SdkError::invalid_argument(
                    "Sarvam 'sarvam-translate:v1' requires source language code.",
                ));
            }
        }
        Ok(())
    }

    fn build_request_body(&self, prompt: &v2t::Prompt) -> JsonValue {
        let s = &self.settings;
        json!({
            "input": user_prompt_text(prompt),
            "source_language_code": source_language_code(s.from),
            "target_language_code": s.to,
            "numerals_format": s.numerals_format.unwrap_or_default(),
            "enable_preprocessing": s.enable_preprocessing.unwrap_or(false),
            "output_script": s.output_script,
            "speaker_gender": s.speaker_gender.unwrap_or_default(),
            "mode": s.mode.unwrap_or_default(),
            "model": self.model_id,
        })
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync> LanguageModel for SarvamTranslationModel<T> {
    fn provider_name(&self) -> &'static str {
        "sarvam.translation"
    }
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(&self, options: v2t::CallOptions) -> Result<GenerateResponse, SdkError> {
        self.validate()?;
        let body = self.build_request_body(&options.prompt);
        let url = self.config.endpoint("/translate");
        let (raw, headers) =
            post_json(&self.http, &self.config, &url, &options.headers, &body).await?;
        let response: SarvamTranslationResponse = decode_response(&raw, "translation")?;

        let content = response
            .translated_text
            .filter(|t| !t.is_empty())
            .map(v2t::Content::text)
            .into_iter()
            .collect();
        let provider_metadata = scoped_metadata(
            &self.config.provider_scope_name,
            [
                ("source_language_code", response.source_language_code.map(JsonValue::String)),
                ("request_id", response.request_id.map(JsonValue::String)),
            ],
        );

        Ok(GenerateResponse {
            content,
            finish_reason: v2t::FinishReason::Unknown,
            usage: v2t::Usage::default(),
            provider_metadata,
            request_body: Some(body),
            response_headers: Some(headers),
            response_body: Some(raw),
            warnings: Vec::new(),
        })
    }

    async fn do_stream(&self, _options: v2t::CallOptions) -> Result<StreamResponse, SdkError> {
        Err(SdkError::unsupported("streaming translation"))
    }
}
