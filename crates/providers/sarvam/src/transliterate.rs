use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::ai_sdk_core::transport::HttpTransport;
use crate::ai_sdk_core::{GenerateResponse, LanguageModel, SdkError, StreamResponse};
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::api_types::SarvamTransliterateResponse;
use crate::provider_sarvam::config::{source_language_code, SarvamConfig, SarvamLanguageCode};
use crate::provider_sarvam::request::{decode_response, post_json, scoped_metadata, user_prompt_text};
use crate::provider_sarvam::translation::NumeralsFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpokenFormNumeralsLanguage {
    #[default]
    English,
    Native,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SarvamTransliterateSettings {
    /// Source language; `None` lets the backend detect it.
    pub from: Option<SarvamLanguageCode>,
    pub to: SarvamLanguageCode,
    pub numerals_format: Option<NumeralsFormat>,
    /// Rewrite the output as it would be spoken. No effect for `en-IN` output.
    pub spoken_form: Option<bool>,
    /// Only sent together with `spoken_form`.
    pub spoken_form_numerals_language: Option<SpokenFormNumeralsLanguage>,
}

impl SarvamTransliterateSettings {
    pub fn new(to: SarvamLanguageCode) -> Self {
        Self {
            from: None,
            to,
            numerals_format: None,
            spoken_form: None,
            spoken_form_numerals_language: None,
        }
    }

    pub fn from_language(mut self, from: SarvamLanguageCode) -> Self {
        self.from = Some(from);
        self
    }
}

pub struct SarvamTransliterateModel<T: HttpTransport = crate::reqwest_transport::ReqwestTransport>
{
    settings: SarvamTransliterateSettings,
    config: Arc<SarvamConfig>,
    http: T,
}

impl<T: HttpTransport> SarvamTransliterateModel<T> {
    pub fn new(settings: SarvamTransliterateSettings, config: Arc<SarvamConfig>, http: T) -> Self {
        Self {
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
        let indic_to_indic = s.from.is_some_and(|from| from != SarvamLanguageCode::English)
            && s.to != SarvamLanguageCode::English;
        if indic_to_indic {
            return Err(SdkError::invalid_argument(
                "Sarvam doesn't support Indic-Indic Transliteration yet",
            ));
        }
        Ok(())
    }

    fn build_request_body(&self, prompt: &v2t::Prompt) -> JsonValue {
        let s = &self.settings;
        let mut body = json!({
            "input": user_prompt_text(prompt),
            "source_language_code": source_language_code(s.from),
            "target_language_code": s.to,
            "numerals_format": s.numerals_format.unwrap_or_default(),
        });
        if s.spoken_form == Some(true) {
            if let Some(map) = body.as_object_mut() {
                map.insert("spoken_form".into(), json!(true));
                map.insert(
                    "spoken_form_numerals_language".into(),
                    json!(s.spoken_form_numerals_language.unwrap_or_default()),
                );
            }
        }
        body
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync> LanguageModel for SarvamTransliterateModel<T> {
    fn provider_name(&self) -> &'static str {
        "sarvam.transliterate"
    }
    fn model_id(&self) -> &str {
        "unknown"
    }

    async fn do_generate(&self, options: v2t::CallOptions) -> Result<GenerateResponse, SdkError> {
        self.validate()?;
        let body = self.build_request_body(&options.prompt);
        let url = self.config.endpoint("/transliterate");
        let (raw, headers) =
            post_json(&self.http, &self.config, &url, &options.headers, &body).await?;
        let response: SarvamTransliterateResponse = decode_response(&raw, "transliteration")?;

        let content = response
            .transliterated_text
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
        Err(SdkError::unsupported("streaming transliteration"))
    }
}
