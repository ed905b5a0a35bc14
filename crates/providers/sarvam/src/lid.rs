//! Text language identification.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::ai_sdk_core::transport::HttpTransport;
use crate::ai_sdk_core::{GenerateResponse, LanguageModel, SdkError, StreamResponse};
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::api_types::SarvamLidResponse;
use crate::provider_sarvam::config::SarvamConfig;
use crate::provider_sarvam::request::{decode_response, post_json, scoped_metadata, user_prompt_text};

/// Returns the detected language code as text; the script code and request
/// id go to provider metadata.
pub struct SarvamLidModel<T: HttpTransport = crate::reqwest_transport::ReqwestTransport> {
    config: Arc<SarvamConfig>,
    http: T,
}

impl<T: HttpTransport> SarvamLidModel<T> {
    pub fn new(config: Arc<SarvamConfig>, http: T) -> Self {
        Self { config, http }
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync> LanguageModel for SarvamLidModel<T> {
    fn provider_name(&self) -> &'static str {
        "sarvam.lid"
    }
    fn model_id(&self) -> &str {
        "unknown"
    }

    async fn do_generate(&self, options: v2t::CallOptions) -> Result<GenerateResponse, SdkError> {
        let body = json!({ "input": user_prompt_text(&options.prompt) });
        let url = self.config.endpoint("/text-lid");
        let (raw, headers) =
            post_json(&self.http, &self.config, &url, &options.headers, &body).await?;
        let response: SarvamLidResponse = decode_response(&raw, "language identification")?;

        let content = response
            .language_code
            .map(v2t::Content::text)
            .into_iter()
            .collect();
        let provider_metadata = scoped_metadata(
            &self.config.provider_scope_name,
            [
                ("script_code", response.script_code.map(JsonValue::String)),
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
        Err(SdkError::unsupported("streaming language identification"))
    }
}
