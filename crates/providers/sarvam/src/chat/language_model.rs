use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::ai_sdk_core::transport::HttpTransport;
use crate::ai_sdk_core::{GenerateResponse, LanguageModel, SdkError, StreamResponse};
use crate::ai_sdk_types::usage::from_prompt_completion;
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::api_types::SarvamChatResponse;
use crate::provider_sarvam::chat::convert::{convert_to_sarvam_chat_messages, ImageDownloader};
use crate::provider_sarvam::chat::finish_reason::map_sarvam_finish_reason;
use crate::provider_sarvam::chat::options::{
    parse_sarvam_chat_provider_options, SarvamChatSettings, SimulateMode,
};
use crate::provider_sarvam::chat::prepare_tools::prepare_tools;
use crate::provider_sarvam::chat::simulate::{
    extract_simulated_output, tool_calling_prompt, JSON_OBJECT_PROMPT,
};
use crate::provider_sarvam::chat::stream::{start_streaming, StreamSettings};
use crate::provider_sarvam::config::SarvamConfig;
use crate::provider_sarvam::request::{decode_response, post_json};

pub struct SarvamChatLanguageModel<T: HttpTransport = crate::reqwest_transport::ReqwestTransport> {
    model_id: String,
    settings: SarvamChatSettings,
    config: Arc<SarvamConfig>,
    http: T,
}

impl<T: HttpTransport> SarvamChatLanguageModel<T> {
    pub fn new(
        model_id: impl Into<String>,
        settings: SarvamChatSettings,
        config: Arc<SarvamConfig>,
        http: T,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
            http,
        }
    }

    pub fn settings(&self) -> &SarvamChatSettings {
        &self.settings
    }

    fn check_simulation(&self, options: &v2t::CallOptions) -> Result<(), SdkError> {
        let wants_json = options
            .response_format
            .as_ref()
            .is_some_and(v2t::ResponseFormat::is_json);
        match (self.settings.simulate, wants_json) {
            (Some(SimulateMode::ToolCalling), true) => Err(SdkError::invalid_argument(
                "simulate tool-calling cannot be used with a JSON response format; use json-object",
            )),
            (Some(SimulateMode::JsonObject), false) => Err(SdkError::invalid_argument(
                "simulate json-object requires a JSON response format; use tool-calling for text",
            )),
            _ => Ok(()),
        }
    }

    async fn build_request_body(
        &self,
        options: &v2t::CallOptions,
        stream: bool,
    ) -> Result<(JsonValue, Vec<v2t::CallWarning>), SdkError> {
        self.check_simulation(options)?;

        let mut warnings: Vec<v2t::CallWarning> = vec![];
        if stream {
            warnings.push(v2t::CallWarning::Other {
                message: "Streaming is still experimental for Sarvam".into(),
            });
        }
        if options.top_k.is_some() {
            warnings.push(v2t::CallWarning::UnsupportedSetting {
                setting: "topK".into(),
                details: None,
            });
        }

        let response_format = match &options.response_format {
            Some(v2t::ResponseFormat::Json { schema, .. }) => {
                if schema.is_some() {
                    warnings.push(v2t::CallWarning::UnsupportedSetting {
                        setting: "responseFormat".into(),
                        details: Some("JSON response format schema is not supported".into()),
                    });
                }
                (!stream).then(|| json!({"type": "json_object"}))
            }
            _ => None,
        };

        let prov_opts = parse_sarvam_chat_provider_options(
            &options.provider_options,
            &self.config.provider_scope_name,
        )?;
        tracing::debug!(
            target: "ai_sdk::sarvam",
            reasoning_format = ?prov_opts.reasoning_format,
            simulate = ?self.settings.simulate,
            "resolved chat provider options"
        );

        let tool_choice = prov_opts.tool_choice.or_else(|| options.tool_choice.clone());
        let prep = prepare_tools(&options.tools, tool_choice.as_ref());
        warnings.extend(prep.warnings);

        let extra_system_prompt = match (self.settings.simulate, prep.tools.as_deref()) {
            (Some(SimulateMode::ToolCalling), Some(tools)) if !tools.is_empty() => {
                Some(tool_calling_prompt(tools))
            }
            (Some(SimulateMode::JsonObject), _) => Some(JSON_OBJECT_PROMPT.to_string()),
            _ => None,
        };

        let downloader = self.settings.download_images.then(|| ImageDownloader {
            http: &self.http,
            transport_cfg: &self.config.transport_cfg,
        });
        let messages = convert_to_sarvam_chat_messages(
            &options.prompt,
            extra_system_prompt.as_deref(),
            downloader.as_ref(),
        )
        .await?;

        let mut body_map = serde_json::Map::new();
        body_map.insert("model".into(), json!(self.model_id));
        if let Some(u) = &self.settings.user {
            body_map.insert("user".into(), json!(u));
        }
        if let Some(p) = self.settings.parallel_tool_calls {
            body_map.insert("parallel_tool_calls".into(), json!(p));
        }
        if let Some(mt) = options.max_output_tokens {
            body_map.insert("max_tokens".into(), json!(mt));
        }
        if let Some(t) = options.temperature {
            body_map.insert("temperature".into(), json!(t));
        }
        if let Some(tp) = options.top_p {
            body_map.insert("top_p".into(), json!(tp));
        }
        if let Some(fp) = options.frequency_penalty {
            body_map.insert("frequency_penalty".into(), json!(fp));
        }
        if let Some(pp) = options.presence_penalty {
            body_map.insert("presence_penalty".into(), json!(pp));
        }
        if let Some(stop) = options.stop_sequences.as_ref() {
            body_map.insert("stop".into(), json!(stop));
        }
        if let Some(seed) = options.seed {
            body_map.insert("seed".into(), json!(seed));
        }
        if let Some(rf) = response_format {
            body_map.insert("response_format".into(), rf);
        }
        if let Some(rf) = prov_opts.reasoning_format {
            body_map.insert("reasoning_format".into(), json!(rf.as_str()));
        }
        body_map.insert("messages".into(), serde_json::to_value(&messages)?);
        if let Some(tools) = prep.tools {
            body_map.insert("tools".into(), serde_json::to_value(tools)?);
        }
        if let Some(choice) = prep.tool_choice {
            body_map.insert("tool_choice".into(), choice);
        }
        Ok((JsonValue::Object(body_map), warnings))
    }

    fn merged_options(&self, options: v2t::CallOptions) -> v2t::CallOptions {
        crate::ai_sdk_core::request_builder::defaults::build_call_options(
            options,
            &self.config.provider_scope_name,
            self.config.default_options.as_ref(),
        )
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync> LanguageModel for SarvamChatLanguageModel<T> {
    fn provider_name(&self) -> &'static str {
        "sarvam.chat"
    }
    fn model_id(&self) -> &str {
        &self.model_id
    }
    fn supported_urls(&self) -> HashMap<String, Vec<String>> {
        if self.settings.download_images {
            return HashMap::new();
        }
        HashMap::from([("image/*".to_string(), vec!["^https?://.*$".to_string()])])
    }

    async fn do_generate(&self, options: v2t::CallOptions) -> Result<GenerateResponse, SdkError> {
        let options = self.merged_options(options);
        let (body, warnings) = self.build_request_body(&options, false).await?;
        let url = self.config.chat_endpoint("/chat/completions");
        let (raw, headers) =
            post_json(&self.http, &self.config, &url, &options.headers, &body).await?;

        let response: SarvamChatResponse = decode_response(&raw, "chat")?;
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            SdkError::invalid_response("chat response contained no choices", Some(raw.clone()))
        })?;
        let message = choice.message;
        let mut finish_reason = map_sarvam_finish_reason(choice.finish_reason.as_deref());

        let mut text = message.content.filter(|t| !t.is_empty());
        let mut simulated_call = None;
        if let Some(mode) = self.settings.simulate {
            let out = extract_simulated_output(mode, text);
            text = out.text;
            simulated_call = out.tool_call;
        }

        let mut content = Vec::new();
        if let Some(text) = text {
            content.push(v2t::Content::text(text));
        }
        if let Some(reasoning) = message.reasoning.filter(|r| !r.is_empty()) {
            content.push(v2t::Content::Reasoning {
                text: reasoning,
                provider_metadata: None,
            });
        }
        for tc in message.tool_calls.unwrap_or_default() {
            let id = tc.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            content.push(v2t::Content::ToolCall(v2t::ToolCallPart::new(
                id,
                tc.function.name,
                tc.function.arguments.unwrap_or_default(),
            )));
        }
        if let Some(call) = simulated_call {
            content.push(v2t::Content::ToolCall(call));
            if finish_reason == v2t::FinishReason::Stop {
                finish_reason = v2t::FinishReason::ToolCalls;
            }
        }

        let usage = response
            .usage
            .as_ref()
            .map(from_prompt_completion)
            .unwrap_or_default();

        Ok(GenerateResponse {
            content,
            finish_reason,
            usage,
            provider_metadata: None,
            request_body: Some(body),
            response_headers: Some(headers),
            response_body: Some(raw),
            warnings,
        })
    }

    async fn do_stream(&self, options: v2t::CallOptions) -> Result<StreamResponse, SdkError> {
        let options = self.merged_options(options);
        let (body, warnings) = self.build_request_body(&options, true).await?;
        let url = self.config.chat_endpoint("/chat/completions");
        let headers = self.config.request_headers(&options.headers, true)?;

        start_streaming(
            &self.http,
            url,
            headers,
            body,
            &self.config.transport_cfg,
            StreamSettings {
                warnings,
                include_raw: options.include_raw_chunks,
            },
        )
        .await
    }
}
