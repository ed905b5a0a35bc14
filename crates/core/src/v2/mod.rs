//! Language model interface and its response envelopes.

use crate::ai_sdk_types::v2 as v2t;
use crate::core::SdkError;
use futures_core::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// Stream of structured parts from the model. Dropping it cancels delivery.
pub type PartStream = Pin<Box<dyn Stream<Item = Result<v2t::StreamPart, SdkError>> + Send>>;

/// Generate response payload.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub content: Vec<v2t::Content>,
    pub finish_reason: v2t::FinishReason,
    pub usage: v2t::Usage,
    pub provider_metadata: Option<v2t::ProviderMetadata>,
    pub request_body: Option<serde_json::Value>,
    pub response_headers: Option<v2t::Headers>,
    pub response_body: Option<serde_json::Value>,
    pub warnings: Vec<v2t::CallWarning>,
}

impl GenerateResponse {
    /// Concatenated text content, ignoring reasoning and tool calls.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                v2t::Content::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Stream response envelope.
pub struct StreamResponse {
    pub stream: PartStream,
    pub request_body: Option<serde_json::Value>,
    pub response_headers: Option<v2t::Headers>,
}

#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name for logging/telemetry.
    fn provider_name(&self) -> &'static str;
    /// Provider-specific model identifier.
    fn model_id(&self) -> &str;
    /// URL patterns, keyed by media type pattern, that the backend fetches
    /// itself. Anything else must be inlined by the caller.
    fn supported_urls(&self) -> HashMap<String, Vec<String>> {
        HashMap::new()
    }

    async fn do_generate(&self, options: v2t::CallOptions) -> Result<GenerateResponse, SdkError>;
    async fn do_stream(&self, options: v2t::CallOptions) -> Result<StreamResponse, SdkError>;
}
