use std::time::SystemTime;

use crate::ai_sdk_types::transcription as trt;
use crate::ai_sdk_types::v2 as v2t;

use crate::core::SdkError;

/// Response envelope shared by the single-shot audio models.
#[derive(Debug, Clone)]
pub struct ModelResponseMeta {
    pub timestamp: SystemTime,
    pub model_id: String,
    pub headers: Option<v2t::Headers>,
}

#[derive(Debug, Clone)]
pub struct TranscriptionResponse {
    pub text: String,
    pub segments: Vec<trt::TranscriptionSegment>,
    /// Language detected or requested, as a BCP-47 style code.
    pub language: Option<String>,
    pub duration_in_seconds: Option<f64>,
    pub warnings: Vec<v2t::CallWarning>,
    pub provider_metadata: Option<v2t::ProviderMetadata>,
    pub response: ModelResponseMeta,
    pub response_body: Option<serde_json::Value>,
}

#[async_trait::async_trait]
pub trait TranscriptionModel: Send + Sync {
    /// Provider name for logging/telemetry.
    fn provider_name(&self) -> &'static str;
    /// Provider-specific model identifier.
    fn model_id(&self) -> &str;

    async fn do_generate(
        &self,
        options: trt::TranscriptionOptions,
    ) -> Result<TranscriptionResponse, SdkError>;
}
