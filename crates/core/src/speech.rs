use crate::ai_sdk_types::speech as spt;
use crate::ai_sdk_types::v2 as v2t;

use crate::core::transcription::ModelResponseMeta;
use crate::core::SdkError;

#[derive(Debug, Clone)]
pub struct SpeechResponse {
    /// Decoded audio bytes in the requested container format.
    pub audio: Vec<u8>,
    pub warnings: Vec<v2t::CallWarning>,
    pub request_body: Option<serde_json::Value>,
    pub response: ModelResponseMeta,
    pub response_body: Option<serde_json::Value>,
}

#[async_trait::async_trait]
pub trait SpeechModel: Send + Sync {
    fn provider_name(&self) -> &'static str;
    fn model_id(&self) -> &str;

    async fn do_generate(&self, options: spt::SpeechOptions) -> Result<SpeechResponse, SdkError>;
}
