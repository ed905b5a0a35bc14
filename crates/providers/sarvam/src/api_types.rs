//! Wire shapes for the Sarvam chat completions endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::provider_sarvam::error::SarvamErrorData;

// ---------- Request ----------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum SarvamMessage {
    System {
        content: String,
    },
    User {
        content: SarvamUserContent,
    },
    Assistant {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<SarvamMessageToolCall>,
    },
    Tool {
        content: String,
        tool_call_id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SarvamUserContent {
    Text(String),
    Parts(Vec<SarvamContentPart>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SarvamContentPart {
    Text { text: String },
    ImageUrl { image_url: SarvamImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SarvamImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SarvamMessageToolCall {
    Function {
        id: String,
        function: SarvamFunctionCall,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SarvamFunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SarvamTool {
    Function { function: SarvamFunctionDefinition },
}

impl SarvamTool {
    pub fn function(&self) -> &SarvamFunctionDefinition {
        match self {
            SarvamTool::Function { function } => function,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SarvamFunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: JsonValue,
}

// ---------- Non-streaming response ----------

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<SarvamChoice>,
    #[serde(default)]
    pub usage: Option<JsonValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamChoice {
    pub message: SarvamResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<SarvamResponseToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamResponseToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: SarvamResponseFunction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamResponseFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<String>,
}

// ---------- Streaming chunks ----------

/// One decoded event payload: either an inline error or a completion chunk.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SarvamStreamEvent {
    Error(SarvamErrorData),
    Chunk(SarvamChatChunk),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamChatChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<SarvamChunkChoice>,
    #[serde(default)]
    pub usage: Option<JsonValue>,
    #[serde(default)]
    pub x_sarvam: Option<SarvamChunkExtension>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamChunkExtension {
    #[serde(default)]
    pub usage: Option<JsonValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamChunkChoice {
    #[serde(default)]
    pub delta: Option<SarvamChunkDelta>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<SarvamToolCallDelta>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamToolCallDelta {
    pub index: usize,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub function: Option<SarvamFunctionDelta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamFunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

// ---------- Single-shot endpoints ----------

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamTranslationResponse {
    #[serde(default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub source_language_code: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamTransliterateResponse {
    #[serde(default)]
    pub transliterated_text: Option<String>,
    #[serde(default)]
    pub source_language_code: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamLidResponse {
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub script_code: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamTranscriptionResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub transcript: String,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub timestamps: Option<SarvamTimestamps>,
    #[serde(default)]
    pub diarized_transcript: Option<JsonValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamTimestamps {
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub start_time_seconds: Vec<f64>,
    #[serde(default)]
    pub end_time_seconds: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SarvamSpeechResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub audios: Vec<String>,
}
