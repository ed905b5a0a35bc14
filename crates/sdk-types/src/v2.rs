//! Language model parity types (prompt, call options, results, stream parts).
//! These types are provider-agnostic; providers translate them to wire shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

// ---------- Provider plumbing ----------

/// Provider-specific input options passed through to providers.
/// Outer key is the provider id; inner keys are provider-defined option names.
pub type ProviderOptions = HashMap<String, HashMap<String, JsonValue>>;

/// Provider-specific output metadata passed through from providers.
pub type ProviderMetadata = HashMap<String, HashMap<String, JsonValue>>;

/// HTTP headers map for response metadata.
pub type Headers = HashMap<String, String>;

pub(crate) fn headers_is_empty(map: &HashMap<String, String>) -> bool {
    map.is_empty()
}

pub(crate) fn provider_options_is_empty(map: &ProviderOptions) -> bool {
    map.is_empty()
}

// ---------- Prompt ----------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum PromptMessage {
    System {
        content: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    User {
        content: Vec<UserPart>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    Assistant {
        content: Vec<AssistantPart>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    Tool {
        content: Vec<ToolResultPart>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
}

impl PromptMessage {
    pub fn system(text: impl Into<String>) -> Self {
        PromptMessage::System {
            content: text.into(),
            provider_options: None,
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        PromptMessage::User {
            content: vec![UserPart::text(text)],
            provider_options: None,
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        PromptMessage::Assistant {
            content: vec![AssistantPart::Text {
                text: text.into(),
                provider_options: None,
            }],
            provider_options: None,
        }
    }
}

pub type Prompt = Vec<PromptMessage>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UserPart {
    Text {
        text: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        data: DataContent,
        #[serde(rename = "mediaType")]
        media_type: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
}

impl UserPart {
    pub fn text(text: impl Into<String>) -> Self {
        UserPart::Text {
            text: text.into(),
            provider_options: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AssistantPart {
    Text {
        text: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    Reasoning {
        text: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "providerOptions"
        )]
        provider_options: Option<ProviderOptions>,
    },
    ToolCall(ToolCallPart),
    ToolResult(ToolResultPart),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DataContent {
    /// Base64-encoded data string
    Base64 { base64: String },
    /// Raw bytes
    Bytes {
        #[serde(with = "serde_bytes")]
        bytes: Vec<u8>,
    },
    /// URL string
    Url { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallPart {
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    #[serde(rename = "toolName")]
    pub tool_name: String,
    /// Stringified JSON input
    pub input: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "providerMetadata"
    )]
    pub provider_metadata: Option<ProviderMetadata>,
}

impl ToolCallPart {
    pub fn new(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            input: input.into(),
            provider_metadata: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolResultOutput {
    Text { value: String },
    Json { value: JsonValue },
    ErrorText { value: String },
    ErrorJson { value: JsonValue },
    Content { value: Vec<ToolResultInlineContent> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolResultInlineContent {
    Text {
        text: String,
    },
    Media {
        data: String,
        #[serde(rename = "mediaType")]
        media_type: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResultPart {
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    #[serde(rename = "toolName")]
    pub tool_name: String,
    pub output: ToolResultOutput,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "providerOptions"
    )]
    pub provider_options: Option<ProviderOptions>,
}

// ---------- Call options ----------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CallOptions {
    pub prompt: Prompt,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub presence_penalty: Option<f32>,
    #[serde(default)]
    pub frequency_penalty: Option<f32>,
    #[serde(default)]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub response_format: Option<ResponseFormat>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub tool_choice: Option<ToolChoice>,
    #[serde(default)]
    pub include_raw_chunks: bool,
    #[serde(default, skip_serializing_if = "headers_is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "provider_options_is_empty")]
    pub provider_options: ProviderOptions,
}

impl CallOptions {
    pub fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            ..Default::default()
        }
    }
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }
    pub fn with_max_output_tokens(mut self, n: u32) -> Self {
        self.max_output_tokens = Some(n);
        self
    }
    pub fn with_tools(mut self, tools: Vec<Tool>, tool_choice: Option<ToolChoice>) -> Self {
        self.tools = tools;
        self.tool_choice = tool_choice;
        self
    }
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
    pub fn with_provider_option(
        mut self,
        scope: &str,
        key: impl Into<String>,
        value: JsonValue,
    ) -> Self {
        self.provider_options
            .entry(scope.to_string())
            .or_default()
            .insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseFormat {
    Text,
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<JsonValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl ResponseFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, ResponseFormat::Json { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl FunctionTool {
    pub fn new(name: impl Into<String>, description: Option<&str>, input_schema: JsonValue) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_string),
            input_schema,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Tool {
    Function(FunctionTool),
    /// A tool implemented by a specific provider; most backends cannot express it.
    Provider(ProviderTool),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderTool {
    /// The provider tool id, formatted as "<provider>.<tool>".
    pub id: String,
    /// The custom tool name exposed to the model.
    pub name: String,
    /// Provider-defined tool arguments.
    #[serde(default)]
    pub args: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ToolChoice {
    Auto,
    None,
    Required,
    Tool { name: String },
}

// ---------- Warnings / finish / usage ----------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CallWarning {
    UnsupportedSetting {
        setting: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    UnsupportedTool {
        tool_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    Other {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    Error,
    Other,
    #[default]
    Unknown,
}

/// Token accounting for one call. A `None` count means the backend did not
/// report it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

// ---------- Model outputs ----------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Content {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    Reasoning {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ToolCall(ToolCallPart),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text {
            text: text.into(),
            provider_metadata: None,
        }
    }
}

// ---------- Streaming ----------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamPart {
    // Text
    TextStart {
        id: String,
    },
    TextDelta {
        id: String,
        delta: String,
    },
    TextEnd {
        id: String,
    },
    // Reasoning
    ReasoningStart {
        id: String,
    },
    ReasoningDelta {
        id: String,
        delta: String,
    },
    ReasoningEnd {
        id: String,
    },
    // Tool input + calls
    ToolInputDelta {
        id: String,
        delta: String,
    },
    ToolCall(ToolCallPart),
    // Stream lifecycle and metadata
    StreamStart {
        warnings: Vec<CallWarning>,
    },
    ResponseMetadata {
        #[serde(flatten)]
        meta: ResponseMetadata,
    },
    Finish {
        usage: Usage,
        finish_reason: FinishReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    // Raw and error passthroughs
    Raw {
        raw_value: JsonValue,
    },
    Error {
        error: JsonValue,
    },
}
