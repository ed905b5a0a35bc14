use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::chat::prepare_tools::parse_tool_choice;

/// How the chat model emulates features the backend lacks natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulateMode {
    /// Describe tools in the system prompt and carve a tool call out of the reply.
    ToolCalling,
    /// Ask for JSON in the system prompt and normalise the reply to it.
    JsonObject,
}

/// Per-model settings fixed when the chat model is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SarvamChatSettings {
    pub simulate: Option<SimulateMode>,
    pub parallel_tool_calls: Option<bool>,
    /// End-user identifier forwarded for abuse monitoring.
    pub user: Option<String>,
    /// Inline remote images as data URLs instead of letting the backend fetch them.
    pub download_images: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningFormat {
    Parsed,
    Raw,
    Hidden,
}

impl ReasoningFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningFormat::Parsed => "parsed",
            ReasoningFormat::Raw => "raw",
            ReasoningFormat::Hidden => "hidden",
        }
    }
}

/// Per-call options read from `providerOptions.<scope>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SarvamChatProviderOptions {
    pub reasoning_format: Option<ReasoningFormat>,
    /// Overrides the call's tool choice when present.
    pub tool_choice: Option<v2t::ToolChoice>,
}

pub fn parse_sarvam_chat_provider_options(
    provider_options: &v2t::ProviderOptions,
    provider_scope_name: &str,
) -> Result<SarvamChatProviderOptions, SdkError> {
    let Some(map) = provider_options.get(provider_scope_name) else {
        return Ok(SarvamChatProviderOptions::default());
    };

    let reasoning_format = match map.get("reasoningFormat") {
        None | Some(JsonValue::Null) => None,
        Some(v) => Some(serde_json::from_value::<ReasoningFormat>(v.clone()).map_err(|_| {
            SdkError::invalid_argument(format!(
                "invalid reasoningFormat {v}: expected one of parsed, raw, hidden"
            ))
        })?),
    };

    let tool_choice = match map.get("toolChoice") {
        None | Some(JsonValue::Null) => None,
        Some(v) => Some(parse_tool_choice(v)?),
    };

    Ok(SarvamChatProviderOptions {
        reasoning_format,
        tool_choice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scoped(key: &str, value: JsonValue) -> v2t::ProviderOptions {
        let mut opts = v2t::ProviderOptions::new();
        opts.entry("sarvam".into())
            .or_default()
            .insert(key.into(), value);
        opts
    }

    #[test]
    fn missing_scope_is_default() {
        let parsed = parse_sarvam_chat_provider_options(&v2t::ProviderOptions::new(), "sarvam")
            .unwrap();
        assert_eq!(parsed, SarvamChatProviderOptions::default());
    }

    #[test]
    fn reads_reasoning_format() {
        let parsed =
            parse_sarvam_chat_provider_options(&scoped("reasoningFormat", json!("hidden")), "sarvam")
                .unwrap();
        assert_eq!(parsed.reasoning_format, Some(ReasoningFormat::Hidden));
    }

    #[test]
    fn rejects_unknown_reasoning_format() {
        let err =
            parse_sarvam_chat_provider_options(&scoped("reasoningFormat", json!("verbose")), "sarvam")
                .unwrap_err();
        match err {
            SdkError::InvalidArgument { message } => assert!(message.contains("verbose")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn reads_tool_choice_override() {
        let parsed = parse_sarvam_chat_provider_options(
            &scoped("toolChoice", json!({"type": "tool", "toolName": "weather"})),
            "sarvam",
        )
        .unwrap();
        assert_eq!(
            parsed.tool_choice,
            Some(v2t::ToolChoice::Tool {
                name: "weather".into()
            })
        );
    }
}
