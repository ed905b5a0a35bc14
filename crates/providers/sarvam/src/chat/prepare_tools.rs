use serde_json::{json, Value as JsonValue};

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::api_types::{SarvamFunctionDefinition, SarvamTool};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedTools {
    pub tools: Option<Vec<SarvamTool>>,
    pub tool_choice: Option<JsonValue>,
    pub warnings: Vec<v2t::CallWarning>,
}

/// Convert SDK tools and tool choice into the chat wire shape.
///
/// Provider-defined tools cannot be expressed and are dropped with a warning.
pub fn prepare_tools(tools: &[v2t::Tool], tool_choice: Option<&v2t::ToolChoice>) -> PreparedTools {
    if tools.is_empty() {
        return PreparedTools::default();
    }

    let mut warnings = Vec::new();
    let mut out = Vec::new();
    for tool in tools {
        match tool {
            v2t::Tool::Function(f) => out.push(SarvamTool::Function {
                function: SarvamFunctionDefinition {
                    name: f.name.clone(),
                    description: f.description.clone(),
                    parameters: f.input_schema.clone(),
                },
            }),
            v2t::Tool::Provider(p) => {
                tracing::debug!(target: "ai_sdk::sarvam", tool = %p.name, "dropping provider tool");
                warnings.push(v2t::CallWarning::UnsupportedTool {
                    tool_name: p.name.clone(),
                    details: Some(format!("provider tool {} is not supported", p.id)),
                });
            }
        }
    }

    let tool_choice = tool_choice.map(|choice| match choice {
        v2t::ToolChoice::Auto => json!("auto"),
        v2t::ToolChoice::None => json!("none"),
        v2t::ToolChoice::Required => json!("required"),
        v2t::ToolChoice::Tool { name } => {
            json!({"type": "function", "function": {"name": name}})
        }
    });

    PreparedTools {
        tools: Some(out),
        tool_choice,
        warnings,
    }
}

/// Decode a raw tool-choice directive: a bare mode string or
/// `{"type": ..., "toolName": ...}`.
pub fn parse_tool_choice(value: &JsonValue) -> Result<v2t::ToolChoice, SdkError> {
    let tag = match value {
        JsonValue::String(s) => s.as_str(),
        JsonValue::Object(map) => map.get("type").and_then(JsonValue::as_str).ok_or_else(|| {
            SdkError::invalid_argument(format!("tool choice {value} has no type"))
        })?,
        other => {
            return Err(SdkError::invalid_argument(format!(
                "tool choice must be a string or an object, got {other}"
            )))
        }
    };
    match tag {
        "auto" => Ok(v2t::ToolChoice::Auto),
        "none" => Ok(v2t::ToolChoice::None),
        "required" => Ok(v2t::ToolChoice::Required),
        "tool" => value
            .get("toolName")
            .and_then(JsonValue::as_str)
            .map(|name| v2t::ToolChoice::Tool {
                name: name.to_string(),
            })
            .ok_or_else(|| SdkError::invalid_argument("tool choice of type tool requires toolName")),
        other => Err(SdkError::unsupported(format!(
            "Unsupported tool choice type: {other}"
        ))),
    }
}
