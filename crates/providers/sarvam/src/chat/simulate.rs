//! Prompt-level emulation of tool calling and JSON mode.
//!
//! Tools are described to the model as TypeScript-like type declarations in
//! an extra system message; the model is asked to answer with a
//! `{"toolName", "toolData"}` envelope, which is carved out of the reply text
//! afterwards. JSON mode only asks for JSON and normalises the reply.

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::ai_sdk_types::json::parse_embedded_json_object;
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::api_types::SarvamTool;
use crate::provider_sarvam::chat::options::SimulateMode;

pub const JSON_OBJECT_PROMPT: &str =
    "If user doen't specify, make sure to translate json data content into pure English.";

/// System prompt that teaches the model the tool-call envelope.
pub fn tool_calling_prompt(tools: &[SarvamTool]) -> String {
    let context: Vec<String> = tools.iter().map(render_tool).collect();
    let names: Vec<&str> = tools.iter().map(|t| t.function().name.as_str()).collect();
    format!(
        "These are the available tool you can execute.\n\n{}\n\n\
         type YourToolChoices = {{\n 'toolName': '{}',\n 'toolData': {}\n}}\n\n\
         Respond normally.\n\
         If user request to execute any tool, respond with pure JSON format\n\
         Make sure to translate toolData to English.\n\n\
         eg:\n\
         const myChoice: YourToolChoices = {{\n    \"toolName\": <name>,\n    \"toolData\": <data>\n}}",
        context.join("\n"),
        names.join("' | '"),
        names.join(" | "),
    )
}

fn render_tool(tool: &SarvamTool) -> String {
    let f = tool.function();
    let mut out = declaration(&f.name, f.description.as_deref(), &f.parameters);
    for (name, schema) in referenced_definitions(&f.parameters) {
        let description = schema.get("description").and_then(JsonValue::as_str);
        out.push('\n');
        out.push_str(&declaration(name, description, schema));
    }
    out
}

fn declaration(name: &str, description: Option<&str>, schema: &JsonValue) -> String {
    let decl = format!("type {name} = {}", render_type(schema, 0));
    match description.filter(|d| !d.is_empty()) {
        Some(desc) => format!("// {desc}\n{decl}"),
        None => decl,
    }
}

/// Local `$defs` / `definitions` entries reachable from `root`, in the order
/// they are first referenced. Each entry appears once, so recursive
/// definitions terminate.
pub fn referenced_definitions(root: &JsonValue) -> Vec<(&str, &JsonValue)> {
    let mut found: Vec<(&str, &JsonValue)> = Vec::new();
    let mut pending = Vec::new();
    collect_refs(root, &mut pending);

    let mut next = 0;
    while next < pending.len() {
        let reference = pending[next];
        next += 1;
        let Some((name, schema)) = resolve_local_ref(root, reference) else {
            continue;
        };
        if found.iter().any(|(seen, _)| *seen == name) {
            continue;
        }
        found.push((name, schema));
        collect_refs(schema, &mut pending);
    }
    found
}

fn resolve_local_ref<'a>(root: &'a JsonValue, reference: &'a str) -> Option<(&'a str, &'a JsonValue)> {
    ["#/$defs/", "#/definitions/"].iter().find_map(|prefix| {
        let name = reference.strip_prefix(prefix)?;
        let section = &prefix[2..prefix.len() - 1];
        root.get(section)?.get(name).map(|schema| (name, schema))
    })
}

/// Every `$ref` string below `value`, skipping definition tables themselves.
fn collect_refs<'a>(value: &'a JsonValue, out: &mut Vec<&'a str>) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                match key.as_str() {
                    "$ref" => {
                        if let Some(r) = child.as_str() {
                            out.push(r);
                        }
                    }
                    "$defs" | "definitions" => {}
                    // Property names are user data, not schema keywords.
                    "properties" => match child.as_object() {
                        Some(props) => props.values().for_each(|prop| collect_refs(prop, out)),
                        None => collect_refs(child, out),
                    },
                    _ => collect_refs(child, out),
                }
            }
        }
        JsonValue::Array(items) => items.iter().for_each(|item| collect_refs(item, out)),
        _ => {}
    }
}

/// Render a JSON schema as a TypeScript-like type expression.
pub fn render_type(schema: &JsonValue, depth: usize) -> String {
    let Some(obj) = schema.as_object() else {
        return "unknown".into();
    };

    if let Some(reference) = obj.get("$ref").and_then(JsonValue::as_str) {
        return reference.rsplit('/').next().unwrap_or(reference).to_string();
    }
    if let Some(value) = obj.get("const") {
        return value.to_string();
    }
    if let Some(values) = obj.get("enum").and_then(JsonValue::as_array) {
        return join_types(values.iter().map(JsonValue::to_string), " | ");
    }
    for (key, sep) in [("anyOf", " | "), ("oneOf", " | "), ("allOf", " & ")] {
        if let Some(variants) = obj.get(key).and_then(JsonValue::as_array) {
            return join_types(variants.iter().map(|v| render_type(v, depth)), sep);
        }
    }

    match obj.get("type") {
        Some(JsonValue::String(t)) => render_typed(t, obj, depth),
        Some(JsonValue::Array(types)) => join_types(
            types
                .iter()
                .filter_map(JsonValue::as_str)
                .map(|t| render_typed(t, obj, depth)),
            " | ",
        ),
        _ if obj.contains_key("properties") => render_object(obj, depth),
        _ => "unknown".into(),
    }
}

fn join_types(parts: impl Iterator<Item = String>, sep: &str) -> String {
    let parts: Vec<String> = parts.collect();
    if parts.is_empty() {
        return "never".into();
    }
    parts.join(sep)
}

fn render_typed(t: &str, obj: &JsonMap<String, JsonValue>, depth: usize) -> String {
    match t {
        "string" => "string".into(),
        "number" | "integer" => "number".into(),
        "boolean" => "boolean".into(),
        "null" => "null".into(),
        "array" => match obj.get("items") {
            Some(JsonValue::Array(tuple)) => format!(
                "[{}]",
                tuple
                    .iter()
                    .map(|s| render_type(s, depth))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Some(items) => format!("Array<{}>", render_type(items, depth)),
            None => "Array<unknown>".into(),
        },
        "object" => render_object(obj, depth),
        _ => "unknown".into(),
    }
}

fn render_object(obj: &JsonMap<String, JsonValue>, depth: usize) -> String {
    let props = obj.get("properties").and_then(JsonValue::as_object);
    let Some(props) = props.filter(|p| !p.is_empty()) else {
        return match obj.get("additionalProperties") {
            Some(JsonValue::Bool(false)) => "{}".into(),
            Some(extra @ JsonValue::Object(_)) => {
                format!("{{ [k: string]: {} }}", render_type(extra, depth))
            }
            _ => "{ [k: string]: unknown }".into(),
        };
    };

    let required: Vec<&str> = obj
        .get("required")
        .and_then(JsonValue::as_array)
        .map(|r| r.iter().filter_map(JsonValue::as_str).collect())
        .unwrap_or_default();
    let pad = "  ".repeat(depth + 1);

    let mut out = String::from("{\n");
    for (name, prop) in props {
        if let Some(desc) = prop.get("description").and_then(JsonValue::as_str) {
            out.push_str(&format!("{pad}// {desc}\n"));
        }
        let optional = if required.contains(&name.as_str()) { "" } else { "?" };
        out.push_str(&format!(
            "{pad}{}{optional}: {};\n",
            property_key(name),
            render_type(prop, depth + 1)
        ));
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
    out
}

fn property_key(name: &str) -> String {
    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
    let rest_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if starts_ok && rest_ok {
        name.to_string()
    } else {
        JsonValue::String(name.to_string()).to_string()
    }
}

/// Reply text and tool call left after simulation extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedOutput {
    pub text: Option<String>,
    pub tool_call: Option<v2t::ToolCallPart>,
}

/// Read a `{"toolName", "toolData"}` envelope as a tool call with a fresh id.
///
/// Only the presence of both keys is required; a non-string `toolName` is
/// kept in its JSON rendering.
pub fn tool_call_from_envelope(value: &JsonValue) -> Option<v2t::ToolCallPart> {
    let name = match value.get("toolName")? {
        JsonValue::String(name) => name.clone(),
        other => other.to_string(),
    };
    let data = value.get("toolData")?;
    Some(v2t::ToolCallPart::new(
        uuid::Uuid::new_v4().to_string(),
        name,
        data.to_string(),
    ))
}

/// Post-process reply text according to the simulation mode.
pub fn extract_simulated_output(mode: SimulateMode, text: Option<String>) -> SimulatedOutput {
    let parsed = text.as_deref().and_then(parse_embedded_json_object);
    match (mode, parsed) {
        (SimulateMode::ToolCalling, Some(value)) => match tool_call_from_envelope(&value) {
            Some(call) => SimulatedOutput {
                text: None,
                tool_call: Some(call),
            },
            None => SimulatedOutput {
                text,
                tool_call: None,
            },
        },
        (SimulateMode::JsonObject, Some(value)) => SimulatedOutput {
            text: Some(value.to_string()),
            tool_call: None,
        },
        (_, None) => SimulatedOutput {
            text,
            tool_call: None,
        },
    }
}
