use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Returns true when `s` is a complete JSON document.
///
/// Used to detect when streamed tool-call arguments have been fully received.
/// Empty or whitespace-only input is never complete.
pub fn is_parsable_json(s: &str) -> bool {
    serde_json::from_str::<Value>(s).is_ok()
}

fn json_object_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        // Matches either a run without braces or exactly one nested object level.
        Regex::new(r"\{(?:[^{}]*|\{[^{}]*\})*\}").ok()
    })
    .as_ref()
}

/// Return the leftmost brace-balanced object substring of `text`.
///
/// The match understands one level of nesting and nothing about string
/// literals: `{"a":"}"}` is cut at the first closing brace. Callers must treat
/// the result as a candidate and parse it before use.
pub fn first_json_object(text: &str) -> Option<&str> {
    json_object_regex()?.find(text).map(|m| m.as_str())
}

/// Parse the first brace-balanced object found in free text.
///
/// Parse failures are swallowed and reported as `None`.
pub fn parse_embedded_json_object(text: &str) -> Option<Value> {
    let candidate = first_json_object(text)?;
    serde_json::from_str::<Value>(candidate)
        .ok()
        .filter(Value::is_object)
}
