use serde_json::Value;

use crate::types::v2::Usage;

/// Map a `{prompt_tokens, completion_tokens}` usage object into [`Usage`].
///
/// Absent or non-numeric counts stay `None`; the total is only filled when
/// both sides are known.
pub fn from_prompt_completion(u: &Value) -> Usage {
    let input_tokens = u.get("prompt_tokens").and_then(Value::as_u64);
    let output_tokens = u.get("completion_tokens").and_then(Value::as_u64);
    let total_tokens = match (input_tokens, output_tokens) {
        (Some(i), Some(o)) => Some(i.saturating_add(o)),
        _ => None,
    };
    Usage {
        input_tokens,
        output_tokens,
        total_tokens,
    }
}
