use crate::ai_sdk_types::v2::FinishReason;

pub fn map_sarvam_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason.unwrap_or("") {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        "function_call" | "tool_calls" => FinishReason::ToolCalls,
        _ => FinishReason::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_and_unknown_reasons() {
        assert_eq!(map_sarvam_finish_reason(Some("stop")), FinishReason::Stop);
        assert_eq!(map_sarvam_finish_reason(Some("length")), FinishReason::Length);
        assert_eq!(
            map_sarvam_finish_reason(Some("content_filter")),
            FinishReason::ContentFilter
        );
        assert_eq!(map_sarvam_finish_reason(Some("function_call")), FinishReason::ToolCalls);
        assert_eq!(map_sarvam_finish_reason(Some("tool_calls")), FinishReason::ToolCalls);
        assert_eq!(map_sarvam_finish_reason(Some("eos")), FinishReason::Unknown);
        assert_eq!(map_sarvam_finish_reason(None), FinishReason::Unknown);
    }
}
