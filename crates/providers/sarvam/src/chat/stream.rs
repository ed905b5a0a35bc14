use crate::ai_sdk_core::transport::{HttpTransport, TransportConfig};
use crate::ai_sdk_core::{SdkError, StreamResponse};
use crate::ai_sdk_streaming_sse::SseDecoder;
use crate::ai_sdk_types::json::is_parsable_json;
use crate::ai_sdk_types::usage::from_prompt_completion;
use crate::ai_sdk_types::v2 as v2t;
use async_stream::try_stream;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::{json, Value as JsonValue};
use std::collections::{BTreeMap, HashMap};

use crate::provider_sarvam::api_types::{SarvamChatChunk, SarvamStreamEvent, SarvamToolCallDelta};
use crate::provider_sarvam::chat::finish_reason::map_sarvam_finish_reason;
use crate::provider_sarvam::error::map_transport_error_to_sdk_error;

const TEXT_ID: &str = "txt-0";
const REASONING_ID: &str = "reasoning-0";

pub struct StreamSettings {
    pub warnings: Vec<v2t::CallWarning>,
    pub include_raw: bool,
}

struct ToolCallState {
    id: String,
    name: String,
    args: String,
    finished: bool,
}

impl ToolCallState {
    fn to_call(&self) -> v2t::StreamPart {
        v2t::StreamPart::ToolCall(v2t::ToolCallPart::new(
            self.id.clone(),
            self.name.clone(),
            self.args.clone(),
        ))
    }
}

#[derive(Default)]
struct ChatState {
    is_active_text: bool,
    is_active_reasoning: bool,
    /// Keyed by the backend-assigned tool call index, which may be sparse.
    tool_calls: BTreeMap<usize, ToolCallState>,
}

/// A tool call delta that cannot be correlated; ends the stream.
#[derive(Debug)]
struct ToolDeltaError {
    message: &'static str,
    index: usize,
}

impl ToolDeltaError {
    fn into_part(self) -> v2t::StreamPart {
        v2t::StreamPart::Error {
            error: json!({"message": self.message, "index": self.index}),
        }
    }
}

/// Translate an SSE byte stream from the chat endpoint into stream parts.
///
/// Always starts with `StreamStart` and ends with exactly one `Finish`.
pub fn build_stream<S>(bytes_stream: S, settings: StreamSettings) -> crate::ai_sdk_core::PartStream
where
    S: Stream<Item = Result<Bytes, SdkError>> + Send + 'static,
{
    Box::pin(try_stream! {
        yield v2t::StreamPart::StreamStart { warnings: settings.warnings.clone() };
        let mut decoder = SseDecoder::new();
        let mut usage = v2t::Usage::default();
        let mut finish_reason = v2t::FinishReason::Unknown;
        let mut first_chunk = true;
        let mut chat_state = ChatState::default();
        let mut halted = false;

        macro_rules! handle_sse_event {
            ($ev:expr) => {{
                let ev = $ev;
                if ev.is_done() {
                    halted = true;
                    break;
                }

                let val: JsonValue = match serde_json::from_slice(&ev.data) {
                    Ok(v) => v,
                    Err(err) => {
                        tracing::debug!(target: "ai_sdk::sarvam", error = %err, "invalid json chunk");
                        finish_reason = v2t::FinishReason::Error;
                        yield v2t::StreamPart::Error {
                            error: json!({"message": format!("invalid json chunk: {err}")}),
                        };
                        continue;
                    }
                };

                if settings.include_raw {
                    yield v2t::StreamPart::Raw { raw_value: val.clone() };
                }

                let chunk = match serde_json::from_value::<SarvamStreamEvent>(val) {
                    Ok(SarvamStreamEvent::Chunk(chunk)) => chunk,
                    Ok(SarvamStreamEvent::Error(err)) => {
                        finish_reason = v2t::FinishReason::Error;
                        yield v2t::StreamPart::Error { error: err.to_part_value() };
                        continue;
                    }
                    Err(err) => {
                        tracing::debug!(target: "ai_sdk::sarvam", error = %err, "unexpected chunk shape");
                        finish_reason = v2t::FinishReason::Error;
                        yield v2t::StreamPart::Error {
                            error: json!({"message": format!("invalid chunk: {err}")}),
                        };
                        continue;
                    }
                };

                if first_chunk {
                    first_chunk = false;
                    yield v2t::StreamPart::ResponseMetadata {
                        meta: response_metadata_from_chunk(&chunk),
                    };
                }

                update_usage(&mut usage, &chunk);

                match handle_chat_delta(&chunk, &mut chat_state, &mut finish_reason) {
                    Ok(parts) => {
                        for part in parts {
                            yield part;
                        }
                    }
                    Err(err) => {
                        finish_reason = v2t::FinishReason::Error;
                        yield err.into_part();
                        halted = true;
                        break;
                    }
                }
            }};
        }

        futures_util::pin_mut!(bytes_stream);
        while let Some(chunk_res) = bytes_stream.next().await {
            let chunk = match chunk_res {
                Ok(b) => b,
                Err(err) => {
                    finish_reason = v2t::FinishReason::Error;
                    yield v2t::StreamPart::Error { error: json!({"message": err.to_string()}) };
                    halted = true;
                    break;
                }
            };

            for ev in decoder.push(&chunk) {
                handle_sse_event!(ev);
            }
            if halted {
                break;
            }
        }

        if !halted {
            for ev in decoder.finish() {
                handle_sse_event!(ev);
            }
        }

        for part in emit_finish(&chat_state, usage, finish_reason) {
            yield part;
        }
    })
}

fn response_metadata_from_chunk(chunk: &SarvamChatChunk) -> v2t::ResponseMetadata {
    v2t::ResponseMetadata {
        id: chunk.id.clone(),
        timestamp_ms: chunk.created.map(|t| t.saturating_mul(1000)),
        model_id: chunk.model.clone(),
    }
}

fn update_usage(usage: &mut v2t::Usage, chunk: &SarvamChatChunk) {
    let sources = [
        chunk.x_sarvam.as_ref().and_then(|x| x.usage.as_ref()),
        chunk.usage.as_ref(),
    ];
    for u in sources.into_iter().flatten() {
        *usage = from_prompt_completion(u);
    }
}

fn handle_chat_delta(
    chunk: &SarvamChatChunk,
    state: &mut ChatState,
    finish_reason: &mut v2t::FinishReason,
) -> Result<Vec<v2t::StreamPart>, ToolDeltaError> {
    let mut parts = Vec::new();
    let Some(choice) = chunk.choices.first() else {
        return Ok(parts);
    };
    if let Some(reason) = choice.finish_reason.as_deref() {
        *finish_reason = map_sarvam_finish_reason(Some(reason));
    }
    let Some(delta) = &choice.delta else {
        return Ok(parts);
    };

    if let Some(reasoning) = delta.reasoning.as_deref().filter(|r| !r.is_empty()) {
        if !state.is_active_reasoning {
            state.is_active_reasoning = true;
            parts.push(v2t::StreamPart::ReasoningStart {
                id: REASONING_ID.into(),
            });
        }
        parts.push(v2t::StreamPart::ReasoningDelta {
            id: REASONING_ID.into(),
            delta: reasoning.to_string(),
        });
    }

    if let Some(content) = delta.content.as_deref().filter(|c| !c.is_empty()) {
        if !state.is_active_text {
            state.is_active_text = true;
            parts.push(v2t::StreamPart::TextStart { id: TEXT_ID.into() });
        }
        parts.push(v2t::StreamPart::TextDelta {
            id: TEXT_ID.into(),
            delta: content.to_string(),
        });
    }

    for tc in delta.tool_calls.iter().flatten() {
        handle_tool_call_delta(tc, state, &mut parts)?;
    }

    Ok(parts)
}

fn handle_tool_call_delta(
    tc: &SarvamToolCallDelta,
    state: &mut ChatState,
    parts: &mut Vec<v2t::StreamPart>,
) -> Result<(), ToolDeltaError> {
    let index = tc.index;
    let fragment = tc.function.as_ref().and_then(|f| f.arguments.as_deref());

    match state.tool_calls.get_mut(&index) {
        None => {
            if tc.r#type.as_deref() != Some("function") {
                return Err(ToolDeltaError {
                    message: "Expected 'function' type.",
                    index,
                });
            }
            let id = tc.id.clone().ok_or(ToolDeltaError {
                message: "Expected 'id' to be a string.",
                index,
            })?;
            let name = tc
                .function
                .as_ref()
                .and_then(|f| f.name.clone())
                .ok_or(ToolDeltaError {
                    message: "Expected 'function.name' to be a string.",
                    index,
                })?;
            let args = fragment.unwrap_or_default().to_string();
            if !args.is_empty() {
                parts.push(v2t::StreamPart::ToolInputDelta {
                    id: id.clone(),
                    delta: args.clone(),
                });
            }
            let call = ToolCallState {
                finished: is_parsable_json(&args),
                id,
                name,
                args,
            };
            if call.finished {
                parts.push(call.to_call());
            }
            state.tool_calls.insert(index, call);
        }
        Some(call) if call.finished => {}
        Some(call) => {
            if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
                call.args.push_str(fragment);
                parts.push(v2t::StreamPart::ToolInputDelta {
                    id: call.id.clone(),
                    delta: fragment.to_string(),
                });
                if is_parsable_json(&call.args) {
                    call.finished = true;
                    parts.push(call.to_call());
                }
            }
        }
    }
    Ok(())
}

fn emit_finish(
    state: &ChatState,
    usage: v2t::Usage,
    finish_reason: v2t::FinishReason,
) -> Vec<v2t::StreamPart> {
    let mut parts = Vec::new();
    if state.is_active_reasoning {
        parts.push(v2t::StreamPart::ReasoningEnd {
            id: REASONING_ID.into(),
        });
    }
    if state.is_active_text {
        parts.push(v2t::StreamPart::TextEnd { id: TEXT_ID.into() });
    }
    parts.push(v2t::StreamPart::Finish {
        usage,
        finish_reason,
        provider_metadata: None,
    });
    parts
}

/// POST a streaming chat request and wrap the response in a part stream.
pub async fn start_streaming<T: HttpTransport + Send + Sync>(
    http: &T,
    url: String,
    mut headers: Vec<(String, String)>,
    mut body: JsonValue,
    transport_cfg: &TransportConfig,
    settings: StreamSettings,
) -> Result<StreamResponse, SdkError> {
    if let Some(map) = body.as_object_mut() {
        map.insert("stream".into(), JsonValue::Bool(true));
    }

    if !headers
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case("content-type"))
    {
        headers.push(("content-type".into(), "application/json".into()));
    }

    let resp = http
        .post_json_stream(&url, &headers, &body, transport_cfg)
        .await
        .map_err(map_transport_error_to_sdk_error)?;

    let (bytes_stream, resp_headers) = <T as HttpTransport>::into_stream(resp);
    let headers_map: HashMap<String, String> = resp_headers.into_iter().collect();

    let mapped_stream = bytes_stream.map(|res| res.map_err(map_transport_error_to_sdk_error));
    let part_stream = build_stream(mapped_stream, settings);
    Ok(StreamResponse {
        stream: part_stream,
        request_body: Some(body),
        response_headers: Some(headers_map),
    })
}
