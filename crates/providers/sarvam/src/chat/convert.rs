use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::ai_sdk_core::transport::{HttpTransport, TransportConfig};
use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::api_types::{
    SarvamContentPart, SarvamFunctionCall, SarvamImageUrl, SarvamMessage, SarvamMessageToolCall,
    SarvamUserContent,
};
use crate::provider_sarvam::error::map_transport_error_to_sdk_error;

/// Transport used to inline remote images, when the model is configured to.
pub struct ImageDownloader<'a, T: HttpTransport> {
    pub http: &'a T,
    pub transport_cfg: &'a TransportConfig,
}

fn data_url(media_type: &str, base64: &str) -> String {
    format!("data:{media_type};base64,{base64}")
}

fn concrete_image_type(media_type: &str) -> &str {
    if media_type == "image/*" {
        "image/jpeg"
    } else {
        media_type
    }
}

async fn image_url<T: HttpTransport>(
    data: &v2t::DataContent,
    media_type: &str,
    downloader: Option<&ImageDownloader<'_, T>>,
) -> Result<String, SdkError> {
    match data {
        v2t::DataContent::Base64 { base64 } => Ok(data_url(concrete_image_type(media_type), base64)),
        v2t::DataContent::Bytes { bytes } => Ok(data_url(
            concrete_image_type(media_type),
            &B64.encode(bytes),
        )),
        v2t::DataContent::Url { url } => {
            let Some(dl) = downloader else {
                return Ok(url.clone());
            };
            let (bytes, headers) = dl
                .http
                .get_bytes(url, &[], dl.transport_cfg)
                .await
                .map_err(map_transport_error_to_sdk_error)?;
            let fetched_type = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                .map(|(_, v)| v.as_str())
                .filter(|v| v.starts_with("image/"));
            let media_type = if media_type == "image/*" {
                fetched_type.unwrap_or("image/jpeg")
            } else {
                media_type
            };
            Ok(data_url(media_type, &B64.encode(&bytes)))
        }
    }
}

fn tool_output_text(output: &v2t::ToolResultOutput) -> String {
    match output {
        v2t::ToolResultOutput::Text { value } | v2t::ToolResultOutput::ErrorText { value } => {
            value.clone()
        }
        v2t::ToolResultOutput::Json { value } | v2t::ToolResultOutput::ErrorJson { value } => {
            value.to_string()
        }
        v2t::ToolResultOutput::Content { value } => {
            serde_json::to_value(value).map(|v| v.to_string()).unwrap_or_default()
        }
    }
}

/// Convert an SDK prompt into Sarvam chat messages.
///
/// `extra_system_prompt` becomes a leading system message. Text-only user
/// messages collapse into a single string; messages with images keep their
/// parts. Assistant reasoning is not sent back.
pub async fn convert_to_sarvam_chat_messages<T: HttpTransport>(
    prompt: &v2t::Prompt,
    extra_system_prompt: Option<&str>,
    downloader: Option<&ImageDownloader<'_, T>>,
) -> Result<Vec<SarvamMessage>, SdkError> {
    let mut messages = Vec::with_capacity(prompt.len() + 1);
    if let Some(extra) = extra_system_prompt {
        messages.push(SarvamMessage::System {
            content: extra.to_string(),
        });
    }

    for message in prompt {
        match message {
            v2t::PromptMessage::System { content, .. } => {
                messages.push(SarvamMessage::System {
                    content: content.clone(),
                });
            }
            v2t::PromptMessage::User { content, .. } => {
                let text_only = content
                    .iter()
                    .all(|p| matches!(p, v2t::UserPart::Text { .. }));
                if text_only {
                    let text = content
                        .iter()
                        .filter_map(|p| match p {
                            v2t::UserPart::Text { text, .. } => Some(text.as_str()),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    messages.push(SarvamMessage::User {
                        content: SarvamUserContent::Text(text),
                    });
                    continue;
                }

                let mut parts = Vec::with_capacity(content.len());
                for part in content {
                    match part {
                        v2t::UserPart::Text { text, .. } => {
                            parts.push(SarvamContentPart::Text { text: text.clone() })
                        }
                        v2t::UserPart::File {
                            data, media_type, ..
                        } if media_type.starts_with("image/") => {
                            let url = image_url(data, media_type, downloader).await?;
                            parts.push(SarvamContentPart::ImageUrl {
                                image_url: SarvamImageUrl { url },
                            });
                        }
                        v2t::UserPart::File { media_type, .. } => {
                            return Err(SdkError::unsupported(format!(
                                "file part media type {media_type}"
                            )));
                        }
                    }
                }
                messages.push(SarvamMessage::User {
                    content: SarvamUserContent::Parts(parts),
                });
            }
            v2t::PromptMessage::Assistant { content, .. } => {
                let mut text = String::new();
                let mut tool_calls = Vec::new();
                for part in content {
                    match part {
                        v2t::AssistantPart::Text { text: t, .. } => text.push_str(t),
                        v2t::AssistantPart::ToolCall(tc) => {
                            tool_calls.push(SarvamMessageToolCall::Function {
                                id: tc.tool_call_id.clone(),
                                function: SarvamFunctionCall {
                                    name: tc.tool_name.clone(),
                                    arguments: tc.input.clone(),
                                },
                            })
                        }
                        v2t::AssistantPart::Reasoning { .. } | v2t::AssistantPart::ToolResult(_) => {}
                    }
                }
                messages.push(SarvamMessage::Assistant {
                    content: (!text.is_empty()).then_some(text),
                    tool_calls,
                });
            }
            v2t::PromptMessage::Tool { content, .. } => {
                for result in content {
                    messages.push(SarvamMessage::Tool {
                        content: tool_output_text(&result.output),
                        tool_call_id: result.tool_call_id.clone(),
                    });
                }
            }
        }
    }
    Ok(messages)
}
