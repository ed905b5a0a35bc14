//! Request helpers shared by the single-shot Sarvam models.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::ai_sdk_core::transport::{HttpTransport, MultipartForm};
use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2 as v2t;

use crate::provider_sarvam::config::SarvamConfig;
use crate::provider_sarvam::error::map_transport_error_to_sdk_error;

/// POST a JSON body and return the parsed response with its headers.
pub(crate) async fn post_json<T: HttpTransport>(
    http: &T,
    config: &SarvamConfig,
    url: &str,
    call_headers: &HashMap<String, String>,
    body: &JsonValue,
) -> Result<(JsonValue, v2t::Headers), SdkError> {
    let headers = config.request_headers(call_headers, true)?;
    tracing::debug!(target: "ai_sdk::sarvam", %url, "sending json request");
    let (value, resp_headers) = http
        .post_json(url, &headers, body, &config.transport_cfg)
        .await
        .map_err(map_transport_error_to_sdk_error)?;
    Ok((value, resp_headers.into_iter().collect()))
}

/// POST a multipart form and return the parsed response with its headers.
pub(crate) async fn post_multipart<T: HttpTransport>(
    http: &T,
    config: &SarvamConfig,
    url: &str,
    call_headers: &HashMap<String, String>,
    form: &MultipartForm,
) -> Result<(JsonValue, v2t::Headers), SdkError> {
    let headers = config.request_headers(call_headers, false)?;
    tracing::debug!(target: "ai_sdk::sarvam", %url, "sending multipart request");
    let (value, resp_headers) = http
        .post_multipart(url, &headers, form, &config.transport_cfg)
        .await
        .map_err(map_transport_error_to_sdk_error)?;
    Ok((value, resp_headers.into_iter().collect()))
}

/// Decode a response body into its typed shape.
pub(crate) fn decode_response<R: DeserializeOwned>(
    value: &JsonValue,
    what: &str,
) -> Result<R, SdkError> {
    serde_json::from_value::<R>(value.clone()).map_err(|e| {
        SdkError::invalid_response(format!("invalid {what} response: {e}"), Some(value.clone()))
    })
}

/// Collect present entries into provider metadata under `scope`.
pub(crate) fn scoped_metadata<I>(scope: &str, entries: I) -> Option<v2t::ProviderMetadata>
where
    I: IntoIterator<Item = (&'static str, Option<JsonValue>)>,
{
    let inner: HashMap<String, JsonValue> = entries
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
        .collect();
    if inner.is_empty() {
        return None;
    }
    Some(HashMap::from([(scope.to_string(), inner)]))
}

/// Deserialize the `scope` entry of call provider options into a settings
/// struct. Missing scopes yield the default value.
pub(crate) fn scoped_options<R: DeserializeOwned + Default>(
    provider_options: &v2t::ProviderOptions,
    scope: &str,
) -> Result<R, SdkError> {
    let Some(entries) = provider_options.get(scope) else {
        return Ok(R::default());
    };
    let map: serde_json::Map<String, JsonValue> =
        entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    serde_json::from_value(JsonValue::Object(map))
        .map_err(|e| SdkError::invalid_argument(format!("invalid {scope} provider options: {e}")))
}

/// Text of every user message, parts joined by `\n` and messages by `\n`.
pub(crate) fn user_prompt_text(prompt: &[v2t::PromptMessage]) -> String {
    prompt
        .iter()
        .filter_map(|m| match m {
            v2t::PromptMessage::User { content, .. } => Some(
                content
                    .iter()
                    .filter_map(|p| match p {
                        v2t::UserPart::Text { text, .. } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Knobs {
        #[serde(default)]
        with_timestamps: Option<bool>,
    }

    #[test]
    fn user_text_skips_other_roles() {
        let prompt = vec![
            v2t::PromptMessage::system("be brief"),
            v2t::PromptMessage::user_text("namaste"),
            v2t::PromptMessage::assistant_text("hello"),
            v2t::PromptMessage::user_text("kaise ho"),
        ];
        assert_eq!(user_prompt_text(&prompt), "namaste\nkaise ho");
    }

    #[test]
    fn metadata_drops_absent_entries() {
        assert!(scoped_metadata("sarvam", [("request_id", None)]).is_none());
        let meta = scoped_metadata(
            "sarvam",
            [("request_id", Some(json!("r1"))), ("script_code", None)],
        )
        .unwrap();
        assert_eq!(meta["sarvam"].len(), 1);
        assert_eq!(meta["sarvam"]["request_id"], json!("r1"));
    }

    #[test]
    fn scoped_options_default_and_errors() {
        let empty = v2t::ProviderOptions::new();
        assert_eq!(scoped_options::<Knobs>(&empty, "sarvam").unwrap(), Knobs::default());

        let mut opts = v2t::ProviderOptions::new();
        opts.entry("sarvam".into())
            .or_default()
            .insert("with_timestamps".into(), json!("yes"));
        let err = scoped_options::<Knobs>(&opts, "sarvam").unwrap_err();
        assert!(matches!(err, SdkError::InvalidArgument { .. }));
    }
}
