use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::ai_sdk_core::transport::TransportConfig;
use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::v2 as v2t;

pub const DEFAULT_BASE_URL: &str = "https://api.sarvam.ai";
pub const API_KEY_ENV_VAR: &str = "SARVAM_API_KEY";

/// Languages accepted by the Sarvam text and speech endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SarvamLanguageCode {
    #[serde(rename = "hi-IN")]
    Hindi,
    #[serde(rename = "bn-IN")]
    Bengali,
    #[serde(rename = "kn-IN")]
    Kannada,
    #[serde(rename = "ml-IN")]
    Malayalam,
    #[serde(rename = "mr-IN")]
    Marathi,
    #[serde(rename = "od-IN")]
    Odia,
    #[serde(rename = "pa-IN")]
    Punjabi,
    #[serde(rename = "ta-IN")]
    Tamil,
    #[serde(rename = "te-IN")]
    Telugu,
    #[serde(rename = "en-IN")]
    English,
    #[serde(rename = "gu-IN")]
    Gujarati,
}

impl SarvamLanguageCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SarvamLanguageCode::Hindi => "hi-IN",
            SarvamLanguageCode::Bengali => "bn-IN",
            SarvamLanguageCode::Kannada => "kn-IN",
            SarvamLanguageCode::Malayalam => "ml-IN",
            SarvamLanguageCode::Marathi => "mr-IN",
            SarvamLanguageCode::Odia => "od-IN",
            SarvamLanguageCode::Punjabi => "pa-IN",
            SarvamLanguageCode::Tamil => "ta-IN",
            SarvamLanguageCode::Telugu => "te-IN",
            SarvamLanguageCode::English => "en-IN",
            SarvamLanguageCode::Gujarati => "gu-IN",
        }
    }
}

/// Writing systems reported by language identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SarvamScriptCode {
    Latn,
    Deva,
    Beng,
    Gujr,
    Knda,
    Mlym,
    Orya,
    Guru,
    Taml,
    Telu,
}

/// Wire code for an optional source language; `None` lets the backend detect it.
pub(crate) fn source_language_code(code: Option<SarvamLanguageCode>) -> &'static str {
    code.map(|c| c.as_str()).unwrap_or("auto")
}

/// Pick the API key from an explicit setting or the environment value.
/// Blank strings count as missing.
pub fn resolve_api_key(explicit: Option<&str>, env_value: Option<&str>) -> Result<String, SdkError> {
    explicit
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env_value.filter(|k| !k.trim().is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            SdkError::invalid_argument(format!(
                "Sarvam API key is missing. Pass it using the `api_key` setting or the {API_KEY_ENV_VAR} environment variable."
            ))
        })
}

fn user_agent_suffix() -> String {
    format!("ai-sdk/sarvam/{}", env!("CARGO_PKG_VERSION"))
}

/// Read-only configuration shared by every model a provider hands out.
#[derive(Debug, Clone)]
pub struct SarvamConfig {
    /// Key under which call provider options and metadata are scoped.
    pub provider_scope_name: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub headers: Vec<(String, String)>,
    pub transport_cfg: TransportConfig,
    pub default_options: Option<v2t::ProviderOptions>,
}

impl Default for SarvamConfig {
    fn default() -> Self {
        Self {
            provider_scope_name: "sarvam".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            headers: Vec::new(),
            transport_cfg: TransportConfig::default(),
            default_options: None,
        }
    }
}

impl SarvamConfig {
    /// URL of a non-chat endpoint, e.g. `/translate`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// URL of a chat endpoint; chat lives under the versioned prefix.
    pub fn chat_endpoint(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Build request headers: auth, then configured headers, then per-call
    /// headers. Later sources replace earlier ones by lower-cased name.
    pub fn request_headers(
        &self,
        call_headers: &HashMap<String, String>,
        json_body: bool,
    ) -> Result<Vec<(String, String)>, SdkError> {
        let env_key = std::env::var(API_KEY_ENV_VAR).ok();
        let key = resolve_api_key(self.api_key.as_deref(), env_key.as_deref())?;

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        headers.insert("authorization".into(), format!("Bearer {key}"));
        headers.insert("api-subscription-key".into(), key);
        if json_body {
            headers.insert("content-type".into(), "application/json".into());
        }
        let configured = self.headers.iter().map(|(k, v)| (k, v));
        for (k, v) in configured.chain(call_headers.iter()) {
            headers.insert(k.to_ascii_lowercase(), v.clone());
        }

        let suffix = user_agent_suffix();
        let user_agent = match headers.remove("user-agent") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {suffix}"),
            _ => suffix,
        };
        headers.insert("user-agent".into(), user_agent);

        Ok(headers.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> SarvamConfig {
        SarvamConfig {
            base_url: "https://example.test/".into(),
            api_key: Some("sk-test".into()),
            ..Default::default()
        }
    }

    #[test]
    fn endpoints_strip_trailing_slash() {
        let cfg = config_with_key();
        assert_eq!(cfg.endpoint("/translate"), "https://example.test/translate");
        assert_eq!(
            cfg.chat_endpoint("/chat/completions"),
            "https://example.test/v1/chat/completions"
        );
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        assert_eq!(resolve_api_key(Some("a"), Some("b")).unwrap(), "a");
        assert_eq!(resolve_api_key(Some("  "), Some("b")).unwrap(), "b");
        let err = resolve_api_key(None, Some("")).unwrap_err();
        match err {
            SdkError::InvalidArgument { message } => {
                assert!(message.contains("api_key"));
                assert!(message.contains(API_KEY_ENV_VAR));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn custom_and_call_headers_override_defaults() {
        let mut cfg = config_with_key();
        cfg.headers = vec![
            ("X-Team".into(), "core".into()),
            ("User-Agent".into(), "app/1.0".into()),
        ];
        let call = HashMap::from([("x-team".to_string(), "edge".to_string())]);
        let headers: HashMap<String, String> =
            cfg.request_headers(&call, true).unwrap().into_iter().collect();

        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert_eq!(headers["api-subscription-key"], "sk-test");
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["x-team"], "edge");
        assert!(headers["user-agent"].starts_with("app/1.0 ai-sdk/sarvam/"));
    }

    #[test]
    fn multipart_requests_leave_content_type_to_transport() {
        let cfg = config_with_key();
        let headers = cfg.request_headers(&HashMap::new(), false).unwrap();
        assert!(!headers.iter().any(|(k, _)| k == "content-type"));
    }

    #[test]
    fn language_codes_serialize_to_wire_form() {
        assert_eq!(
            serde_json::to_value(SarvamLanguageCode::Odia).unwrap(),
            serde_json::json!("od-IN")
        );
        assert_eq!(SarvamLanguageCode::Gujarati.as_str(), "gu-IN");
        assert_eq!(source_language_code(None), "auto");
        let script: SarvamScriptCode = serde_json::from_str("\"Deva\"").unwrap();
        assert_eq!(script, SarvamScriptCode::Deva);
    }
}
