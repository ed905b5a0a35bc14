//! Provider defaults for call options.
//!
//! Explicit call options always win. Configured defaults only fill keys that
//! are missing under the exact provider scope; nested objects are merged key
//! by key. Other scopes are never touched.

use std::collections::HashMap;

use crate::ai_sdk_types::speech::SpeechOptions;
use crate::ai_sdk_types::transcription::TranscriptionOptions;
use crate::ai_sdk_types::v2 as v2t;
use serde_json::Value as JsonValue;

fn merge_json_defaults(target: &mut JsonValue, defaults: &JsonValue) {
    if let (JsonValue::Object(target_map), JsonValue::Object(defaults_map)) = (target, defaults) {
        for (k, v) in defaults_map {
            match target_map.get_mut(k) {
                Some(existing) => merge_json_defaults(existing, v),
                None => {
                    target_map.insert(k.clone(), v.clone());
                }
            }
        }
    }
}

fn merge_scope_defaults(
    target: &mut v2t::ProviderOptions,
    provider_scope: &str,
    defaults: &HashMap<String, JsonValue>,
) {
    let entry = target.entry(provider_scope.to_string()).or_default();
    for (key, val) in defaults {
        match entry.get_mut(key) {
            Some(existing) => merge_json_defaults(existing, val),
            None => {
                entry.insert(key.clone(), val.clone());
            }
        }
    }
}

/// Fill `target` with the defaults configured for `provider_scope`.
pub fn apply_provider_defaults(
    target: &mut v2t::ProviderOptions,
    provider_scope: &str,
    config_defaults: Option<&v2t::ProviderOptions>,
) {
    let Some(scope_defaults) = config_defaults.and_then(|d| d.get(provider_scope)) else {
        return;
    };
    if scope_defaults.is_empty() {
        return;
    }
    merge_scope_defaults(target, provider_scope, scope_defaults);
}

/// Merge config defaults into language model call options.
pub fn build_call_options(
    mut opts: v2t::CallOptions,
    provider_scope: &str,
    config_defaults: Option<&v2t::ProviderOptions>,
) -> v2t::CallOptions {
    apply_provider_defaults(&mut opts.provider_options, provider_scope, config_defaults);
    opts
}

/// Merge config defaults into transcription options.
pub fn build_transcription_options(
    mut opts: TranscriptionOptions,
    provider_scope: &str,
    config_defaults: Option<&v2t::ProviderOptions>,
) -> TranscriptionOptions {
    apply_provider_defaults(&mut opts.provider_options, provider_scope, config_defaults);
    opts
}

/// Merge config defaults into speech options.
pub fn build_speech_options(
    mut opts: SpeechOptions,
    provider_scope: &str,
    config_defaults: Option<&v2t::ProviderOptions>,
) -> SpeechOptions {
    apply_provider_defaults(&mut opts.provider_options, provider_scope, config_defaults);
    opts
}
