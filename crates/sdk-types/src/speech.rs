use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::v2::{headers_is_empty, provider_options_is_empty, ProviderOptions};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SpeechOptions {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "outputFormat"
    )]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "headers_is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(
        default,
        skip_serializing_if = "provider_options_is_empty",
        rename = "providerOptions"
    )]
    pub provider_options: ProviderOptions,
}

impl SpeechOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}
