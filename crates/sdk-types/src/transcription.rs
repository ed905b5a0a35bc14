use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::v2::{headers_is_empty, provider_options_is_empty, ProviderOptions};

/// Audio payload handed to a transcription model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AudioData {
    Base64(String),
    Bytes {
        #[serde(with = "serde_bytes")]
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionOptions {
    pub audio: AudioData,
    /// IANA media type of the audio, e.g. `audio/wav`.
    #[serde(rename = "mediaType")]
    pub media_type: String,
    #[serde(default, skip_serializing_if = "headers_is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(
        default,
        skip_serializing_if = "provider_options_is_empty",
        rename = "providerOptions"
    )]
    pub provider_options: ProviderOptions,
}

impl TranscriptionOptions {
    pub fn new(audio: AudioData, media_type: impl Into<String>) -> Self {
        Self {
            audio,
            media_type: media_type.into(),
            headers: HashMap::new(),
            provider_options: ProviderOptions::new(),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self::new(AudioData::Bytes { bytes }, media_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionSegment {
    pub text: String,
    #[serde(rename = "startSecond")]
    pub start_second: f64,
    #[serde(rename = "endSecond")]
    pub end_second: f64,
}
