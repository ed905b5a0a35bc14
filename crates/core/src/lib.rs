pub mod error;
pub mod json;
pub mod request_builder {
    pub mod defaults;
}
pub mod speech;
pub mod transcription;
pub mod transport;
pub mod v2;

pub use crate::core::error::{SdkError, TransportError};
pub use crate::core::speech::{SpeechModel, SpeechResponse};
pub use crate::core::transcription::{
    ModelResponseMeta, TranscriptionModel, TranscriptionResponse,
};

pub use crate::core::v2::{GenerateResponse, LanguageModel, PartStream, StreamResponse};
pub use crate::ai_sdk_types::speech::SpeechOptions;
pub use crate::ai_sdk_types::transcription::{
    AudioData, TranscriptionOptions, TranscriptionSegment,
};
pub use crate::ai_sdk_types::v2 as types;

#[cfg(test)]
#[path = "../tests/json_tests.rs"]
mod json_tests;
#[cfg(test)]
#[path = "../tests/request_builder_defaults_tests.rs"]
mod request_builder_defaults_tests;
