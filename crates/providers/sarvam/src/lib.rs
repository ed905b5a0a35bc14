//! Sarvam AI provider: chat, translation, transliteration, language
//! identification, transcription, speech translation and speech synthesis.

pub mod api_types;
pub mod config;
pub mod error;
pub mod provider;
mod request;
pub mod chat {
    pub mod convert;
    pub mod finish_reason;
    pub mod language_model;
    pub mod options;
    pub mod prepare_tools;
    pub mod simulate;
    pub mod stream;
}
pub mod lid;
pub mod speech;
pub mod speech_translation;
pub mod transcription;
pub mod translation;
pub mod transliterate;

pub use chat::language_model::SarvamChatLanguageModel;
pub use chat::options::{ReasoningFormat, SarvamChatSettings, SimulateMode};
pub use config::{resolve_api_key, SarvamConfig, SarvamLanguageCode, SarvamScriptCode};
pub use lid::SarvamLidModel;
pub use provider::{
    create_sarvam, create_sarvam_with_transport, SarvamProvider, SarvamProviderSettings,
};
pub use speech::{SarvamSpeaker, SarvamSpeechModel, SarvamSpeechSettings};
pub use speech_translation::SarvamSpeechTranslationModel;
pub use transcription::{SarvamTranscriptionModel, SarvamTranscriptionSettings};
pub use translation::{
    NumeralsFormat, OutputScript, SarvamTranslationModel, SarvamTranslationSettings,
    SpeakerGender, TranslationMode,
};
pub use transliterate::{
    SarvamTransliterateModel, SarvamTransliterateSettings, SpokenFormNumeralsLanguage,
};

#[cfg(test)]
#[path = "../tests/support.rs"]
mod support;

#[cfg(test)]
#[path = "../tests/stream_tests.rs"]
mod stream_tests;

#[cfg(test)]
#[path = "../tests/chat_language_model_tests.rs"]
mod chat_language_model_tests;

#[cfg(test)]
#[path = "../tests/chat_convert_tests.rs"]
mod chat_convert_tests;

#[cfg(test)]
#[path = "../tests/prepare_tools_tests.rs"]
mod prepare_tools_tests;

#[cfg(test)]
#[path = "../tests/simulate_tests.rs"]
mod simulate_tests;

#[cfg(test)]
#[path = "../tests/text_models_tests.rs"]
mod text_models_tests;

#[cfg(test)]
#[path = "../tests/audio_models_tests.rs"]
mod audio_models_tests;

#[cfg(test)]
#[path = "../tests/provider_tests.rs"]
mod provider_tests;
