use std::sync::Arc;

use crate::ai_sdk_core::transport::{HttpTransport, TransportConfig};
use crate::ai_sdk_types::v2 as v2t;
use crate::reqwest_transport::ReqwestTransport;

use crate::provider_sarvam::chat::language_model::SarvamChatLanguageModel;
use crate::provider_sarvam::chat::options::SarvamChatSettings;
use crate::provider_sarvam::config::{SarvamConfig, SarvamLanguageCode, DEFAULT_BASE_URL};
use crate::provider_sarvam::lid::SarvamLidModel;
use crate::provider_sarvam::speech::{SarvamSpeechModel, SarvamSpeechSettings};
use crate::provider_sarvam::speech_translation::SarvamSpeechTranslationModel;
use crate::provider_sarvam::transcription::{
    SarvamTranscriptionModel, SarvamTranscriptionSettings,
};
use crate::provider_sarvam::translation::{SarvamTranslationModel, SarvamTranslationSettings};
use crate::provider_sarvam::transliterate::{SarvamTransliterateModel, SarvamTransliterateSettings};

/// Settings for [`create_sarvam`].
#[derive(Debug, Clone, Default)]
pub struct SarvamProviderSettings {
    /// Defaults to `https://api.sarvam.ai`.
    pub base_url: Option<String>,
    /// Falls back to `SARVAM_API_KEY` when unset.
    pub api_key: Option<String>,
    pub headers: Vec<(String, String)>,
    pub transport: TransportConfig,
    /// Defaults merged into every call's `providerOptions`.
    pub default_options: Option<v2t::ProviderOptions>,
}

impl SarvamProviderSettings {
    fn into_config(self) -> SarvamConfig {
        let base_url = self
            .base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string();
        SarvamConfig {
            provider_scope_name: "sarvam".into(),
            base_url,
            api_key: self.api_key,
            headers: self.headers,
            transport_cfg: self.transport,
            default_options: self.default_options,
        }
    }
}

/// Factory for every Sarvam model. Cheap to clone; models share the config.
#[derive(Clone)]
pub struct SarvamProvider<T: HttpTransport = ReqwestTransport> {
    config: Arc<SarvamConfig>,
    http: T,
}

pub fn create_sarvam(settings: SarvamProviderSettings) -> SarvamProvider<ReqwestTransport> {
    let http = ReqwestTransport::new(&settings.transport);
    create_sarvam_with_transport(settings, http)
}

pub fn create_sarvam_with_transport<T: HttpTransport + Clone>(
    settings: SarvamProviderSettings,
    http: T,
) -> SarvamProvider<T> {
    SarvamProvider {
        config: Arc::new(settings.into_config()),
        http,
    }
}

impl<T: HttpTransport + Clone> SarvamProvider<T> {
    pub fn config(&self) -> &SarvamConfig {
        &self.config
    }

    pub fn language_model(
        &self,
        model_id: impl Into<String>,
        settings: SarvamChatSettings,
    ) -> SarvamChatLanguageModel<T> {
        SarvamChatLanguageModel::new(model_id, settings, self.config.clone(), self.http.clone())
    }

    /// Alias of [`SarvamProvider::language_model`].
    pub fn chat(
        &self,
        model_id: impl Into<String>,
        settings: SarvamChatSettings,
    ) -> SarvamChatLanguageModel<T> {
        self.language_model(model_id, settings)
    }

    pub fn transcription(
        &self,
        model_id: impl Into<String>,
        language: Option<SarvamLanguageCode>,
        settings: SarvamTranscriptionSettings,
    ) -> SarvamTranscriptionModel<T> {
        SarvamTranscriptionModel::new(
            model_id,
            language,
            settings,
            self.config.clone(),
            self.http.clone(),
        )
    }

    pub fn speech_translation(
        &self,
        model_id: impl Into<String>,
    ) -> SarvamSpeechTranslationModel<T> {
        SarvamSpeechTranslationModel::new(model_id, self.config.clone(), self.http.clone())
    }

    pub fn speech(
        &self,
        model_id: impl Into<String>,
        language: SarvamLanguageCode,
        settings: SarvamSpeechSettings,
    ) -> SarvamSpeechModel<T> {
        SarvamSpeechModel::new(
            model_id,
            language,
            settings,
            self.config.clone(),
            self.http.clone(),
        )
    }

    pub fn transliterate(&self, settings: SarvamTransliterateSettings) -> SarvamTransliterateModel<T> {
        SarvamTransliterateModel::new(settings, self.config.clone(), self.http.clone())
    }

    pub fn translation(&self, settings: SarvamTranslationSettings) -> SarvamTranslationModel<T> {
        SarvamTranslationModel::new(settings, self.config.clone(), self.http.clone())
    }

    pub fn language_identification(&self) -> SarvamLidModel<T> {
        SarvamLidModel::new(self.config.clone(), self.http.clone())
    }
}
