use std::sync::Mutex;

use crate::ai_sdk_core::{LanguageModel, SdkError, SpeechModel, TranscriptionModel};
use crate::ai_sdk_types::v2 as v2t;
use serde_json::json;

use crate::provider_sarvam::config::{resolve_api_key, SarvamLanguageCode, DEFAULT_BASE_URL};
use crate::provider_sarvam::provider::{create_sarvam, create_sarvam_with_transport, SarvamProviderSettings};
use crate::provider_sarvam::support::TestTransport;
use crate::provider_sarvam::{
    SarvamChatSettings, SarvamSpeechSettings, SarvamTranscriptionSettings,
    SarvamTranslationSettings, SarvamTransliterateSettings,
};

// Serialises tests that touch SARVAM_API_KEY.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn with_key(base_url: Option<&str>) -> SarvamProviderSettings {
    SarvamProviderSettings {
        base_url: base_url.map(str::to_string),
        api_key: Some("sk-provider".into()),
        ..Default::default()
    }
}

#[test]
fn base_url_defaults_and_loses_trailing_slash() {
    let provider = create_sarvam_with_transport(with_key(None), TestTransport::new());
    assert_eq!(provider.config().base_url, DEFAULT_BASE_URL);

    let provider =
        create_sarvam_with_transport(with_key(Some("https://proxy.test/sarvam/")), TestTransport::new());
    assert_eq!(provider.config().base_url, "https://proxy.test/sarvam");
    assert_eq!(
        provider.config().chat_endpoint("/chat/completions"),
        "https://proxy.test/sarvam/v1/chat/completions"
    );
    assert_eq!(
        provider.config().endpoint("/translate"),
        "https://proxy.test/sarvam/translate"
    );
    assert_eq!(provider.config().provider_scope_name, "sarvam");
}

#[test]
fn reqwest_provider_builds_with_defaults() {
    let provider = create_sarvam(SarvamProviderSettings::default());
    assert_eq!(provider.config().base_url, DEFAULT_BASE_URL);
    let model = provider.chat("sarvam-m", SarvamChatSettings::default());
    assert_eq!(model.model_id(), "sarvam-m");
}

#[test]
fn factory_hands_out_every_model_kind() {
    let provider = create_sarvam_with_transport(with_key(None), TestTransport::new());

    let chat = provider.language_model("sarvam-m", SarvamChatSettings::default());
    assert_eq!((chat.provider_name(), chat.model_id()), ("sarvam.chat", "sarvam-m"));

    let alias = provider.chat(
        "sarvam-m",
        SarvamChatSettings {
            download_images: true,
            ..Default::default()
        },
    );
    assert!(alias.settings().download_images);

    let stt = provider.transcription(
        "saarika:v2",
        Some(SarvamLanguageCode::Tamil),
        SarvamTranscriptionSettings::default(),
    );
    assert_eq!((stt.provider_name(), stt.model_id()), ("sarvam.transcription", "saarika:v2"));

    let stt_translate = provider.speech_translation("saaras:v2");
    assert_eq!(stt_translate.model_id(), "saaras:v2");

    let tts = provider.speech("bulbul:v2", SarvamLanguageCode::Hindi, SarvamSpeechSettings::default());
    assert_eq!((tts.provider_name(), tts.model_id()), ("sarvam.speech", "bulbul:v2"));

    let transliterate = provider.transliterate(SarvamTransliterateSettings::new(SarvamLanguageCode::English));
    assert_eq!(transliterate.provider_name(), "sarvam.transliterate");

    let translation = provider.translation(SarvamTranslationSettings {
        model: Some("sarvam-translate:v1".into()),
        ..SarvamTranslationSettings::new(SarvamLanguageCode::Odia)
    });
    assert_eq!(translation.model_id(), "sarvam-translate:v1");

    let lid = provider.language_identification();
    assert_eq!(lid.provider_name(), "sarvam.lid");
}

#[tokio::test]
async fn models_share_configured_headers_and_transport() {
    let http = TestTransport::new().with_json(json!({"language_code": "hi-IN"}));
    let provider = create_sarvam_with_transport(
        SarvamProviderSettings {
            headers: vec![("X-Team".into(), "voice".into()), ("User-Agent".into(), "app/1.0".into())],
            ..with_key(Some("https://sarvam.test"))
        },
        http.clone(),
    );
    let cloned = provider.clone();
    let lid = cloned.language_identification();

    let mut options = v2t::CallOptions::new(vec![v2t::PromptMessage::user_text("नमस्ते")]);
    options.headers.insert("X-Request".into(), "42".into());
    lid.do_generate(options).await.unwrap();

    let req = http.last_request();
    assert_eq!(req.url, "https://sarvam.test/text-lid");
    assert_eq!(req.header("authorization"), Some("Bearer sk-provider"));
    assert_eq!(req.header("x-team"), Some("voice"));
    assert_eq!(req.header("x-request"), Some("42"));
    let ua = req.header("user-agent").unwrap();
    assert!(ua.starts_with("app/1.0 ai-sdk/sarvam/"), "{ua}");
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let saved = std::env::var("SARVAM_API_KEY").ok();
    std::env::remove_var("SARVAM_API_KEY");

    let http = TestTransport::new();
    let provider = create_sarvam_with_transport(SarvamProviderSettings::default(), http.clone());
    let err = provider
        .language_identification()
        .do_generate(v2t::CallOptions::new(vec![v2t::PromptMessage::user_text("x")]))
        .await
        .unwrap_err();

    if let Some(v) = saved {
        std::env::set_var("SARVAM_API_KEY", v);
    }

    match err {
        SdkError::InvalidArgument { message } => {
            assert!(message.contains("api_key"), "{message}");
            assert!(message.contains("SARVAM_API_KEY"), "{message}");
        }
        other => panic!("expected invalid argument, got {other:?}"),
    }
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn api_key_falls_back_to_environment() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let saved = std::env::var("SARVAM_API_KEY").ok();
    std::env::set_var("SARVAM_API_KEY", "sk-env");

    let http = TestTransport::new().with_json(json!({"audios": ["AAAA"]}));
    let provider = create_sarvam_with_transport(SarvamProviderSettings::default(), http.clone());
    let result = provider
        .speech("bulbul:v2", SarvamLanguageCode::Hindi, SarvamSpeechSettings::default())
        .do_generate(crate::ai_sdk_core::SpeechOptions::new("hi"))
        .await;

    match saved {
        Some(v) => std::env::set_var("SARVAM_API_KEY", v),
        None => std::env::remove_var("SARVAM_API_KEY"),
    }

    result.unwrap();
    assert_eq!(http.last_request().header("api-subscription-key"), Some("sk-env"));
}

#[test]
fn explicit_key_wins_and_blank_counts_as_missing() {
    assert_eq!(resolve_api_key(Some("a"), Some("b")).unwrap(), "a");
    assert_eq!(resolve_api_key(Some("  "), Some("b")).unwrap(), "b");
    assert_eq!(resolve_api_key(None, Some("b")).unwrap(), "b");
    assert!(matches!(
        resolve_api_key(None, Some("")),
        Err(SdkError::InvalidArgument { .. })
    ));
}
