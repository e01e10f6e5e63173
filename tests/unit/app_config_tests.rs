/*!
 * Tests for configuration loading and driver identities
 */

use reelforge::app_config::{Config, ImageDriver, TextDriver, VoiceDriver};

use crate::common;

#[test]
fn test_config_default_shouldUseDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.storage_root.to_string_lossy(), "videos");
    assert_eq!(config.text.driver, TextDriver::Gemini);
    assert_eq!(config.image.driver, ImageDriver::Replicate);
    assert_eq!(config.voice.driver, VoiceDriver::ElevenLabs);
    assert!(config.image.use_backups);
    assert_eq!(config.image.max_attempts, 2);
    assert_eq!(config.image.retry_delay_secs, 120);
    assert_eq!(config.renderer.timeout_secs, 18000);
}

#[test]
fn test_config_loadOrDefault_withMissingFile_shouldReturnDefaults() {
    let config = Config::load_or_default("nonexistent_config_file.json").unwrap();
    assert_eq!(config.image.max_attempts, 2);
    assert_eq!(config.text.driver, TextDriver::Gemini);
}

#[test]
fn test_config_loadOrDefault_withPartialFile_shouldFillMissingFields() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{"image": {"driver": "pollinations", "use_backups": false}}"#,
    )
    .unwrap();

    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.image.driver, ImageDriver::Pollinations);
    assert!(!config.image.use_backups);
    // Untouched sections keep their defaults
    assert_eq!(config.image.max_attempts, 2);
    assert_eq!(config.voice.driver, VoiceDriver::ElevenLabs);
}

#[test]
fn test_config_loadOrDefault_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "not json at all").unwrap();

    assert!(Config::load_or_default(&path).is_err());
}

#[test]
fn test_textDriver_fromName_withUnknownName_shouldReturnDefault() {
    assert_eq!(TextDriver::from_name("not-a-driver"), TextDriver::Gemini);
    assert_eq!(TextDriver::from_name(""), TextDriver::Gemini);
}

#[test]
fn test_textDriver_fromName_withKnownNames_shouldResolve() {
    assert_eq!(TextDriver::from_name("groq"), TextDriver::Groq);
    assert_eq!(TextDriver::from_name("GROQ"), TextDriver::Groq);
    assert_eq!(TextDriver::from_name("chatgpt"), TextDriver::ChatGpt);
    assert_eq!(TextDriver::from_name("openai"), TextDriver::ChatGpt);
    assert_eq!(
        TextDriver::from_name("pollinations"),
        TextDriver::Pollinations
    );
}

#[test]
fn test_imageDriver_fromName_withAliases_shouldResolve() {
    assert_eq!(ImageDriver::from_name("dalle"), ImageDriver::OpenAi);
    assert_eq!(ImageDriver::from_name("chatgpt"), ImageDriver::OpenAi);
    assert_eq!(ImageDriver::from_name("gemini"), ImageDriver::Gemini);
    assert_eq!(ImageDriver::from_name("anything"), ImageDriver::Replicate);
}

#[test]
fn test_voiceDriver_fromName_withUnknownName_shouldReturnDefault() {
    assert_eq!(VoiceDriver::from_name("unknown"), VoiceDriver::ElevenLabs);
    assert_eq!(VoiceDriver::from_name("groq"), VoiceDriver::Groq);
}

#[test]
fn test_drivers_display_shouldBeLowercase() {
    assert_eq!(TextDriver::ChatGpt.to_string(), "chatgpt");
    assert_eq!(ImageDriver::OpenAi.to_string(), "openai");
    assert_eq!(VoiceDriver::ElevenLabs.to_string(), "elevenlabs");
}

#[test]
fn test_fallbackOrder_shouldStartWithDefaultDriver() {
    assert_eq!(TextDriver::fallback_order()[0], TextDriver::Gemini);
    assert_eq!(ImageDriver::fallback_order()[0], ImageDriver::Replicate);
    assert_eq!(VoiceDriver::fallback_order()[0], VoiceDriver::ElevenLabs);
}
