/*!
 * Tests for fallback chain construction, router fallback and image retry
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reelforge::app_config::{ImageDriver, TextDriver, VoiceDriver};
use reelforge::errors::RouterError;
use reelforge::providers::mock::{
    call_journal, MockImageGenerator, MockTextGenerator, MockVoiceGenerator,
};
use reelforge::providers::{ImageGenerator, TextGenerator, VoiceGenerator};
use reelforge::routing::build_fallback_chain;
use reelforge::routing::image::{ImageRouter, PLACEHOLDER_PAYLOAD};
use reelforge::routing::text::TextRouter;
use reelforge::routing::voice::VoiceRouter;

use crate::common;

#[test]
fn test_buildFallbackChain_shouldExcludeDefaultDriver() {
    let chain = build_fallback_chain(TextDriver::Gemini, None, &TextDriver::fallback_order());
    assert!(!chain.contains(&TextDriver::Gemini));
    assert_eq!(
        chain,
        vec![TextDriver::Pollinations, TextDriver::ChatGpt, TextDriver::Groq]
    );
}

#[test]
fn test_buildFallbackChain_withExplicitFallback_shouldPutItFirst() {
    let chain = build_fallback_chain(
        TextDriver::Gemini,
        Some(TextDriver::Groq),
        &TextDriver::fallback_order(),
    );
    assert_eq!(chain[0], TextDriver::Groq);
    // Deduplicated: groq appears exactly once
    assert_eq!(chain.iter().filter(|d| **d == TextDriver::Groq).count(), 1);
    assert_eq!(
        chain,
        vec![TextDriver::Groq, TextDriver::Pollinations, TextDriver::ChatGpt]
    );
}

#[test]
fn test_buildFallbackChain_withExplicitEqualToDefault_shouldExcludeIt() {
    let chain = build_fallback_chain(
        TextDriver::Groq,
        Some(TextDriver::Groq),
        &TextDriver::fallback_order(),
    );
    assert!(!chain.contains(&TextDriver::Groq));
}

#[test]
fn test_buildFallbackChain_withNonDefaultPrimary_shouldContainAllOthers() {
    let chain = build_fallback_chain(
        ImageDriver::Pollinations,
        None,
        &ImageDriver::fallback_order(),
    );
    assert_eq!(
        chain,
        vec![ImageDriver::Replicate, ImageDriver::Gemini, ImageDriver::OpenAi]
    );
}

#[tokio::test]
async fn test_textRouter_generate_withWorkingPrimary_shouldNotTouchFallbacks() {
    let journal = call_journal();
    let mut drivers: HashMap<TextDriver, Arc<dyn TextGenerator>> = HashMap::new();
    drivers.insert(
        TextDriver::Gemini,
        Arc::new(
            MockTextGenerator::working("primary output")
                .with_label("gemini")
                .with_journal(journal.clone()),
        ),
    );
    drivers.insert(
        TextDriver::Groq,
        Arc::new(
            MockTextGenerator::working("fallback output")
                .with_label("groq")
                .with_journal(journal.clone()),
        ),
    );
    let router = TextRouter::with_drivers(drivers, TextDriver::Gemini, None);

    let result = router.generate("prompt").await.unwrap();
    assert_eq!(result, "primary output");
    assert_eq!(*journal.lock(), vec!["gemini".to_string()]);
}

#[tokio::test]
async fn test_textRouter_generate_withFailingPrimary_shouldUseFallbackInOrder() {
    let journal = call_journal();
    let mut drivers: HashMap<TextDriver, Arc<dyn TextGenerator>> = HashMap::new();
    drivers.insert(
        TextDriver::Gemini,
        Arc::new(
            MockTextGenerator::failing()
                .with_label("gemini")
                .with_journal(journal.clone()),
        ),
    );
    drivers.insert(
        TextDriver::Pollinations,
        Arc::new(
            MockTextGenerator::failing()
                .with_label("pollinations")
                .with_journal(journal.clone()),
        ),
    );
    drivers.insert(
        TextDriver::ChatGpt,
        Arc::new(
            MockTextGenerator::working("rescued")
                .with_label("chatgpt")
                .with_journal(journal.clone()),
        ),
    );
    let router = TextRouter::with_drivers(drivers, TextDriver::Gemini, None);

    let result = router.generate("prompt").await.unwrap();
    assert_eq!(result, "rescued");
    assert_eq!(
        *journal.lock(),
        vec![
            "gemini".to_string(),
            "pollinations".to_string(),
            "chatgpt".to_string()
        ]
    );
}

#[tokio::test]
async fn test_textRouter_generate_withExplicitFallback_shouldTryItFirst() {
    let journal = call_journal();
    let mut drivers: HashMap<TextDriver, Arc<dyn TextGenerator>> = HashMap::new();
    drivers.insert(
        TextDriver::Gemini,
        Arc::new(
            MockTextGenerator::failing()
                .with_label("gemini")
                .with_journal(journal.clone()),
        ),
    );
    drivers.insert(
        TextDriver::Groq,
        Arc::new(
            MockTextGenerator::working("from groq")
                .with_label("groq")
                .with_journal(journal.clone()),
        ),
    );
    let router = TextRouter::with_drivers(drivers, TextDriver::Gemini, Some(TextDriver::Groq));

    let result = router.generate("prompt").await.unwrap();
    assert_eq!(result, "from groq");
    assert_eq!(
        *journal.lock(),
        vec!["gemini".to_string(), "groq".to_string()]
    );
}

#[tokio::test]
async fn test_textRouter_generate_withAllDriversFailing_shouldExhaustChain() {
    let mut drivers: HashMap<TextDriver, Arc<dyn TextGenerator>> = HashMap::new();
    drivers.insert(TextDriver::Gemini, Arc::new(MockTextGenerator::failing()));
    drivers.insert(TextDriver::Groq, Arc::new(MockTextGenerator::failing()));
    let router = TextRouter::with_drivers(drivers, TextDriver::Gemini, None);

    let result = router.generate("prompt").await;
    assert!(matches!(
        result,
        Err(RouterError::ChainExhausted { kind: "text" })
    ));
}

#[tokio::test]
async fn test_textRouter_generateJson_withUndecodablePrimary_shouldFallBack() {
    // The primary succeeds at the transport level but returns prose;
    // the decode failure must trigger fallback like any other failure
    let mut drivers: HashMap<TextDriver, Arc<dyn TextGenerator>> = HashMap::new();
    drivers.insert(
        TextDriver::Gemini,
        Arc::new(MockTextGenerator::working("sorry, no JSON today")),
    );
    drivers.insert(
        TextDriver::Groq,
        Arc::new(MockTextGenerator::working(r#"{"fine": true}"#)),
    );
    let router = TextRouter::with_drivers(drivers, TextDriver::Gemini, None);

    let value = router.generate_json("prompt").await.unwrap();
    assert_eq!(value["fine"], true);
}

#[tokio::test]
async fn test_textRouter_generate_withUnregisteredDriverInChain_shouldSkipIt() {
    // Only two of the four drivers are registered; the chain walk must
    // skip the holes instead of failing on them
    let mut drivers: HashMap<TextDriver, Arc<dyn TextGenerator>> = HashMap::new();
    drivers.insert(TextDriver::Gemini, Arc::new(MockTextGenerator::failing()));
    drivers.insert(
        TextDriver::Groq,
        Arc::new(MockTextGenerator::working("last resort")),
    );
    let router = TextRouter::with_drivers(drivers, TextDriver::Gemini, None);

    let result = router.generate("prompt").await.unwrap();
    assert_eq!(result, "last resort");
}

#[tokio::test]
async fn test_voiceRouter_generate_withWorkingPrimary_shouldWriteArtifact() {
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("narration.mp3");

    let router = common::single_voice_router(MockVoiceGenerator::working(&b"audio bytes"[..]));
    let path = router.generate("hello world", &output).await.unwrap();

    assert_eq!(path, output);
    assert_eq!(std::fs::read(&output).unwrap(), b"audio bytes");
}

#[tokio::test]
async fn test_voiceRouter_generate_withFailingPrimary_shouldUseFallback() {
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("narration.mp3");

    let mut drivers: HashMap<VoiceDriver, Arc<dyn VoiceGenerator>> = HashMap::new();
    drivers.insert(VoiceDriver::ElevenLabs, Arc::new(MockVoiceGenerator::failing()));
    drivers.insert(
        VoiceDriver::Pollinations,
        Arc::new(MockVoiceGenerator::working(&b"backup audio"[..])),
    );
    let router = VoiceRouter::with_drivers(drivers, VoiceDriver::ElevenLabs, None);

    router.generate("hello world", &output).await.unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), b"backup audio");
}

#[tokio::test]
async fn test_voiceRouter_generate_withAllDriversFailing_shouldExhaustChain() {
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("narration.mp3");

    let mut drivers: HashMap<VoiceDriver, Arc<dyn VoiceGenerator>> = HashMap::new();
    drivers.insert(VoiceDriver::ElevenLabs, Arc::new(MockVoiceGenerator::failing()));
    let router = VoiceRouter::with_drivers(drivers, VoiceDriver::ElevenLabs, None);

    let result = router.generate("hello world", &output).await;
    assert!(matches!(
        result,
        Err(RouterError::ChainExhausted { kind: "voice" })
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_imageRouter_generate_withWorkingPrimary_shouldWriteArtifact() {
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("scene_0.png");

    let router = common::single_image_router(MockImageGenerator::working(&b"png bytes"[..]));
    let path = router.generate("a scene", &output).await.unwrap();

    assert_eq!(path, output);
    assert_eq!(std::fs::read(&output).unwrap(), b"png bytes");
}

#[tokio::test]
async fn test_imageRouter_generate_withFailingPrimary_shouldUseFallback() {
    let journal = call_journal();
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("scene_0.png");

    let mut drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>> = HashMap::new();
    drivers.insert(
        ImageDriver::Replicate,
        Arc::new(
            MockImageGenerator::failing()
                .with_label("replicate")
                .with_journal(journal.clone()),
        ),
    );
    drivers.insert(
        ImageDriver::Pollinations,
        Arc::new(
            MockImageGenerator::working(&b"backup png"[..])
                .with_label("pollinations")
                .with_journal(journal.clone()),
        ),
    );
    let router = ImageRouter::with_drivers(drivers, ImageDriver::Replicate, None, true)
        .with_retry(1, Duration::from_millis(0));

    router.generate("a scene", &output).await.unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), b"backup png");
    assert_eq!(
        *journal.lock(),
        vec!["replicate".to_string(), "pollinations".to_string()]
    );
}

#[tokio::test]
async fn test_imageRouter_generate_withBackupsDisabled_shouldOnlyTryPrimary() {
    let journal = call_journal();
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("scene_0.png");

    let mut drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>> = HashMap::new();
    drivers.insert(
        ImageDriver::Replicate,
        Arc::new(
            MockImageGenerator::failing()
                .with_label("replicate")
                .with_journal(journal.clone()),
        ),
    );
    drivers.insert(
        ImageDriver::Pollinations,
        Arc::new(
            MockImageGenerator::working(&b"never used"[..])
                .with_label("pollinations")
                .with_journal(journal.clone()),
        ),
    );
    let router = ImageRouter::with_drivers(drivers, ImageDriver::Replicate, None, false)
        .with_retry(1, Duration::from_millis(0));

    router.generate("a scene", &output).await.unwrap();
    // Placeholder written, fallback never consulted
    assert_eq!(std::fs::read(&output).unwrap(), PLACEHOLDER_PAYLOAD);
    assert_eq!(*journal.lock(), vec!["replicate".to_string()]);
}

#[tokio::test]
async fn test_imageRouter_generate_withAllFailures_shouldWritePlaceholder() {
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("scene_0.png");

    let generator = MockImageGenerator::failing();
    let mut drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>> = HashMap::new();
    drivers.insert(ImageDriver::Replicate, Arc::new(generator));
    let router = ImageRouter::with_drivers(drivers, ImageDriver::Replicate, None, false)
        .with_retry(2, Duration::from_millis(5));

    let path = router.generate("a scene", &output).await.unwrap();
    assert_eq!(path, output);
    assert_eq!(std::fs::read(&output).unwrap(), PLACEHOLDER_PAYLOAD);
    assert_eq!(PLACEHOLDER_PAYLOAD, b"Placeholder Image Content");
}

#[tokio::test]
async fn test_imageRouter_generate_withSecondAttemptSuccess_shouldRetryAfterCooldown() {
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("scene_0.png");

    // Fails on the first call, succeeds on the retry round
    let generator = MockImageGenerator::fail_on_calls(vec![0], &b"late png"[..]);
    let mut drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>> = HashMap::new();
    drivers.insert(ImageDriver::Replicate, Arc::new(generator));
    let router = ImageRouter::with_drivers(drivers, ImageDriver::Replicate, None, false)
        .with_retry(2, Duration::from_millis(5));

    router.generate("a scene", &output).await.unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), b"late png");
}

#[tokio::test]
async fn test_imageRouter_generate_withRetry_shouldRunFullChainEachAttempt() {
    let journal = call_journal();
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("scene_0.png");

    let mut drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>> = HashMap::new();
    drivers.insert(
        ImageDriver::Replicate,
        Arc::new(
            MockImageGenerator::failing()
                .with_label("replicate")
                .with_journal(journal.clone()),
        ),
    );
    drivers.insert(
        ImageDriver::Pollinations,
        Arc::new(
            MockImageGenerator::failing()
                .with_label("pollinations")
                .with_journal(journal.clone()),
        ),
    );
    let router = ImageRouter::with_drivers(drivers, ImageDriver::Replicate, None, true)
        .with_retry(2, Duration::from_millis(5));

    router.generate("a scene", &output).await.unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), PLACEHOLDER_PAYLOAD);

    // Two full rounds over both registered drivers
    let calls = journal.lock().clone();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], "replicate");
    assert_eq!(calls[1], "pollinations");
    assert_eq!(calls[2], "replicate");
    assert_eq!(calls[3], "pollinations");
}

#[test]
fn test_imageRouter_fallbackChain_withBackupsDisabled_shouldBeEmpty() {
    let drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>> = HashMap::new();
    let router = ImageRouter::with_drivers(drivers, ImageDriver::Replicate, None, false);
    assert!(router.fallback_chain().is_empty());
}
