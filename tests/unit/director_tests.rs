/*!
 * Tests for the Director's structured content operations
 */

use std::collections::HashMap;
use std::sync::Arc;

use reelforge::app_config::TextDriver;
use reelforge::director::Director;
use reelforge::errors::DirectorError;
use reelforge::providers::mock::MockTextGenerator;
use reelforge::providers::TextGenerator;
use reelforge::routing::text::TextRouter;

use crate::common;

fn director_with_responses<I, S>(responses: I) -> Director
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let generator = MockTextGenerator::working("{}").with_json_script(responses);
    Director::new(common::single_text_router(generator))
}

#[tokio::test]
async fn test_generateTitles_withBareArray_shouldReturnTitles() {
    let director = director_with_responses([r#"["One", "Two", "Three"]"#]);

    let titles = director.generate_titles("coffee").await.unwrap();
    assert_eq!(titles, vec!["One", "Two", "Three"]);
}

#[tokio::test]
async fn test_generateTitles_withWrappedArray_shouldUnwrapTitlesKey() {
    let director = director_with_responses([r#"{"titles": ["Wrapped A", "Wrapped B"]}"#]);

    let titles = director.generate_titles("coffee").await.unwrap();
    assert_eq!(titles, vec!["Wrapped A", "Wrapped B"]);
}

#[tokio::test]
async fn test_generateTitles_withMixedEntries_shouldDropNonStrings() {
    let director = director_with_responses([r#"["Valid", 42, null, "Also valid"]"#]);

    let titles = director.generate_titles("coffee").await.unwrap();
    assert_eq!(titles, vec!["Valid", "Also valid"]);
}

#[tokio::test]
async fn test_generateTitles_withNoStrings_shouldFailWithEmptyTitles() {
    let director = director_with_responses([r#"[1, 2, 3]"#]);

    let result = director.generate_titles("coffee").await;
    assert!(matches!(result, Err(DirectorError::EmptyTitles)));
}

#[tokio::test]
async fn test_generateTitles_withWrongObjectShape_shouldFailWithEmptyTitles() {
    let director = director_with_responses([r#"{"suggestions": ["A"]}"#]);

    let result = director.generate_titles("coffee").await;
    assert!(matches!(result, Err(DirectorError::EmptyTitles)));
}

#[tokio::test]
async fn test_generateScriptConfig_withValidResponse_shouldDecode() {
    let director = director_with_responses([common::sample_script_config_json()]);

    let config = director
        .generate_script_config("The History of Coffee", Some(120))
        .await
        .unwrap();
    assert!(config.audio_script.contains("fascinating"));
    assert_eq!(config.keywords.len(), 3);
}

#[tokio::test]
async fn test_generateScriptConfig_withMissingScript_shouldFail() {
    let director = director_with_responses([r#"{"youtube_description": "desc"}"#]);

    let result = director.generate_script_config("Title", None).await;
    assert!(matches!(result, Err(DirectorError::InvalidScriptConfig(_))));
}

#[tokio::test]
async fn test_generateScriptConfig_withEmptyScript_shouldFail() {
    let director = director_with_responses([r#"{"audio_script": "   "}"#]);

    let result = director.generate_script_config("Title", None).await;
    assert!(matches!(result, Err(DirectorError::InvalidScriptConfig(_))));
}

#[tokio::test]
async fn test_generateScenes_withBareArray_shouldReturnScenes() {
    let director = director_with_responses([common::sample_scenes_json(4)]);

    let scenes = director.generate_scenes("the script").await.unwrap();
    assert_eq!(scenes.len(), 4);
    assert!(scenes[0].image_prompt.contains("scene 0"));
}

#[tokio::test]
async fn test_generateScenes_withWrappedArray_shouldUnwrapScenesKey() {
    let raw = format!(r#"{{"scenes": {}}}"#, common::sample_scenes_json(2));
    let director = director_with_responses([raw]);

    let scenes = director.generate_scenes("the script").await.unwrap();
    assert_eq!(scenes.len(), 2);
}

#[tokio::test]
async fn test_generateScenes_withOversizedDuration_shouldClampToFiveSeconds() {
    let raw = r#"[{"image_prompt": "a long scene", "duration": 12.5}]"#;
    let director = director_with_responses([raw]);

    let scenes = director.generate_scenes("the script").await.unwrap();
    assert_eq!(scenes[0].duration, 5.0);
}

#[tokio::test]
async fn test_generateScenes_withValidDuration_shouldKeepIt() {
    let raw = r#"[{"image_prompt": "a short scene", "duration": 3.5}]"#;
    let director = director_with_responses([raw]);

    let scenes = director.generate_scenes("the script").await.unwrap();
    assert_eq!(scenes[0].duration, 3.5);
}

#[tokio::test]
async fn test_generateScenes_withNonListResponse_shouldFail() {
    let director = director_with_responses([r#"{"message": "no scenes here"}"#]);

    let result = director.generate_scenes("the script").await;
    assert!(matches!(result, Err(DirectorError::InvalidScenes(_))));
}

#[tokio::test]
async fn test_generateScenes_withEmptyList_shouldFail() {
    let director = director_with_responses(["[]"]);

    let result = director.generate_scenes("the script").await;
    assert!(matches!(result, Err(DirectorError::InvalidScenes(_))));
}

#[tokio::test]
async fn test_generateTitles_withUndecodablePrimary_shouldUseFallbackDriver() {
    let mut drivers: HashMap<TextDriver, Arc<dyn TextGenerator>> = HashMap::new();
    drivers.insert(
        TextDriver::Gemini,
        Arc::new(MockTextGenerator::working("no JSON from me")),
    );
    drivers.insert(
        TextDriver::Groq,
        Arc::new(MockTextGenerator::working(r#"["Rescued Title"]"#)),
    );
    let director = Director::new(TextRouter::with_drivers(drivers, TextDriver::Gemini, None));

    let titles = director.generate_titles("coffee").await.unwrap();
    assert_eq!(titles, vec!["Rescued Title"]);
}

#[tokio::test]
async fn test_generateTitles_withExhaustedRouter_shouldSurfaceRouterError() {
    let director = Director::new(common::single_text_router(MockTextGenerator::failing()));

    let result = director.generate_titles("coffee").await;
    assert!(matches!(result, Err(DirectorError::Router(_))));
}
