/*!
 * Tests for provider response decoding
 */

use reelforge::errors::ProviderError;
use reelforge::providers::decode_json_response;
use reelforge::providers::mock::MockTextGenerator;
use reelforge::providers::TextGenerator;

#[test]
fn test_decodeJsonResponse_withBareJson_shouldDecode() {
    let value = decode_json_response(r#"{"key": "value"}"#).unwrap();
    assert_eq!(value["key"], "value");
}

#[test]
fn test_decodeJsonResponse_withJsonFence_shouldStripFence() {
    let raw = "```json\n{\"key\": \"value\"}\n```";
    let value = decode_json_response(raw).unwrap();
    assert_eq!(value["key"], "value");
}

#[test]
fn test_decodeJsonResponse_withPlainFence_shouldStripFence() {
    let raw = "```\n[1, 2, 3]\n```";
    let value = decode_json_response(raw).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
}

#[test]
fn test_decodeJsonResponse_withSurroundingProse_shouldUseFencedContent() {
    let raw = "Here is the JSON you asked for:\n```json\n{\"ok\": true}\n```\nLet me know!";
    let value = decode_json_response(raw).unwrap();
    assert_eq!(value["ok"], true);
}

#[test]
fn test_decodeJsonResponse_withMalformedJson_shouldFailWithDecode() {
    let result = decode_json_response("this is not json");
    assert!(matches!(result, Err(ProviderError::Decode(_))));
}

#[test]
fn test_decodeJsonResponse_withWhitespace_shouldDecode() {
    let value = decode_json_response("  \n {\"key\": 1} \n ").unwrap();
    assert_eq!(value["key"], 1);
}

#[tokio::test]
async fn test_mockText_generateJson_withScriptedFencedResponse_shouldDecode() {
    let generator = MockTextGenerator::working("{}")
        .with_json_script(["```json\n{\"titles\": [\"A\", \"B\"]}\n```"]);

    let value = generator.generate_json("prompt").await.unwrap();
    assert_eq!(value["titles"][0], "A");
}

#[tokio::test]
async fn test_mockText_generateJson_withMalformedScriptedResponse_shouldFail() {
    let generator = MockTextGenerator::working("{}").with_json_script(["garbage output"]);

    let result = generator.generate_json("prompt").await;
    assert!(matches!(result, Err(ProviderError::Decode(_))));
}
