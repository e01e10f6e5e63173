/*!
 * Provider implementations for the generation services.
 *
 * This module contains client implementations for the third-party providers:
 * - Gemini: Google Gemini text and image generation
 * - OpenAI: ChatGPT text and DALL-E image generation
 * - Groq: chat completions and TTS audio
 * - Pollinations: keyless text, image and audio generation
 * - Replicate: Flux image generation
 * - ElevenLabs: TTS audio
 */

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for text generation providers
///
/// JSON-producing operations go through `generate_json`; a provider whose
/// output cannot be decoded as JSON fails with [`ProviderError::Decode`],
/// which triggers fallback exactly like a network failure.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Generate free-form text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Generate structured data for a prompt
    ///
    /// The default implementation appends a JSON instruction, generates text
    /// and decodes it with markdown code fences stripped. Providers with a
    /// native JSON output mode override this.
    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, ProviderError> {
        let json_prompt = format!("{}\n\nReturn the result as a valid JSON object.", prompt);
        let text = self.generate(&json_prompt).await?;
        decode_json_response(&text)
    }
}

/// Common trait for image generation providers
#[async_trait]
pub trait ImageGenerator: Send + Sync + Debug {
    /// Generate an image for a prompt, returning the raw image payload
    async fn generate(&self, prompt: &str) -> Result<Bytes, ProviderError>;
}

/// Common trait for voice generation providers
#[async_trait]
pub trait VoiceGenerator: Send + Sync + Debug {
    /// Synthesize narration audio for a text, returning the raw audio payload
    async fn generate(&self, text: &str) -> Result<Bytes, ProviderError>;
}

/// Matches a single markdown code fence (```json ... ``` or ``` ... ```)
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("valid fence regex"));

/// Decode a provider's text output as JSON, stripping one markdown code
/// fence wrapper when present
pub fn decode_json_response(text: &str) -> Result<serde_json::Value, ProviderError> {
    let content = match CODE_FENCE.captures(text) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(text),
        None => text,
    };

    serde_json::from_str(content.trim()).map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Decode a base64 payload from an inline-data provider response
pub(crate) fn decode_base64_payload(data: &str) -> Result<Bytes, ProviderError> {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map(Bytes::from)
        .map_err(|e| ProviderError::Decode(format!("invalid base64 payload: {}", e)))
}

/// Map a reqwest transport error to a provider error
pub(crate) fn connection_error(e: reqwest::Error) -> ProviderError {
    ProviderError::Connection(e.to_string())
}

/// Turn a non-success response into an API error carrying the body text
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    ProviderError::Api {
        status_code: status,
        message: body,
    }
}

pub mod elevenlabs;
pub mod gemini;
pub mod groq;
pub mod mock;
pub mod openai;
pub mod pollinations;
pub mod replicate;
