use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{error, info};
use reqwest::Client;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::openai::{chat_content, post_chat, AudioParams, ChatRequest};
use crate::providers::{api_error, connection_error, decode_base64_payload, decode_json_response};
use crate::providers::{ImageGenerator, TextGenerator, VoiceGenerator};

const POLLINATIONS_TEXT_URL: &str = "https://text.pollinations.ai/openai/chat/completions";
const POLLINATIONS_IMAGE_BASE: &str = "https://image.pollinations.ai/prompt/";
const POLLINATIONS_AUDIO_URL: &str =
    "https://enter.pollinations.ai/api/generate/v1/chat/completions";

/// Standard model alias on the OpenAI-compatible text endpoint
const TEXT_MODEL_ALIAS: &str = "openai";

/// Audio-capable model on the chat completions endpoint
const AUDIO_MODEL: &str = "openai-audio";

/// The image endpoint rejects requests without a browser-like user agent
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Pollinations.ai text client; works without an API key
#[derive(Debug)]
pub struct PollinationsText {
    /// HTTP client for API requests
    client: Client,
    /// Optional API key
    api_key: String,
}

/// Pollinations.ai image client
#[derive(Debug)]
pub struct PollinationsImage {
    /// HTTP client for API requests
    client: Client,
    /// Optional API key
    api_key: String,
    /// Image model name
    model: String,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
}

/// Pollinations.ai voice client
#[derive(Debug)]
pub struct PollinationsVoice {
    /// HTTP client for API requests
    client: Client,
    /// Optional API key
    api_key: String,
    /// TTS voice identifier
    voice: String,
}

impl PollinationsText {
    /// Create a new Pollinations text client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
        }
    }

    fn bearer(&self) -> Option<&str> {
        if self.api_key.is_empty() {
            None
        } else {
            Some(&self.api_key)
        }
    }
}

#[async_trait]
impl TextGenerator for PollinationsText {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        info!("Generating text with Pollinations");

        let request = ChatRequest::user(TEXT_MODEL_ALIAS, prompt);
        let response = post_chat(&self.client, POLLINATIONS_TEXT_URL, self.bearer(), &request).await?;
        chat_content(response)
    }

    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, ProviderError> {
        info!("Generating JSON with Pollinations");

        let json_prompt = format!(
            "{}\n\nReturn the result as a valid JSON object. Do not include any markdown formatting.",
            prompt
        );
        let request = ChatRequest::json(TEXT_MODEL_ALIAS, json_prompt);
        let response = post_chat(&self.client, POLLINATIONS_TEXT_URL, self.bearer(), &request).await?;
        decode_json_response(&chat_content(response)?)
    }
}

impl PollinationsImage {
    /// Create a new Pollinations image client
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
            width,
            height,
        }
    }

    /// Build the prompt URL with model and dimension parameters; the prompt
    /// travels percent-encoded as a path segment
    fn build_url(&self, prompt: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(POLLINATIONS_IMAGE_BASE)
            .map_err(|e| ProviderError::Configuration(format!("invalid image URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::Configuration("invalid image URL base".to_string()))?
            .pop_if_empty()
            .push(prompt);

        url.query_pairs_mut()
            .append_pair("model", &self.model)
            .append_pair("width", &self.width.to_string())
            .append_pair("height", &self.height.to_string());

        Ok(url)
    }
}

#[async_trait]
impl ImageGenerator for PollinationsImage {
    async fn generate(&self, prompt: &str) -> Result<Bytes, ProviderError> {
        let preview: String = prompt.chars().take(50).collect();
        info!("Generating image with Pollinations for prompt: {}...", preview);

        let url = self.build_url(prompt)?;

        let mut builder = self
            .client
            .get(url)
            .header("User-Agent", BROWSER_USER_AGENT);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(connection_error)?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("Pollinations image error: {}", err);
            return Err(err);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !content_type.contains("image") {
            error!("Pollinations returned non-image content: {}", content_type);
            return Err(ProviderError::Decode(format!(
                "expected image content, got {}",
                content_type
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

impl PollinationsVoice {
    /// Create a new Pollinations voice client
    pub fn new(api_key: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            voice: voice.into(),
        }
    }
}

#[async_trait]
impl VoiceGenerator for PollinationsVoice {
    async fn generate(&self, text: &str) -> Result<Bytes, ProviderError> {
        let preview: String = text.chars().take(50).collect();
        info!("Generating audio with Pollinations for text: {}...", preview);

        let mut request = ChatRequest::user(AUDIO_MODEL, text);
        request.modalities = Some(vec!["text".to_string(), "audio".to_string()]);
        request.audio = Some(AudioParams {
            voice: self.voice.clone(),
            format: "mp3".to_string(),
        });

        let bearer = if self.api_key.is_empty() {
            None
        } else {
            Some(self.api_key.as_str())
        };

        let response = post_chat(&self.client, POLLINATIONS_AUDIO_URL, bearer, &request).await?;

        let payload = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.audio)
            .ok_or_else(|| {
                ProviderError::Decode("Pollinations response missing audio data".to_string())
            })?;

        decode_base64_payload(&payload.data)
    }
}
