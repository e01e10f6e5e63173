use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{api_error, connection_error, decode_base64_payload, decode_json_response};
use crate::providers::{ImageGenerator, TextGenerator};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

/// OpenAI chat completions client
#[derive(Debug)]
pub struct OpenAiText {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model name
    model: String,
}

/// OpenAI DALL-E image generation client
#[derive(Debug)]
pub struct OpenAiImage {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
}

/// Chat completions request, shared by all OpenAI-compatible endpoints
/// (OpenAI itself, Groq, Pollinations)
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    /// The model to use
    pub model: String,

    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,

    /// Requested output format (JSON mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// Requested response modalities (audio-capable endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,

    /// Audio output parameters (audio-capable endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioParams>,
}

impl ChatRequest {
    /// A plain single-user-message request
    pub fn user(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: content.into(),
            }],
            response_format: None,
            modalities: None,
            audio: None,
        }
    }

    /// A JSON-mode request with the standard JSON system message
    pub fn json(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a helpful assistant designed to output JSON.".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: content.into(),
                },
            ],
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
            modalities: None,
            audio: None,
        }
    }
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Requested output format
#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

/// Audio output parameters
#[derive(Debug, Serialize)]
pub(crate) struct AudioParams {
    pub voice: String,
    pub format: String,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One response choice
#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatResponseMessage,
}

/// Message payload of a choice
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,

    /// Present on audio-modality responses
    #[serde(default)]
    pub audio: Option<ChatAudio>,
}

/// Inline audio payload of a choice
#[derive(Debug, Deserialize)]
pub(crate) struct ChatAudio {
    pub data: String,
}

/// Post a chat completions request to an OpenAI-compatible endpoint
pub(crate) async fn post_chat(
    client: &Client,
    url: &str,
    bearer: Option<&str>,
    request: &ChatRequest,
) -> Result<ChatResponse, ProviderError> {
    let mut builder = client
        .post(url)
        .header("Content-Type", "application/json")
        .json(request);

    if let Some(key) = bearer {
        builder = builder.bearer_auth(key);
    }

    let response = builder.send().await.map_err(connection_error)?;

    if !response.status().is_success() {
        let err = api_error(response).await;
        error!("Chat completions error from {}: {}", url, err);
        return Err(err);
    }

    response
        .json::<ChatResponse>()
        .await
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Extract the first choice's text content from a chat response
pub(crate) fn chat_content(response: ChatResponse) -> Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::Decode("response contained no message content".to_string()))
}

/// DALL-E image generation request
#[derive(Debug, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u32,
    size: String,
    response_format: String,
    quality: String,
    style: String,
}

/// DALL-E image generation response
#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

/// One generated image
#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

impl OpenAiText {
    /// Create a new OpenAI chat client
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn check_key(&self) -> Result<(), ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TextGenerator for OpenAiText {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.check_key()?;
        info!("Generating text with ChatGPT model: {}", self.model);

        let request = ChatRequest::user(&self.model, prompt);
        let response = post_chat(&self.client, OPENAI_CHAT_URL, Some(&self.api_key), &request).await?;
        chat_content(response)
    }

    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, ProviderError> {
        self.check_key()?;
        info!("Generating JSON with ChatGPT model: {}", self.model);

        let request = ChatRequest::json(&self.model, prompt);
        let response = post_chat(&self.client, OPENAI_CHAT_URL, Some(&self.api_key), &request).await?;
        decode_json_response(&chat_content(response)?)
    }
}

impl OpenAiImage {
    /// Create a new DALL-E client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImage {
    async fn generate(&self, prompt: &str) -> Result<Bytes, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        info!("Generating image with DALL-E 3");

        let request = ImageRequest {
            model: "dall-e-3".to_string(),
            prompt: prompt.to_string(),
            n: 1,
            size: "1024x1024".to_string(),
            response_format: "b64_json".to_string(),
            quality: "hd".to_string(),
            style: "vivid".to_string(),
        };

        let response = self
            .client
            .post(OPENAI_IMAGES_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("OpenAI DALL-E API error: {}", err);
            return Err(err);
        }

        let result = response
            .json::<ImageResponse>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let payload = result
            .data
            .first()
            .and_then(|d| d.b64_json.as_deref())
            .ok_or_else(|| ProviderError::Decode("no image returned from DALL-E".to_string()))?;

        decode_base64_payload(payload)
    }
}
