use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{api_error, connection_error, decode_base64_payload};
use crate::providers::{ImageGenerator, TextGenerator};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini text generation client
#[derive(Debug)]
pub struct GeminiText {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model name
    model: String,
}

/// Gemini image generation client (inline-data image responses)
#[derive(Debug)]
pub struct GeminiImage {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model name
    model: String,
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,

    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One content block in a request or response
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

/// A single part; text for prompts, inline data for image payloads
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    /// Base64 image payload; the API has shipped both spellings
    #[serde(
        rename = "inlineData",
        alias = "inline_data",
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

/// Inline binary payload
#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    data: String,
}

/// Generation configuration for image requests
#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,

    #[serde(rename = "candidateCount")]
    candidate_count: u32,

    #[serde(rename = "imageConfig")]
    image_config: ImageConfig,
}

/// Image-specific generation settings
#[derive(Debug, Serialize)]
struct ImageConfig {
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// One response candidate
#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiText {
    /// Create a new Gemini text client
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
}

impl GeminiImage {
    /// Create a new Gemini image client
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
}

/// Run a generateContent call and parse the typed response
async fn generate_content(
    client: &Client,
    api_key: &str,
    model: &str,
    request: &GeminiRequest,
) -> Result<GeminiResponse, ProviderError> {
    let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, api_key);

    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await
        .map_err(connection_error)?;

    if !response.status().is_success() {
        let err = api_error(response).await;
        error!("Gemini API error: {}", err);
        return Err(err);
    }

    response
        .json::<GeminiResponse>()
        .await
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

fn text_request(prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: Some(prompt.to_string()),
                inline_data: None,
            }],
        }],
        generation_config: None,
    }
}

#[async_trait]
impl TextGenerator for GeminiText {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        info!("Generating text with Gemini model: {}", self.model);

        let response =
            generate_content(&self.client, &self.api_key, &self.model, &text_request(prompt))
                .await?;

        let text: String = response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::Decode(
                "no text returned from Gemini".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl ImageGenerator for GeminiImage {
    async fn generate(&self, prompt: &str) -> Result<Bytes, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        info!("Generating image with Gemini model: {}", self.model);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                candidate_count: 1,
                image_config: ImageConfig {
                    aspect_ratio: "16:9".to_string(),
                },
            }),
        };

        let response =
            generate_content(&self.client, &self.api_key, &self.model, &request).await?;

        let payload = response
            .candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.inline_data.as_ref()))
            .ok_or_else(|| ProviderError::Decode("no image returned from Gemini".to_string()))?;

        decode_base64_payload(&payload.data)
    }
}
