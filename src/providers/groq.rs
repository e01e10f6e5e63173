use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{error, info};
use reqwest::Client;
use serde::Serialize;

use crate::errors::ProviderError;
use crate::providers::openai::{chat_content, post_chat, ChatRequest};
use crate::providers::{api_error, connection_error, decode_json_response};
use crate::providers::{TextGenerator, VoiceGenerator};

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_SPEECH_URL: &str = "https://api.groq.com/openai/v1/audio/speech";

/// Groq chat completions client (OpenAI-compatible)
#[derive(Debug)]
pub struct GroqText {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model name
    model: String,
}

/// Groq TTS client
#[derive(Debug)]
pub struct GroqVoice {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// TTS model name
    model: String,
    /// Voice identifier
    voice: String,
}

/// Speech synthesis request
#[derive(Debug, Serialize)]
struct SpeechRequest {
    model: String,
    input: String,
    voice: String,
}

impl GroqText {
    /// Create a new Groq chat client
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
                "GROQ_API_KEY is not set".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TextGenerator for GroqText {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.check_key()?;
        info!("Generating text with Groq model: {}", self.model);

        let request = ChatRequest::user(&self.model, prompt);
        let response = post_chat(&self.client, GROQ_CHAT_URL, Some(&self.api_key), &request).await?;
        chat_content(response)
    }

    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, ProviderError> {
        self.check_key()?;
        info!("Generating JSON with Groq model: {}", self.model);

        let request = ChatRequest::json(&self.model, prompt);
        let response = post_chat(&self.client, GROQ_CHAT_URL, Some(&self.api_key), &request).await?;
        decode_json_response(&chat_content(response)?)
    }
}

impl GroqVoice {
    /// Create a new Groq TTS client
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
        }
    }
}

#[async_trait]
impl VoiceGenerator for GroqVoice {
    async fn generate(&self, text: &str) -> Result<Bytes, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "GROQ_API_KEY is not set".to_string(),
            ));
        }

        info!("Generating audio with Groq model: {}", self.model);

        let request = SpeechRequest {
            model: self.model.clone(),
            input: text.to_string(),
            voice: self.voice.clone(),
        };

        let response = self
            .client
            .post(GROQ_SPEECH_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("Groq Audio API error: {}", err);
            return Err(err);
        }

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
