use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{error, info};
use reqwest::Client;
use serde::Serialize;

use crate::errors::ProviderError;
use crate::providers::VoiceGenerator;
use crate::providers::{api_error, connection_error};

const ELEVENLABS_TTS_BASE: &str = "https://api.elevenlabs.io/v1/text-to-speech";

/// ElevenLabs TTS client
#[derive(Debug)]
pub struct ElevenLabsVoice {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Voice identifier from the ElevenLabs dashboard
    voice_id: String,
}

/// Text-to-speech request
#[derive(Debug, Serialize)]
struct TtsRequest {
    text: String,
    model_id: String,
    voice_settings: VoiceSettings,
}

/// Synthesis tuning parameters
#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsVoice {
    /// Create a new ElevenLabs client
    pub fn new(api_key: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            voice_id: voice_id.into(),
        }
    }
}

#[async_trait]
impl VoiceGenerator for ElevenLabsVoice {
    async fn generate(&self, text: &str) -> Result<Bytes, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "ELEVENLABS_API_KEY is not set".to_string(),
            ));
        }

        info!("Generating audio with ElevenLabs voice: {}", self.voice_id);

        let request = TtsRequest {
            text: text.to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.5,
            },
        };

        let response = self
            .client
            .post(format!("{}/{}", ELEVENLABS_TTS_BASE, self.voice_id))
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("ElevenLabs API error: {}", err);
            return Err(err);
        }

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
