use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::ImageGenerator;
use crate::providers::{api_error, connection_error};

const REPLICATE_API_BASE: &str = "https://api.replicate.com/v1/models";

/// Poll cadence and bound for predictions that are not immediately ready
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLL_ATTEMPTS: u32 = 60;

/// Replicate image generation client (Flux)
#[derive(Debug)]
pub struct ReplicateImage {
    /// HTTP client for API requests
    client: Client,
    /// API token for authentication
    api_token: String,
    /// Model identifier, e.g. "black-forest-labs/flux-1.1-pro"
    model: String,
}

/// Prediction creation request
#[derive(Debug, Serialize)]
struct PredictionRequest {
    input: PredictionInput,
}

/// Input parameters for the Flux models
#[derive(Debug, Serialize)]
struct PredictionInput {
    prompt: String,
    aspect_ratio: String,
    output_format: String,
    safety_tolerance: u32,
}

/// Prediction state returned on create and poll
#[derive(Debug, Deserialize)]
struct Prediction {
    status: String,

    /// Flux Pro returns a single URL string; other models return an array
    #[serde(default)]
    output: Option<serde_json::Value>,

    #[serde(default)]
    error: Option<serde_json::Value>,

    #[serde(default)]
    urls: Option<PredictionUrls>,
}

/// Follow-up URLs for a pending prediction
#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: String,
}

impl Prediction {
    /// The output image URL, handling both string and single-element array
    /// output shapes
    fn output_url(&self) -> Option<String> {
        match &self.output {
            Some(serde_json::Value::String(url)) => Some(url.clone()),
            Some(serde_json::Value::Array(items)) => items
                .first()
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            _ => None,
        }
    }
}

impl ReplicateImage {
    /// Create a new Replicate image client
    pub fn new(api_token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_token: api_token.into(),
            model: model.into(),
        }
    }

    /// Poll a pending prediction until it settles or the poll budget runs out
    async fn poll_prediction(&self, url: &str) -> Result<String, ProviderError> {
        for _ in 0..MAX_POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.api_token)
                .send()
                .await
                .map_err(connection_error)?;

            if !response.status().is_success() {
                let err = api_error(response).await;
                error!("Replicate polling error: {}", err);
                return Err(err);
            }

            let prediction = response
                .json::<Prediction>()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string()))?;

            match prediction.status.as_str() {
                "succeeded" => {
                    return prediction.output_url().ok_or_else(|| {
                        ProviderError::Decode("no image URL returned from Replicate".to_string())
                    });
                }
                "failed" | "canceled" => {
                    let detail = prediction
                        .error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "Unknown error".to_string());
                    return Err(ProviderError::Api {
                        status_code: 200,
                        message: format!("Replicate prediction failed: {}", detail),
                    });
                }
                _ => continue,
            }
        }

        Err(ProviderError::Api {
            status_code: 200,
            message: "Replicate prediction timed out".to_string(),
        })
    }

    /// Download the generated image from its output URL
    async fn download(&self, url: &str) -> Result<Bytes, ProviderError> {
        let response = self.client.get(url).send().await.map_err(connection_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ImageGenerator for ReplicateImage {
    async fn generate(&self, prompt: &str) -> Result<Bytes, ProviderError> {
        if self.api_token.is_empty() {
            return Err(ProviderError::Configuration(
                "REPLICATE_API_TOKEN is not set".to_string(),
            ));
        }

        info!("Generating image with Replicate model: {}", self.model);

        let url = format!("{}/{}/predictions", REPLICATE_API_BASE, self.model);
        let request = PredictionRequest {
            input: PredictionInput {
                prompt: prompt.to_string(),
                aspect_ratio: "16:9".to_string(),
                output_format: "png".to_string(),
                safety_tolerance: 5,
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            // Ask the API to hold the request until the prediction settles
            .header("Prefer", "wait")
            .json(&request)
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("Replicate API error: {}", err);
            return Err(err);
        }

        let prediction = response
            .json::<Prediction>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let image_url = if prediction.status == "succeeded" {
            prediction.output_url().ok_or_else(|| {
                ProviderError::Decode("no image URL returned from Replicate".to_string())
            })?
        } else {
            let get_url = prediction
                .urls
                .as_ref()
                .map(|u| u.get.clone())
                .ok_or_else(|| {
                    ProviderError::Decode("pending prediction without a poll URL".to_string())
                })?;
            self.poll_prediction(&get_url).await?
        };

        self.download(&image_url).await
    }
}
