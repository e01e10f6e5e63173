use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};
use serde_json::Value;

use crate::app_config::{Config, TextDriver};
use crate::errors::RouterError;
use crate::providers::gemini::GeminiText;
use crate::providers::groq::GroqText;
use crate::providers::openai::OpenAiText;
use crate::providers::pollinations::PollinationsText;
use crate::providers::TextGenerator;
use crate::routing::build_fallback_chain;

/// Router for text generation operations.
///
/// Tries the default driver first; on failure walks the fallback chain once.
/// Exhaustion is terminal: the caller decides whether the stage is fatal.
pub struct TextRouter {
    /// Concrete provider per driver identity
    drivers: HashMap<TextDriver, Arc<dyn TextGenerator>>,

    /// Driver tried first
    default_driver: TextDriver,

    /// Explicit fallback tried before the static preference order
    explicit_fallback: Option<TextDriver>,
}

impl TextRouter {
    /// Build a router with all concrete providers from configuration.
    ///
    /// Per-job preferences override the configured defaults; they are plain
    /// parameters here so concurrent jobs cannot observe each other's choices.
    pub fn from_config(
        config: &Config,
        preferred: Option<TextDriver>,
        fallback: Option<TextDriver>,
    ) -> Self {
        let p = &config.providers;

        let mut drivers: HashMap<TextDriver, Arc<dyn TextGenerator>> = HashMap::new();
        drivers.insert(
            TextDriver::Gemini,
            Arc::new(GeminiText::new(&p.gemini.api_key, &p.gemini.model)),
        );
        drivers.insert(
            TextDriver::Pollinations,
            Arc::new(PollinationsText::new(&p.pollinations.api_key)),
        );
        drivers.insert(
            TextDriver::ChatGpt,
            Arc::new(OpenAiText::new(&p.openai.api_key, &p.openai.model)),
        );
        drivers.insert(
            TextDriver::Groq,
            Arc::new(GroqText::new(&p.groq.api_key, &p.groq.model)),
        );

        Self {
            drivers,
            default_driver: preferred.unwrap_or(config.text.driver),
            explicit_fallback: fallback.or(config.text.fallback),
        }
    }

    /// Build a router over injected drivers (used by tests)
    pub fn with_drivers(
        drivers: HashMap<TextDriver, Arc<dyn TextGenerator>>,
        default_driver: TextDriver,
        explicit_fallback: Option<TextDriver>,
    ) -> Self {
        Self {
            drivers,
            default_driver,
            explicit_fallback,
        }
    }

    /// The resolved fallback chain for this router
    pub fn fallback_chain(&self) -> Vec<TextDriver> {
        build_fallback_chain(
            self.default_driver,
            self.explicit_fallback,
            &TextDriver::fallback_order(),
        )
    }

    /// Candidate drivers in try order: default first, then the chain
    fn candidates(&self) -> Vec<TextDriver> {
        let mut candidates = vec![self.default_driver];
        candidates.extend(self.fallback_chain());
        candidates
    }

    /// Generate free-form text, falling back across drivers on failure
    pub async fn generate(&self, prompt: &str) -> Result<String, RouterError> {
        for (index, driver) in self.candidates().into_iter().enumerate() {
            let Some(provider) = self.drivers.get(&driver) else {
                continue;
            };

            if index > 0 {
                info!("Falling back to text driver: {}", driver);
            }

            match provider.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if index == 0 => {
                    warn!("Primary text driver ({}) failed: {}", driver, e);
                }
                Err(e) => {
                    warn!("Fallback text driver ({}) failed: {}", driver, e);
                }
            }
        }

        Err(RouterError::ChainExhausted { kind: "text" })
    }

    /// Generate structured data, falling back across drivers on failure.
    ///
    /// A provider returning undecodable JSON counts as a provider failure
    /// and triggers fallback exactly like a network failure.
    pub async fn generate_json(&self, prompt: &str) -> Result<Value, RouterError> {
        for (index, driver) in self.candidates().into_iter().enumerate() {
            let Some(provider) = self.drivers.get(&driver) else {
                continue;
            };

            if index > 0 {
                info!("Falling back to text driver: {}", driver);
            }

            match provider.generate_json(prompt).await {
                Ok(value) => return Ok(value),
                Err(e) if index == 0 => {
                    warn!("Primary text driver ({}) failed: {}", driver, e);
                }
                Err(e) => {
                    warn!("Fallback text driver ({}) failed: {}", driver, e);
                }
            }
        }

        Err(RouterError::ChainExhausted { kind: "text" })
    }
}
