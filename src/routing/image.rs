use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::app_config::{Config, ImageDriver};
use crate::errors::RouterError;
use crate::providers::gemini::GeminiImage;
use crate::providers::openai::OpenAiImage;
use crate::providers::pollinations::PollinationsImage;
use crate::providers::replicate::ReplicateImage;
use crate::providers::ImageGenerator;
use crate::routing::{build_fallback_chain, write_artifact};

/// Payload written when every driver fails on every attempt.
///
/// A downstream renderer treats a file with this content as "no image" and
/// substitutes its own filler frame, so a scene with a degraded image still
/// renders instead of failing the whole video.
pub const PLACEHOLDER_PAYLOAD: &[u8] = b"Placeholder Image Content";

/// Router for image generation operations.
///
/// Unlike the text and voice routers this one never fails: the full
/// fallback resolution runs in a bounded retry loop with a cooldown, and
/// when every round fails a placeholder artifact is written so the pipeline
/// can continue.
pub struct ImageRouter {
    /// Concrete provider per driver identity
    drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>>,

    /// Driver tried first
    default_driver: ImageDriver,

    /// Explicit fallback tried before the static preference order
    explicit_fallback: Option<ImageDriver>,

    /// When false the fallback chain is empty and only the default driver
    /// runs on each attempt
    use_backups: bool,

    /// Total resolution rounds before the placeholder is written
    max_attempts: u32,

    /// Cooldown between resolution rounds
    retry_delay: Duration,
}

impl ImageRouter {
    /// Build a router with all concrete providers from configuration
    pub fn from_config(
        config: &Config,
        preferred: Option<ImageDriver>,
        fallback: Option<ImageDriver>,
        use_backups: bool,
    ) -> Self {
        let p = &config.providers;

        let mut drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>> = HashMap::new();
        drivers.insert(
            ImageDriver::Replicate,
            Arc::new(ReplicateImage::new(&p.replicate.api_token, &p.replicate.model)),
        );
        drivers.insert(
            ImageDriver::Pollinations,
            Arc::new(PollinationsImage::new(
                &p.pollinations.api_key,
                &p.pollinations.image_model,
                p.pollinations.width,
                p.pollinations.height,
            )),
        );
        drivers.insert(
            ImageDriver::Gemini,
            Arc::new(GeminiImage::new(&p.gemini.api_key, &p.gemini.image_model)),
        );
        drivers.insert(
            ImageDriver::OpenAi,
            Arc::new(OpenAiImage::new(&p.openai.api_key)),
        );

        Self {
            drivers,
            default_driver: preferred.unwrap_or(config.image.driver),
            explicit_fallback: fallback.or(config.image.fallback),
            use_backups,
            max_attempts: config.image.max_attempts,
            retry_delay: Duration::from_secs(config.image.retry_delay_secs),
        }
    }

    /// Build a router over injected drivers (used by tests)
    pub fn with_drivers(
        drivers: HashMap<ImageDriver, Arc<dyn ImageGenerator>>,
        default_driver: ImageDriver,
        explicit_fallback: Option<ImageDriver>,
        use_backups: bool,
    ) -> Self {
        Self {
            drivers,
            default_driver,
            explicit_fallback,
            use_backups,
            max_attempts: 2,
            retry_delay: Duration::from_secs(120),
        }
    }

    /// Override retry bounds (used by tests to avoid real cooldowns)
    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// The resolved fallback chain for this router; empty when backups are
    /// disabled
    pub fn fallback_chain(&self) -> Vec<ImageDriver> {
        if !self.use_backups {
            return Vec::new();
        }
        build_fallback_chain(
            self.default_driver,
            self.explicit_fallback,
            &ImageDriver::fallback_order(),
        )
    }

    /// Candidate drivers for one resolution round
    fn candidates(&self) -> Vec<ImageDriver> {
        let mut candidates = vec![self.default_driver];
        candidates.extend(self.fallback_chain());
        candidates
    }

    /// Run one full resolution round: default, then each fallback driver
    async fn try_all_drivers(&self, prompt: &str, attempt: u32) -> Option<bytes::Bytes> {
        for (index, driver) in self.candidates().into_iter().enumerate() {
            let Some(provider) = self.drivers.get(&driver) else {
                continue;
            };

            if index > 0 {
                info!("Falling back to {} (attempt {})...", driver, attempt);
            }

            match provider.generate(prompt).await {
                Ok(payload) => return Some(payload),
                Err(e) if index == 0 => {
                    warn!(
                        "Primary image driver ({}) failed on attempt {}: {}",
                        driver, attempt, e
                    );
                    if !self.use_backups {
                        info!("Backups disabled. Skipping fallback drivers.");
                    }
                }
                Err(e) => {
                    warn!(
                        "Fallback image driver ({}) failed on attempt {}: {}",
                        driver, attempt, e
                    );
                }
            }
        }

        None
    }

    /// Generate an image and write it to `output_path`.
    ///
    /// Never fails on provider errors: after `max_attempts` full rounds the
    /// placeholder payload is written instead. Only an I/O error writing the
    /// artifact can surface.
    pub async fn generate(&self, prompt: &str, output_path: &Path) -> Result<PathBuf, RouterError> {
        for attempt in 1..=self.max_attempts {
            if let Some(payload) = self.try_all_drivers(prompt, attempt).await {
                write_artifact(output_path, &payload)?;
                return Ok(output_path.to_path_buf());
            }

            if attempt < self.max_attempts {
                warn!(
                    "All image drivers failed on attempt {}. Waiting {} seconds before retrying...",
                    attempt,
                    self.retry_delay.as_secs()
                );
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        warn!(
            "All image drivers failed after {} attempts. Writing placeholder.",
            self.max_attempts
        );
        write_artifact(output_path, PLACEHOLDER_PAYLOAD)?;
        Ok(output_path.to_path_buf())
    }
}
