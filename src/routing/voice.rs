use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

use crate::app_config::{Config, VoiceDriver};
use crate::errors::RouterError;
use crate::providers::elevenlabs::ElevenLabsVoice;
use crate::providers::groq::GroqVoice;
use crate::providers::pollinations::PollinationsVoice;
use crate::providers::VoiceGenerator;
use crate::routing::{build_fallback_chain, write_artifact};

/// Router for voice synthesis operations.
///
/// Same one-pass policy as the text router; exhaustion is terminal and the
/// caller decides whether narration is fatal for the job.
pub struct VoiceRouter {
    /// Concrete provider per driver identity
    drivers: HashMap<VoiceDriver, Arc<dyn VoiceGenerator>>,

    /// Driver tried first
    default_driver: VoiceDriver,

    /// Explicit fallback tried before the static preference order
    explicit_fallback: Option<VoiceDriver>,
}

impl VoiceRouter {
    /// Build a router with all concrete providers from configuration
    pub fn from_config(
        config: &Config,
        preferred: Option<VoiceDriver>,
        fallback: Option<VoiceDriver>,
    ) -> Self {
        let p = &config.providers;

        let mut drivers: HashMap<VoiceDriver, Arc<dyn VoiceGenerator>> = HashMap::new();
        drivers.insert(
            VoiceDriver::ElevenLabs,
            Arc::new(ElevenLabsVoice::new(
                &p.elevenlabs.api_key,
                &p.elevenlabs.voice_id,
            )),
        );
        drivers.insert(
            VoiceDriver::Pollinations,
            Arc::new(PollinationsVoice::new(
                &p.pollinations.api_key,
                &p.pollinations.voice,
            )),
        );
        drivers.insert(
            VoiceDriver::Groq,
            Arc::new(GroqVoice::new(
                &p.groq.api_key,
                &p.groq.tts_model,
                &p.groq.tts_voice,
            )),
        );

        Self {
            drivers,
            default_driver: preferred.unwrap_or(config.voice.driver),
            explicit_fallback: fallback.or(config.voice.fallback),
        }
    }

    /// Build a router over injected drivers (used by tests)
    pub fn with_drivers(
        drivers: HashMap<VoiceDriver, Arc<dyn VoiceGenerator>>,
        default_driver: VoiceDriver,
        explicit_fallback: Option<VoiceDriver>,
    ) -> Self {
        Self {
            drivers,
            default_driver,
            explicit_fallback,
        }
    }

    /// The resolved fallback chain for this router
    pub fn fallback_chain(&self) -> Vec<VoiceDriver> {
        build_fallback_chain(
            self.default_driver,
            self.explicit_fallback,
            &VoiceDriver::fallback_order(),
        )
    }

    /// Synthesize narration audio and write it to `output_path`, falling
    /// back across drivers on failure
    pub async fn generate(&self, text: &str, output_path: &Path) -> Result<PathBuf, RouterError> {
        let mut candidates = vec![self.default_driver];
        candidates.extend(self.fallback_chain());

        for (index, driver) in candidates.into_iter().enumerate() {
            let Some(provider) = self.drivers.get(&driver) else {
                continue;
            };

            if index > 0 {
                info!("Falling back to voice driver: {}", driver);
            }

            match provider.generate(text).await {
                Ok(payload) => {
                    write_artifact(output_path, &payload)?;
                    return Ok(output_path.to_path_buf());
                }
                Err(e) if index == 0 => {
                    warn!("Primary voice driver ({}) failed: {}", driver, e);
                }
                Err(e) => {
                    warn!("Fallback voice driver ({}) failed: {}", driver, e);
                }
            }
        }

        Err(RouterError::ChainExhausted { kind: "voice" })
    }
}
