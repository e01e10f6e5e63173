/*!
 * # ReelForge - AI Video Generation Orchestrator
 *
 * A Rust library for turning a topic into a rendered short video using AI.
 *
 * ## Features
 *
 * - Generate candidate titles, narration scripts and scene breakdowns
 * - Route generation across providers with automatic fallback:
 *   - Text: Gemini, Pollinations, ChatGPT, Groq
 *   - Image: Replicate (Flux), Pollinations, Gemini, DALL-E
 *   - Voice: ElevenLabs, Pollinations, Groq TTS
 * - Retry image generation with a cooldown, degrading to a placeholder
 * - Observe in-flight jobs through a keyed, bounded progress log
 * - Hand the blueprint, narration and images to an external renderer
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management and driver identities
 * - `routing`: Provider routers with fallback chains:
 *   - `routing::text`: Text generation routing
 *   - `routing::image`: Image generation routing with retry and placeholder
 *   - `routing::voice`: Voice synthesis routing
 * - `director`: Structured content planning (titles, scripts, scenes)
 * - `pipeline`: Stage-by-stage job coordination
 * - `progress`: Keyed progress log for job observation
 * - `providers`: Client implementations for the generation providers:
 *   - `providers::gemini`: Google Gemini text and image
 *   - `providers::openai`: ChatGPT text and DALL-E image
 *   - `providers::groq`: Groq chat and TTS
 *   - `providers::pollinations`: Pollinations.ai text, image and audio
 *   - `providers::replicate`: Replicate Flux image
 *   - `providers::elevenlabs`: ElevenLabs TTS
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod director;
pub mod errors;
pub mod file_utils;
pub mod pipeline;
pub mod progress;
pub mod providers;
pub mod routing;

// Re-export main types for easier usage
pub use app_config::{Config, ImageDriver, TextDriver, VoiceDriver};
pub use director::{Blueprint, Director, Scene, ScriptConfig};
pub use errors::{DirectorError, PipelineError, ProviderError, RouterError};
pub use pipeline::{DriverPreferences, GenerationRequest, VideoPipeline};
pub use progress::{ProgressEntry, ProgressLevel, ProgressLog};
