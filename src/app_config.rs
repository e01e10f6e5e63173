use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module holds the full configuration for a reelforge process: default
/// driver selection per generation kind, per-provider credentials and models,
/// image retry behavior and the external renderer invocation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Root directory for per-job artifact directories
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,

    /// Text generation routing
    #[serde(default)]
    pub text: TextRoutingConfig,

    /// Image generation routing
    #[serde(default)]
    pub image: ImageRoutingConfig,

    /// Voice generation routing
    #[serde(default)]
    pub voice: VoiceRoutingConfig,

    /// Concrete provider settings (keys, models, endpoints)
    #[serde(default)]
    pub providers: ProviderSettings,

    /// External renderer invocation
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Text generation driver identity
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextDriver {
    /// Google Gemini
    #[default]
    Gemini,
    /// Pollinations.ai (OpenAI-compatible)
    Pollinations,
    /// OpenAI ChatGPT
    ChatGpt,
    /// Groq
    Groq,
}

/// Image generation driver identity
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageDriver {
    /// Replicate (Flux)
    #[default]
    Replicate,
    /// Pollinations.ai
    Pollinations,
    /// Google Gemini
    Gemini,
    /// OpenAI DALL-E
    OpenAi,
}

/// Voice generation driver identity
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoiceDriver {
    /// ElevenLabs
    #[default]
    ElevenLabs,
    /// Pollinations.ai
    Pollinations,
    /// Groq TTS
    Groq,
}

impl TextDriver {
    /// Capitalized driver name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Pollinations => "Pollinations",
            Self::ChatGpt => "ChatGPT",
            Self::Groq => "Groq",
        }
    }

    /// Lowercase driver identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Pollinations => "pollinations".to_string(),
            Self::ChatGpt => "chatgpt".to_string(),
            Self::Groq => "groq".to_string(),
        }
    }

    /// Resolve a driver name; unknown names map to the default driver,
    /// never to an error
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "groq" => Self::Groq,
            "chatgpt" | "openai" => Self::ChatGpt,
            "pollinations" => Self::Pollinations,
            _ => Self::Gemini,
        }
    }

    /// Hardcoded preference order used to build fallback chains
    pub fn fallback_order() -> [Self; 4] {
        [Self::Gemini, Self::Pollinations, Self::ChatGpt, Self::Groq]
    }
}

impl ImageDriver {
    /// Capitalized driver name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Replicate => "Replicate",
            Self::Pollinations => "Pollinations",
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
        }
    }

    /// Lowercase driver identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Replicate => "replicate".to_string(),
            Self::Pollinations => "pollinations".to_string(),
            Self::Gemini => "gemini".to_string(),
            Self::OpenAi => "openai".to_string(),
        }
    }

    /// Resolve a driver name; unknown names map to the default driver
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "openai" | "chatgpt" | "dalle" => Self::OpenAi,
            "pollinations" => Self::Pollinations,
            "gemini" => Self::Gemini,
            _ => Self::Replicate,
        }
    }

    /// Hardcoded preference order used to build fallback chains
    pub fn fallback_order() -> [Self; 4] {
        [Self::Replicate, Self::Pollinations, Self::Gemini, Self::OpenAi]
    }
}

impl VoiceDriver {
    /// Capitalized driver name
    pub fn display_name(&self) -> &str {
        match self {
            Self::ElevenLabs => "ElevenLabs",
            Self::Pollinations => "Pollinations",
            Self::Groq => "Groq",
        }
    }

    /// Lowercase driver identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::ElevenLabs => "elevenlabs".to_string(),
            Self::Pollinations => "pollinations".to_string(),
            Self::Groq => "groq".to_string(),
        }
    }

    /// Resolve a driver name; unknown names map to the default driver
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "groq" => Self::Groq,
            "pollinations" => Self::Pollinations,
            _ => Self::ElevenLabs,
        }
    }

    /// Hardcoded preference order used to build fallback chains
    pub fn fallback_order() -> [Self; 3] {
        [Self::ElevenLabs, Self::Pollinations, Self::Groq]
    }
}

impl std::fmt::Display for TextDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::fmt::Display for ImageDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::fmt::Display for VoiceDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// Text routing configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TextRoutingConfig {
    /// Default text driver
    #[serde(default)]
    pub driver: TextDriver,

    /// Explicit fallback tried before the static fallback order
    #[serde(default)]
    pub fallback: Option<TextDriver>,
}

/// Image routing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageRoutingConfig {
    /// Default image driver
    #[serde(default)]
    pub driver: ImageDriver,

    /// Explicit fallback tried before the static fallback order
    #[serde(default)]
    pub fallback: Option<ImageDriver>,

    /// Whether fallback drivers may be used at all
    #[serde(default = "default_true")]
    pub use_backups: bool,

    /// Maximum full resolution rounds before the placeholder is written
    #[serde(default = "default_image_max_attempts")]
    pub max_attempts: u32,

    /// Cooldown between resolution rounds, in seconds
    #[serde(default = "default_image_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for ImageRoutingConfig {
    fn default() -> Self {
        Self {
            driver: ImageDriver::default(),
            fallback: None,
            use_backups: default_true(),
            max_attempts: default_image_max_attempts(),
            retry_delay_secs: default_image_retry_delay_secs(),
        }
    }
}

/// Voice routing configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct VoiceRoutingConfig {
    /// Default voice driver
    #[serde(default)]
    pub driver: VoiceDriver,

    /// Explicit fallback tried before the static fallback order
    #[serde(default)]
    pub fallback: Option<VoiceDriver>,
}

/// Settings for all concrete providers
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderSettings {
    /// Google Gemini settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OpenAI settings
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Groq settings
    #[serde(default)]
    pub groq: GroqConfig,

    /// Pollinations.ai settings
    #[serde(default)]
    pub pollinations: PollinationsConfig,

    /// Replicate settings
    #[serde(default)]
    pub replicate: ReplicateConfig,

    /// ElevenLabs settings
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,
}

/// Google Gemini configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiConfig {
    /// API key (defaults to GEMINI_API_KEY at load time)
    #[serde(default = "default_gemini_api_key")]
    pub api_key: String,

    /// Text model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Image model name
    #[serde(default = "default_gemini_image_model")]
    pub image_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: default_gemini_api_key(),
            model: default_gemini_model(),
            image_model: default_gemini_image_model(),
        }
    }
}

/// OpenAI configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAiConfig {
    /// API key (defaults to OPENAI_API_KEY at load time)
    #[serde(default = "default_openai_api_key")]
    pub api_key: String,

    /// Chat model name
    #[serde(default = "default_openai_model")]
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: default_openai_api_key(),
            model: default_openai_model(),
        }
    }
}

/// Groq configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroqConfig {
    /// API key (defaults to GROQ_API_KEY at load time)
    #[serde(default = "default_groq_api_key")]
    pub api_key: String,

    /// Chat model name
    #[serde(default = "default_groq_model")]
    pub model: String,

    /// TTS model name
    #[serde(default = "default_groq_tts_model")]
    pub tts_model: String,

    /// TTS voice identifier
    #[serde(default = "default_groq_tts_voice")]
    pub tts_voice: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: default_groq_api_key(),
            model: default_groq_model(),
            tts_model: default_groq_tts_model(),
            tts_voice: default_groq_tts_voice(),
        }
    }
}

/// Pollinations.ai configuration (key is optional for all endpoints)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PollinationsConfig {
    /// Optional API key (defaults to POLLINATIONS_API_KEY at load time)
    #[serde(default = "default_pollinations_api_key")]
    pub api_key: String,

    /// Image model name
    #[serde(default = "default_pollinations_image_model")]
    pub image_model: String,

    /// Image width in pixels
    #[serde(default = "default_pollinations_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_pollinations_height")]
    pub height: u32,

    /// TTS voice identifier
    #[serde(default = "default_pollinations_voice")]
    pub voice: String,
}

impl Default for PollinationsConfig {
    fn default() -> Self {
        Self {
            api_key: default_pollinations_api_key(),
            image_model: default_pollinations_image_model(),
            width: default_pollinations_width(),
            height: default_pollinations_height(),
            voice: default_pollinations_voice(),
        }
    }
}

/// Replicate configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReplicateConfig {
    /// API token (defaults to REPLICATE_API_TOKEN at load time)
    #[serde(default = "default_replicate_api_token")]
    pub api_token: String,

    /// Model identifier on Replicate
    #[serde(default = "default_replicate_model")]
    pub model: String,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            api_token: default_replicate_api_token(),
            model: default_replicate_model(),
        }
    }
}

/// ElevenLabs configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ElevenLabsConfig {
    /// API key (defaults to ELEVENLABS_API_KEY at load time)
    #[serde(default = "default_elevenlabs_api_key")]
    pub api_key: String,

    /// Voice identifier
    #[serde(default = "default_elevenlabs_voice_id")]
    pub voice_id: String,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: default_elevenlabs_api_key(),
            voice_id: default_elevenlabs_voice_id(),
        }
    }
}

/// External renderer invocation settings
///
/// The renderer is called with four positional arguments: blueprint path,
/// output video path, narration audio path, thumbnail path.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RendererConfig {
    /// Interpreter or executable to run
    #[serde(default = "default_renderer_program")]
    pub program: String,

    /// Script passed as the first argument (empty to run the program
    /// directly with the four positional arguments)
    #[serde(default = "default_renderer_script")]
    pub script: String,

    /// Render timeout in seconds
    #[serde(default = "default_renderer_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: default_renderer_program(),
            script: default_renderer_script(),
            timeout_secs: default_renderer_timeout_secs(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal operation
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("videos")
}

fn default_true() -> bool {
    true
}

fn default_image_max_attempts() -> u32 {
    2
}

fn default_image_retry_delay_secs() -> u64 {
    120
}

fn default_gemini_api_key() -> String {
    std::env::var("GEMINI_API_KEY").unwrap_or_default()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_image_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_openai_api_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_groq_api_key() -> String {
    std::env::var("GROQ_API_KEY").unwrap_or_default()
}

fn default_groq_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_groq_tts_model() -> String {
    "playai-tts".to_string()
}

fn default_groq_tts_voice() -> String {
    "Briggs-PlayAI".to_string()
}

fn default_pollinations_api_key() -> String {
    std::env::var("POLLINATIONS_API_KEY").unwrap_or_default()
}

fn default_pollinations_image_model() -> String {
    "flux".to_string()
}

fn default_pollinations_width() -> u32 {
    1280
}

fn default_pollinations_height() -> u32 {
    720
}

fn default_pollinations_voice() -> String {
    "alloy".to_string()
}

fn default_replicate_api_token() -> String {
    std::env::var("REPLICATE_API_TOKEN").unwrap_or_default()
}

fn default_replicate_model() -> String {
    "black-forest-labs/flux-1.1-pro".to_string()
}

fn default_elevenlabs_api_key() -> String {
    std::env::var("ELEVENLABS_API_KEY").unwrap_or_default()
}

fn default_elevenlabs_voice_id() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

fn default_renderer_program() -> String {
    "python".to_string()
}

fn default_renderer_script() -> String {
    "python_scripts/render_blueprint.py".to_string()
}

fn default_renderer_timeout_secs() -> u64 {
    18000
}

impl Config {
    /// Load configuration from a JSON file, or fall back to defaults when
    /// the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .context(format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_root: default_storage_root(),
            text: TextRoutingConfig::default(),
            image: ImageRoutingConfig::default(),
            voice: VoiceRoutingConfig::default(),
            providers: ProviderSettings::default(),
            renderer: RendererConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
