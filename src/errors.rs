/*!
 * Error types for the reelforge application.
 *
 * Each layer of the generation stack has its own error enum so that the
 * routing policy (fall back, fail terminally, or degrade and continue) is
 * visible in the types at every call site.
 */

use thiserror::Error;

/// Errors that can occur when calling a single generation provider.
///
/// Every variant triggers fallback to the next driver in the chain; the
/// distinction exists for logging and diagnosis, not for control flow.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A required credential or setting for the provider is absent
    #[error("provider configuration error: {0}")]
    Configuration(String),

    /// The provider was reachable but responded with an error status
    #[error("API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message or body from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("connection error: {0}")]
    Connection(String),

    /// The provider returned a payload that could not be decoded
    /// (malformed JSON for a JSON-expecting operation, missing fields,
    /// wrong content type)
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

/// Errors surfaced by a provider router after its own error handling.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Every candidate driver in the resolution failed
    #[error("all {kind} generation drivers failed")]
    ChainExhausted {
        /// Operation kind ("text", "image" or "voice")
        kind: &'static str,
    },

    /// Writing a successfully generated artifact to disk failed
    #[error("failed to write generated artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the Director's structured-content operations.
#[derive(Error, Debug)]
pub enum DirectorError {
    /// The text router exhausted its fallback chain
    #[error("text generation failed: {0}")]
    Router(#[from] RouterError),

    /// The title response contained no usable strings
    #[error("no valid titles found in response")]
    EmptyTitles,

    /// The script configuration response was structurally invalid
    #[error("invalid script configuration response: {0}")]
    InvalidScriptConfig(String),

    /// The scene breakdown response was not a scene list
    #[error("invalid scene breakdown response: {0}")]
    InvalidScenes(String),
}

/// Error aborting a pipeline run.
///
/// Only stages marked fatal produce this; non-fatal stage failures are
/// logged to the progress log and the pipeline continues.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A fatal stage failed after exhausting its own error handling
    #[error("stage '{stage}' failed: {message}")]
    StageFatal {
        /// Name of the failed stage
        stage: &'static str,
        /// Underlying failure description
        message: String,
    },
}

impl PipelineError {
    /// Build a fatal stage error from any displayable cause
    pub fn fatal(stage: &'static str, cause: impl std::fmt::Display) -> Self {
        Self::StageFatal {
            stage,
            message: cause.to_string(),
        }
    }
}
