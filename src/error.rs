// src/error.rs
//! Error types for the tailoring pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the retailor error type.
pub type Result<T> = std::result::Result<T, TailorError>;

/// Main error type for the tailoring pipeline.
///
/// Every pipeline stage fails fast with one of these; nothing is retried or
/// silently recovered. `exit_code` maps the taxonomy onto process exit codes.
#[derive(Error, Debug)]
pub enum TailorError {
    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    InvalidKey(String),

    /// Configuration value failed type validation
    #[error("Invalid value for {key}: expected {expected}, got '{value}'")]
    InvalidValue {
        key: String,
        expected: &'static str,
        value: String,
    },

    /// Job description missing or empty
    #[error("Job description is empty")]
    EmptyJobDescription,

    /// Resume template could not be located
    #[error("Resume template not found; searched {0:?}")]
    TemplateNotFound(Vec<PathBuf>),

    /// Prompt template references a variable that was not supplied
    #[error("Prompt template references unknown placeholder: {{{{{0}}}}}")]
    MissingPlaceholder(String),

    /// API key rejected or absent
    #[error("Gemini authentication failed: {0}")]
    Authentication(String),

    /// Service asked us to back off; the tool does not retry
    #[error("Gemini rate limit hit; wait a moment and re-run")]
    RateLimited,

    /// Connectivity or timeout while talking to the AI service
    #[error("Network error calling Gemini: {0}")]
    Network(#[from] reqwest::Error),

    /// Service answered with an error status outside the auth/rate-limit cases
    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Service answered, but not with usable LaTeX
    #[error("Gemini response is not usable LaTeX: {0}")]
    MalformedResponse(String),

    /// Filesystem write failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External compiler exited non-zero; carries the log tail, not the full log
    #[error("LaTeX compilation failed:\n{log_tail}")]
    CompilationFailed { log_tail: String },

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TailorError {
    /// Process exit code for this failure. Usage errors exit 2 via clap
    /// before any of these are constructed.
    pub fn exit_code(&self) -> i32 {
        match self {
            TailorError::Authentication(_)
            | TailorError::RateLimited
            | TailorError::Network(_)
            | TailorError::Api { .. }
            | TailorError::MalformedResponse(_) => 3,
            TailorError::CompilationFailed { .. } => 4,
            _ => 1,
        }
    }

    /// Short label naming the failing stage, used in user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            TailorError::InvalidKey(_) | TailorError::InvalidValue { .. } => "configuration",
            TailorError::EmptyJobDescription | TailorError::TemplateNotFound(_) => "input",
            TailorError::MissingPlaceholder(_) => "prompt",
            TailorError::Authentication(_)
            | TailorError::RateLimited
            | TailorError::Network(_)
            | TailorError::Api { .. }
            | TailorError::MalformedResponse(_) => "ai",
            TailorError::Write { .. } => "output",
            TailorError::CompilationFailed { .. } => "compile",
            TailorError::Other(_) => "pipeline",
        }
    }
}
