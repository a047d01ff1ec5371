//! Structured error handling for the narration engine
//!
//! One crate-wide error enum covering the terminal failures of a narration
//! run. Recoverable conditions (segmentation service outages, unreadable
//! audio metadata) are handled by local fallbacks and never appear here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with NarrationError
pub type Result<T> = std::result::Result<T, NarrationError>;

/// Main error type for the narration timeline engine
#[derive(Error, Debug)]
pub enum NarrationError {
    /// Input text was empty or whitespace-only
    #[error("narration text is empty")]
    EmptyInput,

    /// A segment failed to synthesize; the whole run aborts
    #[error("synthesis failed for segment {index} (\"{text_prefix}…\"): {message}")]
    Synthesis {
        /// Index of the failing segment
        index: usize,
        /// Leading characters of the segment text, for diagnostics
        text_prefix: String,
        /// Underlying provider error message
        message: String,
    },

    /// The provider rejected the request due to rate limiting
    #[error("speech provider rate limited on segment {index}{}", retry_hint(.retry_after))]
    RateLimited {
        /// Index of the segment that hit the limit
        index: usize,
        /// Provider-suggested wait, if it sent one
        retry_after: Option<u64>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Validation errors (bad fps, unsupported voice, ...)
    #[error("validation error: {message}")]
    Validation { message: String },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!(", retry after {secs}s"),
        None => String::new(),
    }
}

impl NarrationError {
    /// Build a synthesis error carrying a short prefix of the segment text.
    pub fn synthesis(index: usize, text: &str, message: impl Into<String>) -> Self {
        Self::Synthesis {
            index,
            text_prefix: text.chars().take(32).collect(),
            message: message.into(),
        }
    }

    /// Whether the caller should present a "try again later" message.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<std::io::Error> for NarrationError {
    fn from(err: std::io::Error) -> Self {
        NarrationError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}
