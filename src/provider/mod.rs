//! Speech provider channels
//!
//! The synthesizer boundary: text + voice in, opaque encoded audio bytes
//! out. Providers are invoked strictly sequentially by the pipeline; a
//! failure on any segment aborts the whole run.

pub mod elevenlabs;
pub mod openai;
pub mod voice;

pub use elevenlabs::ElevenLabsProvider;
pub use openai::OpenAiProvider;
pub use voice::{Gender, ProviderKind, VoiceCapabilities, VoiceId};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{AudioChunk, Segment};

/// Provider error types
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Authentication failed
    #[error("[{channel}] authentication failed: {message}")]
    Authentication { channel: String, message: String },

    /// Request failed
    #[error("[{channel}] request failed{}: {message}", fmt_status(.status_code))]
    Request {
        channel: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Response handling failed
    #[error("[{channel}] response error: {message}")]
    Response { channel: String, message: String },

    /// Rate limit exceeded
    #[error("[{channel}] rate limit exceeded")]
    RateLimit {
        channel: String,
        retry_after: Option<u64>,
    },

    /// Configuration error (missing key, unsupported voice, ...)
    #[error("[{channel}] configuration error: {message}")]
    Configuration { channel: String, message: String },
}

fn fmt_status(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

impl ProviderError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Provider result type
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Speech synthesis provider
///
/// Implementations validate the voice against its capability record at the
/// boundary and return the provider's audio bytes untouched.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Channel name, used in logs and error messages
    fn name(&self) -> &str;

    /// Which provider this channel talks to
    fn kind(&self) -> ProviderKind;

    /// Whether this channel can speak with the given voice
    fn supports(&self, voice: VoiceId) -> bool {
        voice.capabilities().provider == self.kind()
    }

    /// Trailing silence this provider is known to append per chunk, in
    /// seconds. The pipeline subtracts it from the resolved duration before
    /// word-time allocation.
    fn trailing_silence_seconds(&self) -> f64 {
        0.0
    }

    /// Synthesize one segment into encoded audio bytes
    async fn synthesize(&self, segment: &Segment, voice: VoiceId) -> ProviderResult<AudioChunk>;
}
