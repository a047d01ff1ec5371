//! OpenAI speech channel
//!
//! Talks to the OpenAI text-to-speech endpoint (`tts-1` family) and returns
//! the MP3 bytes as-is. OpenAI reports no duration metadata; the duration
//! resolver handles that downstream.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::provider::voice::{ProviderKind, VoiceId};
use crate::provider::{ProviderError, ProviderResult, SpeechProvider};
use crate::types::{AudioChunk, Segment};

const CHANNEL_NAME: &str = "openai";
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";
const DEFAULT_MODEL: &str = "tts-1";

/// OpenAI speech channel
pub struct OpenAiProvider {
    config: ProviderConfig,
    client: Client,
}

/// OpenAI synthesis request body
#[derive(Debug, Serialize)]
struct SynthesisBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// OpenAI error response envelope
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI channel
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Configuration {
                channel: CHANNEL_NAME.to_string(),
                message: "OpenAI API key is required".to_string(),
            });
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key)
            .parse()
            .map_err(|e| ProviderError::Configuration {
                channel: CHANNEL_NAME.to_string(),
                message: format!("invalid API key: {e}"),
            })?;
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout.max(30)))
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Configuration {
                channel: CHANNEL_NAME.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn model(&self) -> &str {
        self.config.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

#[async_trait]
impl SpeechProvider for OpenAiProvider {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Openai
    }

    fn trailing_silence_seconds(&self) -> f64 {
        self.config.trailing_silence_seconds
    }

    async fn synthesize(&self, segment: &Segment, voice: VoiceId) -> ProviderResult<AudioChunk> {
        let caps = voice.capabilities();
        if caps.provider != ProviderKind::Openai {
            return Err(ProviderError::Configuration {
                channel: CHANNEL_NAME.to_string(),
                message: format!("voice {voice} belongs to another provider"),
            });
        }

        let body = SynthesisBody {
            model: self.model(),
            input: &segment.text,
            voice: caps.wire_id,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Request {
                channel: CHANNEL_NAME.to_string(),
                message: format!("failed to send request: {e}"),
                status_code: None,
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ProviderError::RateLimit {
                channel: CHANNEL_NAME.to_string(),
                retry_after,
            });
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());

            // OpenAI wraps errors in a JSON envelope; fall back to the raw body
            let message = match serde_json::from_str::<OpenAiErrorResponse>(&error_text) {
                Ok(parsed) => format!("{}: {}", parsed.error.error_type, parsed.error.message),
                Err(_) => error_text,
            };

            return Err(ProviderError::Request {
                channel: CHANNEL_NAME.to_string(),
                message,
                status_code: Some(status.as_u16()),
            });
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Response {
                channel: CHANNEL_NAME.to_string(),
                message: format!("failed to read audio body: {e}"),
            })?;

        if audio_bytes.is_empty() {
            return Err(ProviderError::Response {
                channel: CHANNEL_NAME.to_string(),
                message: "provider returned empty audio".to_string(),
            });
        }

        Ok(AudioChunk::new(segment.index, audio_bytes.to_vec()))
    }
}
