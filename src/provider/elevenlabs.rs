//! ElevenLabs speech channel
//!
//! Talks to the ElevenLabs text-to-speech endpoint and returns the MP3
//! bytes as-is. ElevenLabs chunks end with a stretch of appended silence;
//! the configured `trailing_silence_seconds` allowance is surfaced through
//! [`SpeechProvider::trailing_silence_seconds`] for the pipeline to apply
//! before word-time allocation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::provider::voice::{ProviderKind, VoiceId};
use crate::provider::{ProviderError, ProviderResult, SpeechProvider};
use crate::types::{AudioChunk, Segment};

const CHANNEL_NAME: &str = "elevenlabs";
const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_MODEL: &str = "eleven_multilingual_v2";

/// ElevenLabs speech channel
pub struct ElevenLabsProvider {
    config: ProviderConfig,
    client: Client,
}

/// ElevenLabs synthesis request body
#[derive(Debug, Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs error detail envelope
#[derive(Debug, Deserialize)]
struct ElevenLabsErrorResponse {
    detail: ElevenLabsErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ElevenLabsErrorDetail {
    message: String,
}

impl ElevenLabsProvider {
    /// Create a new ElevenLabs channel
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Configuration {
                channel: CHANNEL_NAME.to_string(),
                message: "ElevenLabs API key is required".to_string(),
            });
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let key = config
            .api_key
            .parse()
            .map_err(|e| ProviderError::Configuration {
                channel: CHANNEL_NAME.to_string(),
                message: format!("invalid API key: {e}"),
            })?;
        headers.insert("xi-api-key", key);

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

    fn endpoint(&self, wire_id: &str) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{base}/v1/text-to-speech/{wire_id}")
    }

    fn model(&self) -> &str {
        self.config.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Elevenlabs
    }

    fn trailing_silence_seconds(&self) -> f64 {
        self.config.trailing_silence_seconds
    }

    async fn synthesize(&self, segment: &Segment, voice: VoiceId) -> ProviderResult<AudioChunk> {
        let caps = voice.capabilities();
        if caps.provider != ProviderKind::Elevenlabs {
            return Err(ProviderError::Configuration {
                channel: CHANNEL_NAME.to_string(),
                message: format!("voice {voice} belongs to another provider"),
            });
        }

        let body = SynthesisBody {
            text: &segment.text,
            model_id: self.model(),
        };

        let response = self
            .client
            .post(self.endpoint(caps.wire_id))
            .header(reqwest::header::ACCEPT, "audio/mpeg")
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

            let message = match serde_json::from_str::<ElevenLabsErrorResponse>(&error_text) {
                Ok(parsed) => parsed.detail.message,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let result = ElevenLabsProvider::new(ProviderConfig::default());
        assert!(matches!(result, Err(ProviderError::Configuration { .. })));
    }

    #[test]
    fn test_trailing_silence_comes_from_config() {
        let config = ProviderConfig {
            api_key: "xi-test".to_string(),
            trailing_silence_seconds: 4.0,
            ..Default::default()
        };
        let provider = ElevenLabsProvider::new(config).unwrap();
        assert_eq!(provider.trailing_silence_seconds(), 4.0);
    }

    #[test]
    fn test_endpoint_uses_voice_wire_id() {
        let config = ProviderConfig {
            api_key: "xi-test".to_string(),
            ..Default::default()
        };
        let provider = ElevenLabsProvider::new(config).unwrap();
        let endpoint = provider.endpoint(VoiceId::Rachel.capabilities().wire_id);
        assert_eq!(
            endpoint,
            "https://api.elevenlabs.io/v1/text-to-speech/21m00Tcm4TlvDq8ikWAM"
        );
    }
}
