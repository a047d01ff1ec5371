//! Engine Configuration
//!
//! Segmentation service, speech provider channels, and pipeline pacing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{NarrationError, Result};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Semantic segmentation service
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// OpenAI speech channel
    #[serde(default)]
    pub openai: ProviderConfig,

    /// ElevenLabs speech channel
    #[serde(default = "ProviderConfig::elevenlabs_default")]
    pub elevenlabs: ProviderConfig,

    /// Pipeline pacing and output defaults
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            openai: ProviderConfig::default(),
            elevenlabs: ProviderConfig::elevenlabs_default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Segmentation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Service endpoint; `None` means local fallback only
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: default_timeout(),
        }
    }
}

/// Speech provider channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; empty means "take it from the environment"
    #[serde(default)]
    pub api_key: String,

    /// Base URL override (defaults to the provider's public endpoint)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Model identifier sent with each request
    #[serde(default)]
    pub model: Option<String>,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Trailing silence the provider is known to append to each chunk.
    ///
    /// Subtracted from the resolved duration before word-time allocation.
    /// The 4.0 s ElevenLabs default reflects observed behavior of that one
    /// provider; its derivation is undocumented, so treat it as tunable.
    #[serde(default)]
    pub trailing_silence_seconds: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: None,
            timeout: default_timeout(),
            trailing_silence_seconds: 0.0,
        }
    }
}

impl ProviderConfig {
    fn elevenlabs_default() -> Self {
        Self {
            trailing_silence_seconds: default_elevenlabs_trailing_silence(),
            ..Self::default()
        }
    }
}

/// Pipeline pacing and output defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum interval between provider calls (milliseconds)
    #[serde(default = "default_gate_interval_ms")]
    pub gate_interval_ms: u64,

    /// Default frames per second for frame scheduling
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gate_interval_ms: default_gate_interval_ms(),
            fps: default_fps(),
        }
    }
}

/// Default values
fn default_timeout() -> u64 {
    30
}

fn default_gate_interval_ms() -> u64 {
    100
}

fn default_fps() -> u32 {
    30
}

fn default_elevenlabs_trailing_silence() -> f64 {
    4.0
}

impl EngineConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| NarrationError::Io {
            message: e.to_string(),
            path: Some(path.to_path_buf()),
        })?;
        serde_yaml::from_str(&content).map_err(|e| NarrationError::Config {
            message: format!("invalid config: {e}"),
            path: Some(path.to_path_buf()),
        })
    }

    /// Save to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).map_err(|e| NarrationError::Config {
            message: format!("failed to serialize config: {e}"),
            path: Some(path.to_path_buf()),
        })?;
        std::fs::write(path, content).map_err(|e| NarrationError::Io {
            message: e.to_string(),
            path: Some(path.to_path_buf()),
        })
    }
}
