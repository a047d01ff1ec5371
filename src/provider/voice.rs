//! Voice identifiers and capabilities
//!
//! The voice set is a closed enumeration. Each voice carries an explicit
//! capability record naming its provider, wire identifier, and supported
//! sample rates; providers validate against it at the boundary instead of
//! trusting a lookup table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Speech provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Openai,
    Elevenlabs,
}

/// Voice gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

/// Closed set of narration voices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceId {
    // OpenAI
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
    // ElevenLabs
    Rachel,
    Adam,
    Bella,
}

/// Capability record for one voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceCapabilities {
    /// Provider this voice belongs to
    pub provider: ProviderKind,
    /// Identifier the provider's API expects
    pub wire_id: &'static str,
    /// Voice gender
    pub gender: Gender,
    /// Output sample rates the provider supports for this voice
    pub sample_rates: &'static [u32],
}

const OPENAI_RATES: &[u32] = &[24_000];
const ELEVENLABS_RATES: &[u32] = &[22_050, 44_100];

impl VoiceId {
    /// All voices, in declaration order
    pub const ALL: &'static [VoiceId] = &[
        Self::Alloy,
        Self::Echo,
        Self::Fable,
        Self::Onyx,
        Self::Nova,
        Self::Shimmer,
        Self::Rachel,
        Self::Adam,
        Self::Bella,
    ];

    /// Capability record for this voice
    pub fn capabilities(&self) -> VoiceCapabilities {
        match self {
            Self::Alloy => openai_voice("alloy", Gender::Neutral),
            Self::Echo => openai_voice("echo", Gender::Male),
            Self::Fable => openai_voice("fable", Gender::Neutral),
            Self::Onyx => openai_voice("onyx", Gender::Male),
            Self::Nova => openai_voice("nova", Gender::Female),
            Self::Shimmer => openai_voice("shimmer", Gender::Female),
            Self::Rachel => elevenlabs_voice("21m00Tcm4TlvDq8ikWAM", Gender::Female),
            Self::Adam => elevenlabs_voice("pNInz6obpgDQGcFmaJgB", Gender::Male),
            Self::Bella => elevenlabs_voice("EXAVITQu4vr4xnSDxMaL", Gender::Female),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Shimmer => "shimmer",
            Self::Rachel => "rachel",
            Self::Adam => "adam",
            Self::Bella => "bella",
        }
    }
}

impl std::str::FromStr for VoiceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown voice: {s}"))
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn openai_voice(wire_id: &'static str, gender: Gender) -> VoiceCapabilities {
    VoiceCapabilities {
        provider: ProviderKind::Openai,
        wire_id,
        gender,
        sample_rates: OPENAI_RATES,
    }
}

fn elevenlabs_voice(wire_id: &'static str, gender: Gender) -> VoiceCapabilities {
    VoiceCapabilities {
        provider: ProviderKind::Elevenlabs,
        wire_id,
        gender,
        sample_rates: ELEVENLABS_RATES,
    }
}
