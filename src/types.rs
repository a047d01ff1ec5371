//! Core data model
//!
//! Records flowing through the narration pipeline. Each stage produces a new
//! immutable value; nothing here is mutated downstream.

use serde::{Deserialize, Serialize};

/// One speakable span of narration text, as produced by the segmenter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the final narration sequence
    pub index: usize,

    /// Segment text; non-empty, ends in terminal punctuation
    pub text: String,
}

impl Segment {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Whitespace-delimited word count
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Synthesized audio for one segment
///
/// Owned exclusively by the pipeline run that created it. The bytes are an
/// opaque encoded stream (typically MP3); `measured_duration_seconds` stays
/// `None` until the duration resolver has looked at the container.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Index of the segment this audio belongs to
    pub segment_index: usize,

    /// Encoded audio bytes, exactly as the provider returned them
    pub audio_bytes: Vec<u8>,

    /// Container duration, filled in by the duration resolver
    pub measured_duration_seconds: Option<f64>,
}

impl AudioChunk {
    pub fn new(segment_index: usize, audio_bytes: Vec<u8>) -> Self {
        Self {
            segment_index,
            audio_bytes,
            measured_duration_seconds: None,
        }
    }
}

/// Where a resolved duration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationSource {
    /// Parsed from the audio container
    Measured,
    /// Text-length heuristic fallback
    Estimated,
}

/// Authoritative playback duration for one segment
///
/// Invariant: `seconds > 0` regardless of source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDuration {
    /// Index of the segment this duration belongs to
    pub segment_index: usize,

    /// Playback duration in seconds, strictly positive
    pub seconds: f64,

    /// Measured from the container or estimated from text
    pub source: DurationSource,
}
