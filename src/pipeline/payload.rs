//! Presentation-layer payload
//!
//! The JSON contract consumed by the video composition: one record per
//! segment with its audio as a self-describing data URI and its word
//! timings in global time, plus aggregate totals. Field names are
//! camelCase on the wire.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::NarrationOutput;
use crate::timeline::WordTiming;

/// Per-segment payload record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPayload {
    /// Segment text as spoken
    pub text: String,
    /// Encoded audio as a `data:audio/mpeg;base64,...` URI
    pub audio: String,
    /// Position of this chunk in the narration
    pub chunk_index: usize,
    /// Whitespace-delimited word count
    pub word_count: usize,
    /// Resolved playback duration, seconds
    pub duration: f64,
    /// Word timings in global timeline seconds
    pub word_timings: Vec<WordTiming>,
}

/// Complete narration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationPayload {
    /// Pipeline run identifier
    pub request_id: String,
    /// Per-segment records, in playback order
    pub segments: Vec<SegmentPayload>,
    /// Sum of all segment durations, seconds
    pub total_duration: f64,
    /// Number of audio chunks
    pub total_chunks: usize,
}

/// Build the presentation payload from a finished pipeline run.
pub fn render(output: &NarrationOutput) -> NarrationPayload {
    let segments = output
        .timeline
        .entries
        .iter()
        .zip(&output.chunks)
        .map(|(entry, chunk)| SegmentPayload {
            text: entry.segment.text.clone(),
            audio: data_uri(&chunk.audio_bytes),
            chunk_index: entry.segment.index,
            word_count: entry.segment.word_count(),
            duration: entry.duration.seconds,
            word_timings: entry.word_timings.clone(),
        })
        .collect();

    NarrationPayload {
        request_id: output.request_id.to_string(),
        segments,
        total_duration: output.timeline.total_duration_seconds,
        total_chunks: output.chunks.len(),
    }
}

fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:audio/mpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
