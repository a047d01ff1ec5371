//! Narration segmentation
//!
//! Splits narration text into speakable segments. The primary strategy asks
//! an external semantic segmentation service for natural spoken phrases;
//! when that service is unreachable or returns garbage, a deterministic
//! local split takes over. The caller can tell which path produced the
//! result via [`SegmentationSource`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SegmentationConfig;
use crate::error::{NarrationError, Result};
use crate::types::Segment;

/// Sentence-ending punctuation characters
const SENTENCE_ENDINGS: &[char] = &['.', '!', '?'];

/// Above this length a single unbroken piece gets re-split into windows
const LONG_PIECE_CHARS: usize = 100;

/// Word window size for re-splitting over-long pieces
const WINDOW_WORDS: usize = 15;

/// Which strategy produced a segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentationSource {
    /// The external semantic segmentation service
    Service,
    /// The deterministic local split
    Fallback,
}

/// Segmentation result with its provenance
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub segments: Vec<Segment>,
    pub source: SegmentationSource,
}

/// Request shape for the segmentation service
#[derive(Debug, Serialize)]
struct SegmentationRequest<'a> {
    text: &'a str,
}

/// Response shape from the segmentation service
#[derive(Debug, Deserialize)]
struct SegmentationResponse {
    segments: Vec<String>,
}

/// Narration segmenter
pub struct Segmenter {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl Segmenter {
    /// Create a segmenter from configuration.
    ///
    /// With no configured endpoint the segmenter always uses the local
    /// fallback split.
    pub fn new(config: &SegmentationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| NarrationError::Config {
                message: format!("failed to build segmentation client: {e}"),
                path: None,
            })?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    /// Segment narration text into ordered speakable segments.
    ///
    /// Never returns an empty list for non-empty input; whitespace-only
    /// input is the only failure ([`NarrationError::EmptyInput`]).
    pub async fn segment(&self, text: &str) -> Result<Segmentation> {
        if text.trim().is_empty() {
            return Err(NarrationError::EmptyInput);
        }

        if let Some(endpoint) = &self.endpoint {
            match self.segment_via_service(endpoint, text).await {
                Ok(segments) => {
                    debug!(count = segments.len(), "segmentation service succeeded");
                    return Ok(Segmentation {
                        segments,
                        source: SegmentationSource::Service,
                    });
                }
                Err(message) => {
                    warn!(%message, "segmentation service failed, using local fallback");
                }
            }
        }

        Ok(Segmentation {
            segments: fallback_segments(text)?,
            source: SegmentationSource::Fallback,
        })
    }

    /// Ask the external service to group the text into spoken phrases
    async fn segment_via_service(
        &self,
        endpoint: &str,
        text: &str,
    ) -> std::result::Result<Vec<Segment>, String> {
        let response = self
            .client
            .post(endpoint)
            .json(&SegmentationRequest { text })
            .send()
            .await
            .map_err(|e| format!("transport error: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("service returned {status}"));
        }

        let parsed: SegmentationResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed response: {e}"))?;

        let pieces: Vec<String> = parsed
            .segments
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(ensure_terminal_punctuation)
            .collect();

        if pieces.is_empty() {
            return Err("service returned no segments".to_string());
        }

        Ok(index_segments(pieces))
    }
}

/// Deterministic local segmentation
///
/// Splits on sentence-terminal punctuation and newlines, keeps the
/// terminator with its piece, and re-splits a single over-long piece into
/// fixed word windows. Concatenating the output reproduces the source word
/// sequence with no drops or duplicates.
pub fn fallback_segments(text: &str) -> Result<Vec<Segment>> {
    if text.trim().is_empty() {
        return Err(NarrationError::EmptyInput);
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c == '\n' {
            flush_piece(&mut pieces, &mut current);
        } else {
            current.push(c);
            if SENTENCE_ENDINGS.contains(&c) {
                flush_piece(&mut pieces, &mut current);
            }
        }
    }
    flush_piece(&mut pieces, &mut current);

    // A single unbroken run of text still has to produce segments short
    // enough to synthesize and caption cleanly.
    if pieces.len() == 1 && pieces[0].len() > LONG_PIECE_CHARS {
        pieces = window_split(&pieces[0]);
    }

    Ok(index_segments(pieces))
}

fn flush_piece(pieces: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        pieces.push(ensure_terminal_punctuation(trimmed));
    }
    current.clear();
}

/// Re-split one long piece into fixed windows of ~15 words
fn window_split(piece: &str) -> Vec<String> {
    let words: Vec<&str> = piece.split_whitespace().collect();
    words
        .chunks(WINDOW_WORDS)
        .map(|window| ensure_terminal_punctuation(&window.join(" ")))
        .collect()
}

fn ensure_terminal_punctuation(piece: &str) -> String {
    let piece = piece.trim();
    if piece
        .chars()
        .last()
        .is_some_and(|c| SENTENCE_ENDINGS.contains(&c))
    {
        piece.to_string()
    } else {
        format!("{piece}.")
    }
}

fn index_segments(pieces: Vec<String>) -> Vec<Segment> {
    pieces
        .into_iter()
        .enumerate()
        .map(|(index, text)| Segment { index, text })
        .collect()
}
