//! Narration pipeline
//!
//! The single request-response flow that turns narration text into an
//! assembled timeline: segment, then for each segment in order synthesize
//! (behind the pacing gate), resolve the chunk's duration, and allocate
//! word timings inline as the chunk arrives. There is no parallelism across
//! segments and no retry: the first synthesis failure aborts the run, and
//! partial timelines are never returned.

pub mod gate;
pub mod payload;

pub use gate::IntervalGate;
pub use payload::{render, NarrationPayload, SegmentPayload};

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::audio;
use crate::config::PipelineConfig;
use crate::error::{NarrationError, Result};
use crate::provider::{SpeechProvider, VoiceId};
use crate::text::{SegmentationSource, Segmenter};
use crate::timeline::{allocate, assemble, SegmentTiming, Timeline};
use crate::types::{AudioChunk, DurationSource};

/// A finished narration run
#[derive(Debug)]
pub struct NarrationOutput {
    /// Run identifier
    pub request_id: Uuid,
    /// The assembled timeline
    pub timeline: Timeline,
    /// Audio chunks in segment order, durations filled in where measured
    pub chunks: Vec<AudioChunk>,
    /// Which strategy produced the segmentation
    pub segmentation_source: SegmentationSource,
    /// Wall-clock time for the whole run
    pub processing_time_ms: u64,
}

/// Narration pipeline
pub struct NarrationPipeline {
    segmenter: Segmenter,
    provider: Arc<dyn SpeechProvider>,
    gate_interval: Duration,
}

impl NarrationPipeline {
    pub fn new(
        segmenter: Segmenter,
        provider: Arc<dyn SpeechProvider>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            segmenter,
            provider,
            gate_interval: Duration::from_millis(config.gate_interval_ms),
        }
    }

    /// Run the full narration-to-timeline flow.
    pub async fn run(&self, text: &str, voice: VoiceId) -> Result<NarrationOutput> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        if !self.provider.supports(voice) {
            return Err(NarrationError::Validation {
                message: format!(
                    "voice {voice} is not supported by the {} channel",
                    self.provider.name()
                ),
            });
        }

        let segmentation = self.segmenter.segment(text).await?;
        if segmentation.source == SegmentationSource::Fallback {
            warn!(%request_id, "segmentation used the local fallback");
        }
        let total = segmentation.segments.len();
        info!(%request_id, segments = total, %voice, "starting narration run");

        // The trailing-silence allowance is provider policy: some providers
        // pad each chunk with silence that would otherwise stretch the last
        // words of every caption. Its exact value is configuration, not a
        // property of the allocator.
        let allowance = self.provider.trailing_silence_seconds();

        let mut gate = IntervalGate::new(self.gate_interval);
        let mut chunks = Vec::with_capacity(total);
        let mut timings = Vec::with_capacity(total);

        for segment in &segmentation.segments {
            gate.acquire().await;

            let chunk = self
                .provider
                .synthesize(segment, voice)
                .await
                .map_err(|e| {
                    if e.is_rate_limit() {
                        NarrationError::RateLimited {
                            index: segment.index,
                            retry_after: e.retry_after(),
                        }
                    } else {
                        NarrationError::synthesis(segment.index, &segment.text, e.to_string())
                    }
                })?;

            let resolved = audio::resolve(&chunk, &segment.text);
            if resolved.source == DurationSource::Estimated {
                debug!(%request_id, segment = segment.index, "duration estimated from text");
            }

            let chunk = AudioChunk {
                measured_duration_seconds: (resolved.source == DurationSource::Measured)
                    .then_some(resolved.seconds),
                ..chunk
            };

            let effective = resolved.seconds - allowance;
            let local_word_timings = allocate(&segment.text, effective);

            info!(
                %request_id,
                segment = segment.index + 1,
                of = total,
                seconds = resolved.seconds,
                source = ?resolved.source,
                "segment synthesized"
            );

            timings.push(SegmentTiming {
                segment: segment.clone(),
                duration: resolved,
                local_word_timings,
            });
            chunks.push(chunk);
        }

        let timeline = assemble(timings);
        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            %request_id,
            total_seconds = timeline.total_duration_seconds,
            processing_time_ms,
            "narration run complete"
        );

        Ok(NarrationOutput {
            request_id,
            timeline,
            chunks,
            segmentation_source: segmentation.source,
            processing_time_ms,
        })
    }
}
