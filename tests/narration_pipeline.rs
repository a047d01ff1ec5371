//! Integration tests for the narration pipeline
//!
//! Drives the full segment -> synthesize -> resolve -> allocate -> assemble
//! flow against a mock speech provider, with no network involved:
//! - fallback segmentation
//! - timeline invariants (ordering, contiguity, totals)
//! - frame scheduling
//! - abort-on-failure and rate-limit surfacing

use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use narratime::pipeline::render;
use narratime::provider::{ProviderError, ProviderResult};
use narratime::timeline::{active_word, schedule};
use narratime::{
    DurationSource, EngineConfig, NarrationError, NarrationPipeline, ProviderKind,
    SegmentationSource, Segmenter, SpeechProvider, VoiceId,
};
use narratime::types::{AudioChunk, Segment};

/// Mono 16-bit WAV of the given length, so durations are measurable
fn wav_bytes(seconds: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22_050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..(seconds * spec.sample_rate as f64) as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// What the mock returns for each call, in order
enum MockStep {
    Wav(f64),
    Garbage,
    Fail,
    RateLimit,
}

struct MockProvider {
    steps: Vec<MockStep>,
    calls: AtomicUsize,
    trailing_silence: f64,
}

impl MockProvider {
    fn measured(durations: &[f64]) -> Self {
        Self {
            steps: durations.iter().map(|d| MockStep::Wav(*d)).collect(),
            calls: AtomicUsize::new(0),
            trailing_silence: 0.0,
        }
    }

    fn with_steps(steps: Vec<MockStep>) -> Self {
        Self {
            steps,
            calls: AtomicUsize::new(0),
            trailing_silence: 0.0,
        }
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Openai
    }

    fn trailing_silence_seconds(&self) -> f64 {
        self.trailing_silence
    }

    async fn synthesize(&self, segment: &Segment, _voice: VoiceId) -> ProviderResult<AudioChunk> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.steps.get(call).unwrap_or(&MockStep::Garbage) {
            MockStep::Wav(seconds) => Ok(AudioChunk::new(segment.index, wav_bytes(*seconds))),
            MockStep::Garbage => Ok(AudioChunk::new(segment.index, vec![0xab; 64])),
            MockStep::Fail => Err(ProviderError::Request {
                channel: "mock".to_string(),
                message: "synthetic failure".to_string(),
                status_code: Some(500),
            }),
            MockStep::RateLimit => Err(ProviderError::RateLimit {
                channel: "mock".to_string(),
                retry_after: Some(30),
            }),
        }
    }
}

fn pipeline_with(provider: MockProvider) -> NarrationPipeline {
    let config = EngineConfig::default();
    let segmenter = Segmenter::new(&config.segmentation).unwrap();
    NarrationPipeline::new(segmenter, Arc::new(provider), &config.pipeline)
}

// ==================== Full-run invariants ====================

#[tokio::test(start_paused = true)]
async fn test_two_sentences_full_run() {
    let pipeline = pipeline_with(MockProvider::measured(&[3.0, 2.0]));
    let run = pipeline
        .run(
            "Quantum physics is fascinating. It deals with particles.",
            VoiceId::Nova,
        )
        .await
        .unwrap();

    assert_eq!(run.segmentation_source, SegmentationSource::Fallback);
    assert_eq!(run.timeline.entries.len(), 2);
    assert_eq!(
        run.timeline.entries[0].segment.text,
        "Quantum physics is fascinating."
    );
    assert_eq!(
        run.timeline.entries[1].segment.text,
        "It deals with particles."
    );

    // measured durations drive cumulative offsets
    assert_eq!(run.timeline.entries[0].duration.source, DurationSource::Measured);
    assert!((run.timeline.entries[0].cumulative_start - 0.0).abs() < 1e-9);
    assert!((run.timeline.entries[1].cumulative_start - 3.0).abs() < 1e-3);
    assert!((run.timeline.total_duration_seconds - 5.0).abs() < 1e-2);

    // chunks carry their measured duration forward
    assert!(run.chunks[0].measured_duration_seconds.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_word_timings_globally_ordered() {
    let pipeline = pipeline_with(MockProvider::measured(&[1.7, 2.3, 0.9]));
    let run = pipeline
        .run("One two three. Four five six. Seven eight nine.", VoiceId::Nova)
        .await
        .unwrap();

    let all: Vec<_> = run
        .timeline
        .entries
        .iter()
        .flat_map(|e| e.word_timings.iter())
        .collect();
    assert!(!all.is_empty());
    for timing in &all {
        assert!(timing.start < timing.end);
    }
    for pair in all.windows(2) {
        assert!(pair[0].end <= pair[1].start + 1e-9);
    }

    // per-segment sums match the effective duration within 1 ms
    for entry in &run.timeline.entries {
        let sum: f64 = entry.word_timings.iter().map(|t| t.duration()).sum();
        assert!((sum - entry.duration.seconds).abs() < 1e-3);
    }
}

#[tokio::test(start_paused = true)]
async fn test_estimated_durations_when_audio_unreadable() {
    let pipeline = pipeline_with(MockProvider::with_steps(vec![
        MockStep::Garbage,
        MockStep::Garbage,
    ]));
    let run = pipeline
        .run("Hello there everyone. Short one.", VoiceId::Nova)
        .await
        .unwrap();

    for entry in &run.timeline.entries {
        assert_eq!(entry.duration.source, DurationSource::Estimated);
        assert!(entry.duration.seconds >= 2.0);
    }
    for chunk in &run.chunks {
        assert!(chunk.measured_duration_seconds.is_none());
    }
}

#[tokio::test(start_paused = true)]
async fn test_trailing_silence_allowance_applied() {
    let provider = MockProvider {
        steps: vec![MockStep::Wav(6.0)],
        calls: AtomicUsize::new(0),
        trailing_silence: 4.0,
    };
    let pipeline = pipeline_with(provider);
    let run = pipeline.run("Hello world.", VoiceId::Nova).await.unwrap();

    let entry = &run.timeline.entries[0];
    // the timeline keeps the full resolved duration...
    assert!((entry.duration.seconds - 6.0).abs() < 1e-3);
    // ...but word timings stop at the effective duration
    let last_end = entry.word_timings.last().unwrap().end;
    assert!((last_end - 2.0).abs() < 1e-2);
}

// ==================== Failure modes ====================

#[tokio::test(start_paused = true)]
async fn test_synthesis_failure_aborts_run() {
    let pipeline = pipeline_with(MockProvider::with_steps(vec![
        MockStep::Wav(2.0),
        MockStep::Fail,
    ]));
    let err = pipeline
        .run("First sentence. Second sentence.", VoiceId::Nova)
        .await
        .unwrap_err();

    match err {
        NarrationError::Synthesis {
            index,
            text_prefix,
            message,
        } => {
            assert_eq!(index, 1);
            assert!(text_prefix.starts_with("Second"));
            assert!(message.contains("synthetic failure"));
        }
        other => panic!("expected Synthesis error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_surfaced_distinctly() {
    let pipeline = pipeline_with(MockProvider::with_steps(vec![MockStep::RateLimit]));
    let err = pipeline.run("Hello world.", VoiceId::Nova).await.unwrap_err();
    assert!(err.is_rate_limited());
    match err {
        NarrationError::RateLimited { index, retry_after } => {
            assert_eq!(index, 0);
            assert_eq!(retry_after, Some(30));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_input_rejected_before_synthesis() {
    let pipeline = pipeline_with(MockProvider::measured(&[]));
    let err = pipeline.run("   ", VoiceId::Nova).await.unwrap_err();
    assert!(matches!(err, NarrationError::EmptyInput));
}

#[tokio::test]
async fn test_unsupported_voice_rejected() {
    let pipeline = pipeline_with(MockProvider::measured(&[2.0]));
    let err = pipeline.run("Hello.", VoiceId::Rachel).await.unwrap_err();
    assert!(matches!(err, NarrationError::Validation { .. }));
}

// ==================== Downstream consumers ====================

#[tokio::test(start_paused = true)]
async fn test_frame_schedule_from_run() {
    let pipeline = pipeline_with(MockProvider::measured(&[3.0, 2.0]));
    let run = pipeline
        .run("First sentence here. Second one now.", VoiceId::Nova)
        .await
        .unwrap();

    let windows = schedule(&run.timeline, 30);
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].start_frame, 0);
    assert_eq!(windows[0].duration_frames, 90);
    assert_eq!(windows[1].start_frame, 90);
    assert_eq!(windows[1].duration_frames, 60);

    let active = active_word(&run.timeline, 30, 0).unwrap();
    assert_eq!(active.segment_index, 0);
    assert_eq!(active.word, "First");
}

#[tokio::test(start_paused = true)]
async fn test_payload_contract() {
    let pipeline = pipeline_with(MockProvider::measured(&[3.0, 2.0]));
    let run = pipeline
        .run("Hello world. Again now.", VoiceId::Nova)
        .await
        .unwrap();

    let payload = render(&run);
    assert_eq!(payload.total_chunks, 2);
    assert!((payload.total_duration - run.timeline.total_duration_seconds).abs() < 1e-9);
    assert_eq!(payload.segments[0].chunk_index, 0);
    assert_eq!(payload.segments[0].word_count, 2);
    assert!(payload.segments[0].audio.starts_with("data:audio/mpeg;base64,"));

    let json = serde_json::to_string(&payload).unwrap();
    assert!(json.contains("\"totalDuration\""));
    assert!(json.contains("\"totalChunks\""));
    assert!(json.contains("\"chunkIndex\""));
}
