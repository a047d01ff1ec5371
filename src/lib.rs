//! # Narratime - Audio-Synchronized Narration Timeline Engine
//!
//! Turns a block of narration text into a sequence of speech-audio chunks,
//! each annotated with per-word timing, and assembles them into a single
//! continuous, frame-accurate timeline for a video composition (captions,
//! background video, background audio).
//!
//! ## Pipeline
//!
//! Data flows strictly left to right; every stage produces a new immutable
//! record:
//!
//! 1. **Segmenter** - narration text into ordered speakable segments
//! 2. **SpeechProvider** - one segment into encoded audio bytes
//! 3. **Duration resolution** - authoritative playback duration per chunk
//! 4. **Word-time allocation** - a segment's duration spread over its words
//! 5. **Timeline assembly** - cumulative offsets and total duration
//! 6. **Frame scheduling** - the seconds timeline at a fixed frame rate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use narratime::{EngineConfig, NarrationPipeline, OpenAiProvider, Segmenter, VoiceId};
//! use std::sync::Arc;
//!
//! let config = EngineConfig::default();
//! let segmenter = Segmenter::new(&config.segmentation)?;
//! let provider = Arc::new(OpenAiProvider::new(config.openai)?);
//! let pipeline = NarrationPipeline::new(segmenter, provider, &config.pipeline);
//!
//! let output = pipeline.run("Quantum physics is fascinating.", VoiceId::Nova).await?;
//! let payload = narratime::pipeline::render(&output);
//! let windows = narratime::timeline::schedule(&output.timeline, 30);
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod text;
pub mod timeline;
pub mod types;

// Re-exports for convenience
pub use config::{EngineConfig, PipelineConfig, ProviderConfig, SegmentationConfig};
pub use error::{NarrationError, Result};
pub use pipeline::{NarrationOutput, NarrationPayload, NarrationPipeline};
pub use provider::{
    ElevenLabsProvider, OpenAiProvider, ProviderError, ProviderKind, SpeechProvider, VoiceId,
};
pub use text::{Segmentation, SegmentationSource, Segmenter};
pub use timeline::{FrameWindow, Timeline, TimelineEntry, WordTiming};
pub use types::{AudioChunk, DurationSource, ResolvedDuration, Segment};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default playback frame rate for frame scheduling
pub const DEFAULT_FPS: u32 = 30;
