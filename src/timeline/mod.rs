//! Timeline core
//!
//! Pure numeric machinery: per-word time allocation, cumulative-offset
//! assembly, and the seconds-to-frames projection. Everything here is
//! synchronous and cheap; the pipeline calls it inline as each audio chunk
//! arrives.

pub mod allocator;
pub mod assembler;
pub mod frames;

pub use allocator::allocate;
pub use assembler::{assemble, SegmentTiming, Timeline, TimelineEntry};
pub use frames::{active_word, schedule, ActiveWord, FrameWindow};

use serde::{Deserialize, Serialize};

/// The `[start, end)` interval during which one word is being spoken
///
/// Within a segment consecutive timings are contiguous:
/// `timing[i].end == timing[i + 1].start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    /// The word as it appears in the segment text
    pub word: String,

    /// Interval start, seconds
    pub start: f64,

    /// Interval end, seconds; always greater than `start`
    pub end: f64,
}

impl WordTiming {
    /// Interval length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
