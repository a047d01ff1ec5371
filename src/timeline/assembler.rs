//! Timeline assembly
//!
//! Concatenates per-segment timings into one global timeline with
//! cumulative offsets. Segments arrive in index order; each entry's start
//! is the running sum of all prior resolved durations.

use serde::{Deserialize, Serialize};

use super::WordTiming;
use crate::types::{ResolvedDuration, Segment};

/// Per-segment input to the assembler: local word timings plus the
/// segment's resolved duration
#[derive(Debug, Clone)]
pub struct SegmentTiming {
    pub segment: Segment,
    pub duration: ResolvedDuration,
    /// Word timings local to the segment (first word starts at 0)
    pub local_word_timings: Vec<WordTiming>,
}

/// One segment placed on the global timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub segment: Segment,
    pub duration: ResolvedDuration,
    /// Word timings offset into global time
    pub word_timings: Vec<WordTiming>,
    /// Running sum of prior segment durations, seconds
    pub cumulative_start: f64,
}

impl TimelineEntry {
    /// End of this entry's window on the global timeline
    pub fn cumulative_end(&self) -> f64 {
        self.cumulative_start + self.duration.seconds
    }
}

/// The assembled narration timeline
///
/// Created once per narration request and read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    /// Sum of all entry durations, seconds
    pub total_duration_seconds: f64,
}

impl Timeline {
    /// The entry whose window contains `seconds`, if any
    pub fn entry_at(&self, seconds: f64) -> Option<&TimelineEntry> {
        self.entries
            .iter()
            .find(|e| seconds >= e.cumulative_start && seconds < e.cumulative_end())
    }
}

/// Assemble per-segment timings into a global timeline.
///
/// Walks entries in order, offsetting each segment's local word timings by
/// the running cumulative start and extending it by the segment's resolved
/// duration. The total duration is the final cumulative value.
pub fn assemble(timings: Vec<SegmentTiming>) -> Timeline {
    let mut entries = Vec::with_capacity(timings.len());
    let mut cumulative_start = 0.0_f64;

    for timing in timings {
        let word_timings = timing
            .local_word_timings
            .into_iter()
            .map(|t| WordTiming {
                word: t.word,
                start: cumulative_start + t.start,
                end: cumulative_start + t.end,
            })
            .collect();

        let seconds = timing.duration.seconds;
        entries.push(TimelineEntry {
            segment: timing.segment,
            duration: timing.duration,
            word_timings,
            cumulative_start,
        });
        cumulative_start += seconds;
    }

    Timeline {
        entries,
        total_duration_seconds: cumulative_start,
    }
}
