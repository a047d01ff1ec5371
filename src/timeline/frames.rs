//! Frame scheduling
//!
//! Projects the seconds-based timeline onto a fixed frame rate for the
//! presentation layer: per-segment playback windows in frames, plus the
//! "which word is being spoken at this frame" lookup that drives caption
//! highlighting.

use serde::{Deserialize, Serialize};

use super::assembler::Timeline;

/// One segment's playback window in frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameWindow {
    pub segment_index: usize,
    pub start_frame: u64,
    pub duration_frames: u64,
}

/// The word active at a given playback frame
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveWord {
    pub segment_index: usize,
    /// Index of the word within its segment
    pub word_index: usize,
    pub word: String,
}

/// Project the timeline onto a fixed frame rate.
///
/// Each window's `start_frame` is recomputed from its entry's own
/// `cumulative_start` rather than by summing prior `duration_frames`, so
/// floor rounding never drifts across a long timeline.
pub fn schedule(timeline: &Timeline, fps: u32) -> Vec<FrameWindow> {
    let fps = fps as f64;
    timeline
        .entries
        .iter()
        .map(|entry| FrameWindow {
            segment_index: entry.segment.index,
            start_frame: (entry.cumulative_start * fps).floor() as u64,
            duration_frames: (entry.duration.seconds * fps).floor() as u64,
        })
        .collect()
}

/// Find the segment and word being spoken at `frame`.
///
/// Returns `None` past the end of the timeline or inside a gap where no
/// word interval contains the instant (e.g. trailing silence at the end of
/// a segment).
pub fn active_word(timeline: &Timeline, fps: u32, frame: u64) -> Option<ActiveWord> {
    let seconds = frame as f64 / fps as f64;
    let entry = timeline.entry_at(seconds)?;
    entry
        .word_timings
        .iter()
        .position(|t| seconds >= t.start && seconds < t.end)
        .map(|word_index| ActiveWord {
            segment_index: entry.segment.index,
            word_index,
            word: entry.word_timings[word_index].word.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::allocator::allocate;
    use crate::timeline::assembler::{assemble, SegmentTiming};
    use crate::types::{DurationSource, ResolvedDuration, Segment};

    fn two_segment_timeline() -> Timeline {
        let specs = [(0usize, "Hello world.", 3.0), (1usize, "Again now.", 2.0)];
        assemble(
            specs
                .iter()
                .map(|(index, text, seconds)| SegmentTiming {
                    segment: Segment::new(*index, *text),
                    duration: ResolvedDuration {
                        segment_index: *index,
                        seconds: *seconds,
                        source: DurationSource::Measured,
                    },
                    local_word_timings: allocate(text, *seconds),
                })
                .collect(),
        )
    }

    #[test]
    fn test_frame_math_at_30fps() {
        let timeline = two_segment_timeline();
        let windows = schedule(&timeline, 30);
        assert_eq!(windows[0].start_frame, 0);
        assert_eq!(windows[0].duration_frames, 90);
        assert_eq!(windows[1].start_frame, 90);
        assert_eq!(windows[1].duration_frames, 60);
    }

    #[test]
    fn test_start_frames_non_decreasing_and_recomputed() {
        let timeline = two_segment_timeline();
        let windows = schedule(&timeline, 24);
        for (window, entry) in windows.iter().zip(&timeline.entries) {
            assert_eq!(
                window.start_frame,
                (entry.cumulative_start * 24.0).floor() as u64
            );
        }
        for pair in windows.windows(2) {
            assert!(pair[0].start_frame <= pair[1].start_frame);
        }
    }

    #[test]
    fn test_active_word_lookup() {
        let timeline = two_segment_timeline();
        // frame 0: first word of first segment
        let active = active_word(&timeline, 30, 0).unwrap();
        assert_eq!(active.segment_index, 0);
        assert_eq!(active.word_index, 0);
        assert_eq!(active.word, "Hello");

        // 3.5s into playback: second segment, first word ("Again" spans 3.0-4.0)
        let active = active_word(&timeline, 30, 105).unwrap();
        assert_eq!(active.segment_index, 1);
        assert_eq!(active.word_index, 0);
        assert_eq!(active.word, "Again");
    }

    #[test]
    fn test_active_word_past_end() {
        let timeline = two_segment_timeline();
        assert!(active_word(&timeline, 30, 150).is_none());
    }
}
