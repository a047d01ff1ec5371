//! Word-time allocation
//!
//! Distributes a segment's effective duration evenly across its words,
//! with times local to the segment (first word starts at 0). Boundaries are
//! rounded to millisecond precision, and the final word's end is forced to
//! the exact effective duration so accumulated rounding error never leaks
//! into the next segment's offset.

use super::WordTiming;

/// Floor applied when a caller-adjusted duration comes out non-positive
const MIN_EFFECTIVE_SECONDS: f64 = 0.1;

/// Allocate per-word timings for a segment.
///
/// `effective_duration_seconds` may be a caller-supplied reduction of the
/// resolved duration (the pipeline subtracts the provider's trailing-silence
/// allowance); a zero or negative value is clamped to a small positive floor
/// before allocation.
pub fn allocate(segment_text: &str, effective_duration_seconds: f64) -> Vec<WordTiming> {
    let words: Vec<&str> = segment_text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let duration = effective_duration_seconds.max(MIN_EFFECTIVE_SECONDS);
    let time_per_word = duration / words.len() as f64;

    let mut timings: Vec<WordTiming> = words
        .iter()
        .enumerate()
        .map(|(i, word)| WordTiming {
            word: (*word).to_string(),
            start: round_ms(i as f64 * time_per_word),
            end: round_ms((i + 1) as f64 * time_per_word),
        })
        .collect();

    // Rounding must not move the segment's total duration
    if let Some(last) = timings.last_mut() {
        last.end = duration;
    }

    timings
}

fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_words_two_seconds() {
        let timings = allocate("Hello world", 2.0);
        assert_eq!(timings.len(), 2);
        assert_eq!(timings[0].word, "Hello");
        assert_eq!(timings[0].start, 0.0);
        assert_eq!(timings[0].end, 1.0);
        assert_eq!(timings[1].word, "world");
        assert_eq!(timings[1].start, 1.0);
        assert_eq!(timings[1].end, 2.0);
    }

    #[test]
    fn test_empty_text_yields_no_timings() {
        assert!(allocate("   ", 3.0).is_empty());
    }

    #[test]
    fn test_final_word_correction() {
        // 3 words over 1.0s: per-word boundaries round to 0.333/0.667,
        // but the last end must be exactly the effective duration
        let timings = allocate("one two three", 1.0);
        assert_eq!(timings.last().unwrap().end, 1.0);
        let total: f64 = timings.iter().map(|t| t.duration()).sum();
        assert!((total - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_contiguous_within_segment() {
        let timings = allocate("a b c d e f g", 2.7);
        for pair in timings.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for t in &timings {
            assert!(t.start < t.end);
        }
    }

    #[test]
    fn test_non_positive_duration_clamped() {
        let timings = allocate("word", -3.0);
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].end, MIN_EFFECTIVE_SECONDS);
        assert!(timings[0].start < timings[0].end);
    }

    #[test]
    fn test_millisecond_rounding() {
        let timings = allocate("a b c", 1.0);
        // interior boundaries land on whole milliseconds
        assert_eq!(timings[0].end, 0.333);
        assert_eq!(timings[1].end, 0.667);
    }
}
