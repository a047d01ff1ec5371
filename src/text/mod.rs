//! Text processing
//!
//! Turns raw narration text into ordered, speakable segments.

pub mod segmenter;

pub use segmenter::{Segmentation, SegmentationSource, Segmenter};
