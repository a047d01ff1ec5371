//! Audio container handling
//!
//! The engine never decodes audio for playback; it only reads container
//! metadata to learn how long a synthesized chunk plays for.

pub mod duration;

pub use duration::{estimate_seconds, resolve};
