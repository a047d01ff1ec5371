//! Duration resolution
//!
//! Extracts the authoritative playback duration of a synthesized chunk from
//! its container metadata, falling back to a text-length estimate that is
//! deliberately biased long: downstream word highlighting must never finish
//! before the audio does. This module never fails — a fallback always
//! produces a usable positive duration.

use std::io::Cursor;
use tracing::debug;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::types::{AudioChunk, DurationSource, ResolvedDuration};

/// Words per second of a conservative TTS pace
const WORDS_PER_SECOND: f64 = 1.2;

/// Characters per second, backstop for word-sparse text
const CHARS_PER_SECOND: f64 = 8.0;

/// Safety buffer added to every estimate, in seconds
const ESTIMATE_BUFFER: f64 = 1.0;

/// Floor for estimates on very short text, in seconds
const ESTIMATE_FLOOR: f64 = 2.0;

/// Resolve the playback duration of a synthesized chunk.
///
/// Prefers container metadata; on any parse failure or non-positive value,
/// estimates from the segment text instead.
pub fn resolve(chunk: &AudioChunk, segment_text: &str) -> ResolvedDuration {
    match measure(&chunk.audio_bytes) {
        Ok(seconds) if seconds > 0.0 => ResolvedDuration {
            segment_index: chunk.segment_index,
            seconds,
            source: DurationSource::Measured,
        },
        Ok(seconds) => {
            debug!(
                segment = chunk.segment_index,
                seconds, "container reported non-positive duration, estimating from text"
            );
            estimated(chunk.segment_index, segment_text)
        }
        Err(message) => {
            debug!(
                segment = chunk.segment_index,
                %message,
                "container metadata unreadable, estimating from text"
            );
            estimated(chunk.segment_index, segment_text)
        }
    }
}

/// Text-length duration estimate, biased long
pub fn estimate_seconds(text: &str) -> f64 {
    let word_based = text.split_whitespace().count() as f64 / WORDS_PER_SECOND;
    let char_based = text.chars().count() as f64 / CHARS_PER_SECOND;
    (word_based.max(char_based) + ESTIMATE_BUFFER).max(ESTIMATE_FLOOR)
}

fn estimated(segment_index: usize, text: &str) -> ResolvedDuration {
    ResolvedDuration {
        segment_index,
        seconds: estimate_seconds(text),
        source: DurationSource::Estimated,
    }
}

/// Parse the playback duration out of encoded audio bytes
fn measure(bytes: &[u8]) -> Result<f64, String> {
    if bytes.starts_with(b"RIFF") {
        measure_wav(bytes)
    } else {
        measure_with_symphonia(bytes)
    }
}

/// RIFF fast path via hound
fn measure_wav(bytes: &[u8]) -> Result<f64, String> {
    let reader =
        hound::WavReader::new(Cursor::new(bytes)).map_err(|e| format!("WAV parse: {e}"))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err("WAV reports zero sample rate".to_string());
    }
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

/// Probe other containers (MP3 and friends) with symphonia
fn measure_with_symphonia(bytes: &[u8]) -> Result<f64, String> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| format!("unsupported container: {e}"))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| "no audio track found".to_string())?;

    let params = track.codec_params.clone();
    let track_id = track.id;

    // Well-formed containers state their frame count up front
    if let (Some(n_frames), Some(sample_rate)) = (params.n_frames, params.sample_rate) {
        if sample_rate > 0 {
            return Ok(n_frames as f64 / sample_rate as f64);
        }
    }

    // Headerless streams (typical provider MP3s) need a packet walk
    let time_base = params
        .time_base
        .ok_or_else(|| "no time base for packet walk".to_string())?;

    let mut total_ts: u64 = 0;
    loop {
        match format.next_packet() {
            Ok(packet) => {
                if packet.track_id() == track_id {
                    total_ts += packet.dur;
                }
            }
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(format!("packet read: {e}")),
        }
    }

    let time = time_base.calc_time(total_ts);
    Ok(time.seconds as f64 + time.frac)
}
