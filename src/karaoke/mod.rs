/*!
 * Karaoke timing generation.
 *
 * Word timing is filled in from audio by two external services:
 * - a stem separator that isolates the vocals of a track
 * - a forced aligner that places the words of a transcript in a clip
 *
 * Both are traits so that real backends and the mocks in `mock` can be
 * used interchangeably by `KaraokeGenerator`.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::errors::KaraokeError;

pub mod generator;
pub mod mock;

pub use generator::{is_credit_line, KaraokeGenerator};

/// Planar audio samples
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// One sample vector per channel, all of the same length
    pub channels: Vec<Vec<f32>>,
    /// Samples per second
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self { channels, sample_rate }
    }

    /// Single-channel buffer
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self::new(vec![samples], sample_rate)
    }

    /// Length in samples of the first channel
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        sample_to_ms(self.len(), self.sample_rate)
    }
}

/// A transcript word as placed by an aligner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedWord {
    /// The word, as it appears in the transcript
    pub word: String,
    /// Start and end in ms relative to the clip, `None` when the word could not be placed
    pub position: Option<(u64, u64)>,
}

impl AlignedWord {
    pub fn placed(word: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            word: word.into(),
            position: Some((start, end)),
        }
    }

    pub fn unplaced(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            position: None,
        }
    }
}

/// Splits a track into named stems
#[async_trait]
pub trait StemSeparator: Send + Sync + Debug {
    /// Separate `audio` into stems keyed by name, such as `vocals`
    async fn separate(&self, audio: &AudioBuffer) -> Result<HashMap<String, AudioBuffer>, KaraokeError>;
}

/// Places transcript words in an audio clip
#[async_trait]
pub trait Aligner: Send + Sync + Debug {
    /// Align `transcript` against mono `samples`
    ///
    /// # Returns
    /// * One entry per transcript word, in transcript order
    async fn align(
        &self,
        samples: &[f32],
        transcript: &str,
        sample_rate: u32,
    ) -> Result<Vec<AlignedWord>, KaraokeError>;
}

/// Convert a time in ms to a sample index
pub fn ms_to_sample(ms: u64, sample_rate: u32) -> usize {
    (ms * u64::from(sample_rate) / 1000) as usize
}

/// Convert a sample index to a time in ms, 0 for a zero sample rate
pub fn sample_to_ms(sample: usize, sample_rate: u32) -> u64 {
    (sample as u64 * 1000)
        .checked_div(u64::from(sample_rate))
        .unwrap_or(0)
}
