/*!
 * Mock collaborators for testing karaoke generation.
 *
 * - `MockSeparator::passthrough()` returns the input as the `vocals` stem
 * - `MockSeparator::failing()` always errors
 * - `MockAligner::even(word_ms)` places whitespace-separated words back to back
 * - `MockAligner::unplaced()` returns every word without a position
 * - `MockAligner::failing()` always errors
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::KaraokeError;
use super::{AlignedWord, Aligner, AudioBuffer, StemSeparator};

/// Behavior mode for the mock separator
#[derive(Debug, Clone, PartialEq)]
pub enum SeparatorBehavior {
    /// Returns the input under the given stem name
    Passthrough { stem: String },
    /// Always fails
    Failing,
}

/// Mock stem separator
#[derive(Debug)]
pub struct MockSeparator {
    behavior: SeparatorBehavior,
}

impl MockSeparator {
    pub fn new(behavior: SeparatorBehavior) -> Self {
        Self { behavior }
    }

    /// Return the input unchanged as the `vocals` stem
    pub fn passthrough() -> Self {
        Self::with_stem("vocals")
    }

    /// Return the input unchanged under a custom stem name
    pub fn with_stem(stem: &str) -> Self {
        Self::new(SeparatorBehavior::Passthrough { stem: stem.to_string() })
    }

    pub fn failing() -> Self {
        Self::new(SeparatorBehavior::Failing)
    }
}

#[async_trait]
impl StemSeparator for MockSeparator {
    async fn separate(&self, audio: &AudioBuffer) -> Result<HashMap<String, AudioBuffer>, KaraokeError> {
        match &self.behavior {
            SeparatorBehavior::Passthrough { stem } => {
                let mut stems = HashMap::new();
                stems.insert(stem.clone(), audio.clone());
                Ok(stems)
            }
            SeparatorBehavior::Failing => Err(KaraokeError::Separation("mock separator failure".to_string())),
        }
    }
}

/// Behavior mode for the mock aligner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignerBehavior {
    /// Places each word right after the previous one, `word_ms` long
    Even { word_ms: u64 },
    /// Returns every word without a position
    Unplaced,
    /// Always fails
    Failing,
}

/// A recorded `align` call
#[derive(Debug, Clone, PartialEq)]
pub struct AlignCall {
    /// Transcript passed in
    pub transcript: String,
    /// Number of samples in the clip
    pub samples: usize,
}

/// Mock forced aligner
#[derive(Debug)]
pub struct MockAligner {
    behavior: AlignerBehavior,
    call_count: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<AlignCall>>>,
}

impl MockAligner {
    pub fn new(behavior: AlignerBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn even(word_ms: u64) -> Self {
        Self::new(AlignerBehavior::Even { word_ms })
    }

    pub fn unplaced() -> Self {
        Self::new(AlignerBehavior::Unplaced)
    }

    pub fn failing() -> Self {
        Self::new(AlignerBehavior::Failing)
    }

    /// Number of `align` calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every `align` call so far, in order
    pub fn calls(&self) -> Vec<AlignCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Aligner for MockAligner {
    async fn align(
        &self,
        samples: &[f32],
        transcript: &str,
        _sample_rate: u32,
    ) -> Result<Vec<AlignedWord>, KaraokeError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(AlignCall {
                transcript: transcript.to_string(),
                samples: samples.len(),
            });
        }

        let words = transcript.split_whitespace();
        match self.behavior {
            AlignerBehavior::Even { word_ms } => Ok(words
                .enumerate()
                .map(|(idx, word)| {
                    let start = idx as u64 * word_ms;
                    AlignedWord::placed(word, start, start + word_ms)
                })
                .collect()),
            AlignerBehavior::Unplaced => Ok(words.map(AlignedWord::unplaced).collect()),
            AlignerBehavior::Failing => Err(KaraokeError::Alignment("mock aligner failure".to_string())),
        }
    }
}
