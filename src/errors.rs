/*!
 * Error types for the karakara crate.
 *
 * This module contains custom error types for the different parts of the
 * crate, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while turning a line of SPL text into words
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LyricsParserError {
    /// The text/tag token sequence of a line did not have odd length
    #[error("token sequence length is expected to be odd, got {len}")]
    EvenTokenCount {
        /// Length of the offending sequence
        len: usize,
    },

    /// The text tokens did not outnumber the tag tokens by exactly one
    #[error("expected exactly one more text token than tag tokens, got {text} text and {tags} tags")]
    UnbalancedTokens {
        /// Number of text tokens
        text: usize,
        /// Number of tag tokens
        tags: usize,
    },

    /// A token appeared at a position where the other kind was expected
    #[error("token {index} breaks the text/tag alternation")]
    UnexpectedToken {
        /// Position of the token in the sequence
        index: usize,
    },

    /// Strict mode turned a recoverable anomaly into a failure
    #[error("line {line}: {message}")]
    Strict {
        /// 1-based line number, 0 when the anomaly is not tied to an input line
        line: usize,
        /// Description of the anomaly
        message: String,
    },
}

/// Errors that can occur while generating karaoke timing from audio
#[derive(Error, Debug)]
pub enum KaraokeError {
    /// The stem separator failed
    #[error("Stem separation failed: {0}")]
    Separation(String),

    /// The forced aligner failed
    #[error("Alignment failed: {0}")]
    Alignment(String),

    /// The separator did not return the requested stem
    #[error("Stem not found in separation result: {0}")]
    MissingStem(String),

    /// The audio buffer cannot be used
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration handling
    #[error("Config error: {0}")]
    Config(String),

    /// Error from lyric parsing
    #[error("Parser error: {0}")]
    Parser(#[from] LyricsParserError),

    /// Error from karaoke generation
    #[error("Karaoke error: {0}")]
    Karaoke(#[from] KaraokeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
