/*!
 * Diagnostics collected while parsing a document.
 *
 * Format errors exclude a single line from the result; warnings never
 * change control flow. Both are logged as they are recorded, and kept in a
 * `ParseReport` so callers can apply their own strictness.
 */

use log::{error, warn};
use serde::Serialize;
use std::fmt;

use crate::errors::LyricsParserError;
use super::model::Lyrics;

/// Recoverable anomaly found during a parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseWarning {
    /// A time tag was not later than the tag before it; the words were merged
    UnorderedTimeTag { line: usize, prev: u64, now: u64 },

    /// A line-style tag was used as an in-line word boundary
    MixedBrackets { line: usize, ms: u64 },

    /// A tag-free line with no preceding single-tag line to attach to
    OrphanLine { line: usize, text: String },

    /// A leading tag that is later than the first word's own start
    InvalidDuplicateTag { line: usize, tag: u64, word_start: u64 },
}

impl ParseWarning {
    /// 1-based input line the warning was raised on
    pub fn line(&self) -> usize {
        match self {
            ParseWarning::UnorderedTimeTag { line, .. }
            | ParseWarning::MixedBrackets { line, .. }
            | ParseWarning::OrphanLine { line, .. }
            | ParseWarning::InvalidDuplicateTag { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnorderedTimeTag { line, prev, now } => {
                write!(f, "line {}: unordered time tag, {}ms follows {}ms; words merged", line, now, prev)
            }
            ParseWarning::MixedBrackets { line, ms } => {
                write!(
                    f,
                    "line {}: [..] tag at {}ms used inside a line, <..> is expected for word timing",
                    line, ms
                )
            }
            ParseWarning::OrphanLine { line, text } => {
                write!(f, "line {}: untagged line with nothing to attach to: {:?}", line, text)
            }
            ParseWarning::InvalidDuplicateTag { line, tag, word_start } => {
                write!(
                    f,
                    "line {}: ignored line tag {}ms, first word already starts at {}ms",
                    line, tag, word_start
                )
            }
        }
    }
}

/// A line excluded from the result because of a format error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based input line
    pub line: usize,
    /// Raw text of the line
    pub raw: String,
    /// What went wrong
    pub error: LyricsParserError,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.error, self.raw)
    }
}

/// Collects diagnostics for the line currently being parsed
#[derive(Debug, Default)]
pub struct Diagnostics {
    line: usize,
    warnings: Vec<ParseWarning>,
    errors: Vec<LineError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the 1-based line number attached to subsequent diagnostics
    pub fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Log and record a warning
    pub fn warn(&mut self, warning: ParseWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Log and record a format error for the current line
    pub fn error(&mut self, raw: &str, error: LyricsParserError) {
        let line_error = LineError {
            line: self.line,
            raw: raw.to_string(),
            error,
        };
        error!("{}", line_error);
        self.errors.push(line_error);
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<ParseWarning>, Vec<LineError>) {
        (self.warnings, self.errors)
    }
}

/// Outcome of parsing a whole document
#[derive(Debug, Clone)]
pub struct ParseReport {
    /// The document, without the lines listed in `errors`
    pub lyrics: Lyrics,
    /// Recoverable anomalies, in input order
    pub warnings: Vec<ParseWarning>,
    /// Lines excluded because of format errors, in input order
    pub errors: Vec<LineError>,
}

impl ParseReport {
    /// No warnings and no errors
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Fail on the first line error, then on the first warning
    pub fn into_strict(self) -> Result<Lyrics, LyricsParserError> {
        if let Some(line_error) = self.errors.into_iter().next() {
            return Err(line_error.error);
        }
        if let Some(warning) = self.warnings.into_iter().next() {
            return Err(LyricsParserError::Strict {
                line: warning.line(),
                message: warning.to_string(),
            });
        }
        Ok(self.lyrics)
    }
}
