/*!
 * Document model for SPL lyrics.
 *
 * All times are milliseconds from the start of the track.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One timed (or untimed) piece of a lyric line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricWord {
    /// Text of the word, may be empty when the word only carries a boundary
    #[serde(default)]
    pub content: String,

    /// Start time in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,

    /// End time in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
}

impl LyricWord {
    /// Create an untimed word
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            start: None,
            end: None,
        }
    }

    /// Create a word with explicit bounds
    pub fn timed(content: impl Into<String>, start: Option<u64>, end: Option<u64>) -> Self {
        Self {
            content: content.into(),
            start,
            end,
        }
    }
}

/// One rendering of one line's text
pub type BasicLyricLine = Vec<LyricWord>;

/// A lyric line with its primary content and alternate renderings
///
/// Recognized line shapes, named here for reference only:
///
/// ```text
/// EMPTY      ``
/// PURE_TEXT  `如果时间逃走了 还有谁会记得我`
/// BYLINE     `[00:47.07]如果时间逃走了 还有谁会记得我[00:51.90]`
/// BYWORD     `[00:47.07]如果时间逃走了<00:49.45>还有谁会记得我[00:51.90]`
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Start time in ms, always set once the line is part of a `Lyrics`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,

    /// End time in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,

    /// Primary content
    #[serde(default)]
    pub content: BasicLyricLine,

    /// Translations and other renderings sharing this line's start
    #[serde(default)]
    pub reference_lines: Vec<BasicLyricLine>,
}

impl LyricLine {
    /// Create a line whose content is the given words
    pub fn with_content(content: BasicLyricLine) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }

    /// Concatenated text of the primary content
    pub fn text(&self) -> String {
        self.content.iter().map(|w| w.content.as_str()).collect()
    }
}

/// A parsed SPL document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    /// Lines sorted ascending by start
    #[serde(default)]
    pub lines: Vec<LyricLine>,

    /// Metadata tags such as `ti`, `ar`, `al`
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Lyrics {
    /// Number of lines in the document
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
