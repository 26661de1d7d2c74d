/*!
 * SPL text output.
 *
 * Output is normalized: metadata first, every tag padded to
 * `mm:ss.fff`, a blank line before each lyric line, and reference lines
 * written right below their line under the same line tag.
 *
 * A reference whose first word starts before its line cannot carry the
 * line tag, the tag would be rejected on reparse. It is written without
 * one and attaches to the single-tag line written just above it.
 */

use log::warn;
use std::fmt;

use super::model::{BasicLyricLine, Lyrics};
use super::timetag::{format_timetag, TagKind};

/// Render one word list as tagged text
///
/// A word's start tag is written only where it is not implied, that is when
/// it differs from the previous word's end. For the first word the implied
/// start is `implied_start`, the line tag the words are written after.
pub fn construct_line(words: &BasicLyricLine, implied_start: Option<u64>) -> String {
    let mut out = String::new();
    let mut previous_end = implied_start;

    for word in words {
        if let Some(start) = word.start.filter(|&start| previous_end != Some(start)) {
            out.push_str(&format_timetag(start, TagKind::Word));
        }
        out.push_str(&word.content);
        if let Some(end) = word.end {
            out.push_str(&format_timetag(end, TagKind::Word));
        }
        previous_end = word.end;
    }

    out
}

/// Render a document as SPL text
pub fn serialize(lyrics: &Lyrics) -> String {
    let mut out = String::new();

    for (key, value) in &lyrics.metadata {
        out.push_str(&format!("[{}: {}]\n", key, value));
    }

    for line in &lyrics.lines {
        let Some(start) = line.start else {
            warn!("skipping line without start time: {:?}", line.text());
            continue;
        };
        let line_tag = format_timetag(start, TagKind::Line);

        let mut body = construct_line(&line.content, Some(start));
        // An empty body would read back as a placeholder without word timing.
        if body.is_empty() && line.content.first().is_some_and(|w| w.start.is_some()) {
            body = construct_line(&line.content, None);
        }

        out.push('\n');
        out.push_str(&line_tag);
        out.push_str(&body);
        if let Some(end) = line.end {
            out.push_str(&format_timetag(end, TagKind::Line));
        }
        out.push('\n');

        // Reference words keep every tag, they are never anchored on reparse.
        for reference in &line.reference_lines {
            let starts_early = reference.first().and_then(|w| w.start).is_some_and(|s| s < start);
            if !starts_early {
                out.push_str(&line_tag);
            }
            out.push_str(&construct_line(reference, None));
            out.push('\n');
        }
    }

    out
}

impl fmt::Display for Lyrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}
