/*!
 * Document assembly.
 *
 * Lines are routed into a pool keyed by start time in a single top-down
 * pass, then frozen into a sorted document:
 * - a tagged line creates one pool entry per leading tag, or becomes a
 *   reference line of an entry that already holds that timestamp
 * - an untagged line becomes a reference line of the most recent
 *   single-tag line, unless a blank line or a duplicate-timestamp line
 *   came in between
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::app_config::ParserConfig;
use crate::errors::LyricsParserError;
use super::diagnostics::{Diagnostics, ParseReport, ParseWarning};
use super::line_parser::{self, RawLine};
use super::model::{BasicLyricLine, LyricLine, LyricWord, Lyrics};

// Every line boundary, including lone `\r` and the Unicode separators.
static LINE_BREAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("\r\n|[\n\r\x0b\x0c\x1c-\x1e\u{85}\u{2028}\u{2029}]").unwrap());

/// Parse a document, leaving out lines with format errors
pub fn parse(text: &str) -> Lyrics {
    parse_with_report(text, &ParserConfig::default()).lyrics
}

/// Parse a document, failing on any anomaly when `config.strict` is set
pub fn parse_with_options(text: &str, config: &ParserConfig) -> Result<Lyrics, LyricsParserError> {
    let report = parse_with_report(text, config);
    if config.strict {
        report.into_strict()
    } else {
        Ok(report.lyrics)
    }
}

/// Parse a document and keep every warning and line error
pub fn parse_with_report(text: &str, config: &ParserConfig) -> ParseReport {
    let text = text.trim_start_matches('\u{feff}');
    let mut pool = LinePool::new();
    let mut diagnostics = Diagnostics::new();

    for (idx, raw_line) in LINE_BREAK_REGEX.split(text).enumerate() {
        diagnostics.set_line(idx + 1);
        pool.feed(raw_line, &mut diagnostics);
    }

    let lyrics = pool.finish(config);
    let (warnings, errors) = diagnostics.into_parts();
    debug!(
        "parsed {} lines, {} warnings, {} line errors",
        lyrics.lines.len(),
        warnings.len(),
        errors.len()
    );

    ParseReport { lyrics, warnings, errors }
}

/// Accumulates lines keyed by start time across a whole document
#[derive(Debug, Default)]
pub struct LinePool {
    lines: BTreeMap<u64, LyricLine>,
    metadata: BTreeMap<String, String>,
    // Start of the last single-tag line, target of following untagged lines
    last_tag: Option<u64>,
}

impl LinePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one raw input line into the pool
    pub fn feed(&mut self, raw_line: &str, diagnostics: &mut Diagnostics) {
        let line = raw_line.trim();

        let (time_tags, body) = match line_parser::preprocess_line(line) {
            RawLine::Metadata { key, value } => {
                debug!("metadata line, not parsed as lyric: {:?}", line);
                self.metadata.insert(key, value);
                return;
            }
            RawLine::Lyric { time_tags, body } => (time_tags, body),
        };

        debug!("parsing lyric line: {:?}", line);
        let words = match line_parser::parse_line_content_with(body, diagnostics) {
            Ok(words) => words,
            Err(e) => {
                diagnostics.error(raw_line, e);
                self.last_tag = None;
                return;
            }
        };

        match words {
            None => self.place_blank(&time_tags),
            Some(words) if time_tags.is_empty() => self.place_untagged(words, diagnostics),
            Some(words) => self.place_tagged(&time_tags, words, diagnostics),
        }
    }

    /// A blank line, or one made of a single tag with nothing after it
    fn place_blank(&mut self, time_tags: &[u64]) {
        self.last_tag = None;
        debug!("reference cursor reset");

        if let [tag] = time_tags {
            self.lines
                .entry(*tag)
                .or_insert_with(|| LyricLine::with_content(vec![LyricWord::default()]));
        }
    }

    fn place_untagged(&mut self, words: BasicLyricLine, diagnostics: &mut Diagnostics) {
        let target = self.last_tag.and_then(|tag| self.lines.get_mut(&tag));
        match target {
            Some(line) => {
                debug!("adding {:?} as reference line of {:?}", words, line.content);
                line.reference_lines.push(words);
            }
            None => {
                let text: String = words.iter().map(|w| w.content.as_str()).collect();
                diagnostics.warn(ParseWarning::OrphanLine {
                    line: diagnostics.line(),
                    text,
                });
            }
        }
    }

    fn place_tagged(&mut self, time_tags: &[u64], words: BasicLyricLine, diagnostics: &mut Diagnostics) {
        let word_start = words.first().and_then(|w| w.start);
        let mut accepted = 0;

        for &tag in time_tags {
            if let Some(word_start) = word_start.filter(|&start| start < tag) {
                diagnostics.warn(ParseWarning::InvalidDuplicateTag {
                    line: diagnostics.line(),
                    tag,
                    word_start,
                });
                continue;
            }
            accepted += 1;

            match self.lines.get_mut(&tag) {
                // Two texts claim the same time, the later one is an alternate rendering
                Some(line) => line.reference_lines.push(words.clone()),
                None => {
                    let content = anchor_to_tag(words.clone(), tag, diagnostics);
                    self.lines.insert(tag, LyricLine::with_content(content));
                }
            }
        }

        // Duplicate-timestamp lines never collect following untagged lines.
        self.last_tag = match time_tags {
            [tag] if accepted == 1 => Some(*tag),
            _ => None,
        };
    }

    /// Freeze the pool into a document sorted by start time
    pub fn finish(self, config: &ParserConfig) -> Lyrics {
        let mut lines: Vec<LyricLine> = Vec::with_capacity(self.lines.len());

        for (start, mut line) in self.lines {
            line.start = Some(start);
            // A trailing tag is the line's own end, not a word boundary.
            if let Some(end) = line.content.last_mut().and_then(|w| w.end.take()) {
                line.end = Some(end);
            }
            lines.push(line);
        }

        if config.fill_implicit_line_end {
            let next_starts: Vec<Option<u64>> = lines.iter().skip(1).map(|l| l.start).collect();
            for (line, next_start) in lines.iter_mut().zip(next_starts) {
                if line.end.is_none() {
                    line.end = next_start;
                }
            }
        }

        Lyrics {
            lines,
            metadata: self.metadata,
        }
    }
}

/// Give an untimed first word the line tag as its start, then re-check ordering
fn anchor_to_tag(mut words: BasicLyricLine, tag: u64, diagnostics: &mut Diagnostics) -> BasicLyricLine {
    match words.first_mut() {
        Some(first) if first.start.is_none() => first.start = Some(tag),
        _ => return words,
    }
    line_parser::repair_order(words, diagnostics)
}
