/*!
 * Per-line parsing.
 *
 * A raw line is either a metadata tag, or any number of leading line tags
 * followed by a body. The body is tokenized into alternating text and time
 * tag tokens, which become a word list where each word is bounded by the
 * tags around it:
 *
 * ```text
 * text:  [0] [1] [2] [3] [4]
 *          \ | \ | \ | \ |
 * tags:    [0] [1] [2] [3]
 * ```
 *
 * A `[..]` tag between words is accepted with a `MixedBrackets` warning, it
 * reads like a folded duplicate-time tag. The last tag of a body is the
 * line end and may use either bracket: `[..]` is the line-end style and a
 * trailing `<..>` is the usual end of a by-word line, so neither warns.
 */

use log::debug;

use crate::errors::LyricsParserError;
use super::diagnostics::{Diagnostics, ParseWarning};
use super::model::{BasicLyricLine, LyricWord};
use super::timetag::{self, TagKind, TimeTag};

/// A raw input line after preprocessing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine<'a> {
    /// `[key:value]`, carries no lyric content
    Metadata { key: String, value: String },

    /// Leading line tags in input order, and the text that follows them
    Lyric { time_tags: Vec<u64>, body: &'a str },
}

/// Classify a trimmed raw line and strip its leading line tags
pub fn preprocess_line(line: &str) -> RawLine<'_> {
    if let Some((key, value)) = timetag::match_metadata(line) {
        return RawLine::Metadata { key, value };
    }

    let (time_tags, body) = split_line_timetags(line);
    RawLine::Lyric { time_tags, body }
}

/// Strip every line tag at the head of `line`
///
/// More than one tag means the same text plays at each listed time.
pub fn split_line_timetags(line: &str) -> (Vec<u64>, &str) {
    let regex = timetag::leading_line_tag_regex();
    let mut time_tags = Vec::new();
    let mut rest = line;

    while let Some(caps) = regex.captures(rest) {
        time_tags.push(timetag::captures_to_ms(&caps));
        let consumed = caps.get(0).map_or(0, |m| m.end());
        rest = &rest[consumed..];
    }

    (time_tags, rest)
}

/// One token of a line body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Tag(TimeTag),
}

/// Split a line body into text and tag tokens
///
/// Text is emitted before every tag and after the last one, even when
/// empty, so the sequence has odd length and starts and ends with text.
pub fn split_to_sequence(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last_index = 0;

    for caps in timetag::inline_tag_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        tokens.push(Token::Text(&text[last_index..whole.start()]));
        tokens.push(Token::Tag(TimeTag {
            ms: timetag::captures_to_ms(&caps),
            kind: timetag::captures_kind(&caps),
        }));
        last_index = whole.end();
    }
    tokens.push(Token::Text(&text[last_index..]));

    tokens
}

/// Parse a line body into words, logging anomalies
pub fn parse_line_content(text: &str) -> Result<Option<BasicLyricLine>, LyricsParserError> {
    parse_line_content_with(text, &mut Diagnostics::new())
}

/// Parse a line body into words, recording anomalies in `diagnostics`
///
/// Returns `None` for a blank body.
pub fn parse_line_content_with(
    text: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Option<BasicLyricLine>, LyricsParserError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let tokens = split_to_sequence(text);
    words_from_tokens(&tokens, diagnostics).map(Some)
}

/// Build the word list of a token sequence
pub fn words_from_tokens(
    tokens: &[Token<'_>],
    diagnostics: &mut Diagnostics,
) -> Result<BasicLyricLine, LyricsParserError> {
    if tokens.len() % 2 != 1 {
        return Err(LyricsParserError::EvenTokenCount { len: tokens.len() });
    }

    let mut texts: Vec<&str> = Vec::with_capacity(tokens.len() / 2 + 1);
    let mut tags: Vec<TimeTag> = Vec::with_capacity(tokens.len() / 2);
    for token in tokens {
        match token {
            Token::Text(s) => texts.push(*s),
            Token::Tag(tag) => tags.push(*tag),
        }
    }

    if texts.len() == 1 && tags.is_empty() {
        return Ok(vec![LyricWord::text(texts[0])]);
    }

    if texts.len() != tags.len() + 1 {
        return Err(LyricsParserError::UnbalancedTokens {
            text: texts.len(),
            tags: tags.len(),
        });
    }

    for (index, token) in tokens.iter().enumerate() {
        let expects_text = index % 2 == 0;
        if matches!(token, Token::Text(_)) != expects_text {
            return Err(LyricsParserError::UnexpectedToken { index });
        }
    }

    // The last tag is the line's end, where [..] is the expected style.
    for tag in &tags[..tags.len() - 1] {
        if tag.kind == TagKind::Line {
            diagnostics.warn(ParseWarning::MixedBrackets {
                line: diagnostics.line(),
                ms: tag.ms,
            });
        }
    }

    let words: BasicLyricLine = texts
        .iter()
        .enumerate()
        .map(|(idx, content)| LyricWord {
            content: content.to_string(),
            start: idx.checked_sub(1).map(|prev| tags[prev].ms),
            end: tags.get(idx).map(|tag| tag.ms),
        })
        .collect();

    let mut words = repair_order(words, diagnostics);

    // The empty head only carried the start boundary of the next word.
    if words.len() > 1 && words[0].content.is_empty() {
        words.remove(0);
    }
    if words.len() > 1 && words.last().is_some_and(|w| w.content.is_empty()) {
        words.pop();
    }

    Ok(words)
}

/// Merge words whose time tags do not strictly increase
///
/// A word that does not end after it starts, or that ends after the next
/// word starts, absorbs the next word's content and its end grows to the
/// latest bound of the pair. Missing bounds never count as a violation.
pub fn repair_order(words: BasicLyricLine, diagnostics: &mut Diagnostics) -> BasicLyricLine {
    let mut result: BasicLyricLine = Vec::with_capacity(words.len());

    for word in words {
        let violation = result.last().and_then(|prev| order_violation(prev, &word));
        if let Some((earlier, later)) = violation {
            diagnostics.warn(ParseWarning::UnorderedTimeTag {
                line: diagnostics.line(),
                prev: earlier,
                now: later,
            });
            if let Some(prev) = result.last_mut() {
                merge_word(prev, word);
                debug!("merged unordered word into {:?}", prev.content);
            }
            continue;
        }
        result.push(word);
    }

    result
}

fn merge_word(prev: &mut LyricWord, word: LyricWord) {
    prev.end = match (prev.end, word.end) {
        (Some(prev_end), Some(word_end)) => [prev.start, word.start]
            .into_iter()
            .flatten()
            .chain([prev_end, word_end])
            .max(),
        _ => None,
    };
    prev.content.push_str(&word.content);
}

/// The first pair of defined bounds that breaks `prev.start < prev.end <= cur.start`
fn order_violation(prev: &LyricWord, cur: &LyricWord) -> Option<(u64, u64)> {
    if let (Some(start), Some(end)) = (prev.start, prev.end) {
        if start >= end {
            return Some((start, end));
        }
    }
    if let (Some(end), Some(next_start)) = (prev.end, cur.start) {
        if end > next_start {
            return Some((end, next_start));
        }
    }
    None
}
