/*!
 * Time tag and metadata tag matching.
 *
 * Recognized shapes:
 * - line tag `[m:s.f]`, also used for a line's trailing end tag
 * - word tag `<m:s.f>`
 * - strict line tag `[mm:ss.ff]` / `[mm:ss.fff]`, for standalone validation
 * - metadata tag `[key:value]`
 *
 * Minutes take 1-4 digits, seconds 1-2 digits, the fraction 1-6 digits.
 * The fraction is a left-aligned decimal: `.5` is 500 ms, `.123456` is 123 ms.
 */

use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const LINE_TAG: &str =
    r"\[\s*(?P<min>[0-9]{1,4})\s*:\s*(?P<sec>[0-9]{1,2})\s*(?:[:.]\s*(?P<frac>[0-9]{1,6})\s*)?\]";

const WORD_TAG: &str =
    r"<\s*(?P<wmin>[0-9]{1,4})\s*:\s*(?P<wsec>[0-9]{1,2})\s*(?:[:.]\s*(?P<wfrac>[0-9]{1,6})\s*)?>";

// Compiled once, shared read-only afterwards.
static LEADING_LINE_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}", LINE_TAG)).unwrap());

static INLINE_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("{}|{}", LINE_TAG, WORD_TAG)).unwrap());

static STRICT_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(?P<min>[0-9]{1,4}):(?P<sec>[0-9]{1,2})\.(?P<frac>[0-9]{2,3})\]$").unwrap()
});

static METADATA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\s*(?P<key>[a-zA-Z]{2,5})\s*:\s*(?P<value>.+?)\s*\]$").unwrap()
});

/// Bracket style of a time tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `[mm:ss.fff]`
    Line,
    /// `<mm:ss.fff>`
    Word,
}

/// A time tag found inside a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTag {
    /// Value in milliseconds
    pub ms: u64,
    /// Bracket style the tag was written in
    pub kind: TagKind,
}

/// Pattern matching leading line tags, anchored at the start of the text
pub fn leading_line_tag_regex() -> &'static Regex {
    &LEADING_LINE_TAG_REGEX
}

/// Pattern matching either a line tag or a word tag anywhere in the text
pub fn inline_tag_regex() -> &'static Regex {
    &INLINE_TAG_REGEX
}

/// Convert the groups of a time tag match to milliseconds
pub fn captures_to_ms(caps: &Captures) -> u64 {
    let group = |line: &str, word: &str| caps.name(line).or_else(|| caps.name(word));
    let number = |line: &str, word: &str| -> u64 {
        group(line, word).map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };

    let minutes = number("min", "wmin");
    let seconds = number("sec", "wsec");
    let millis = group("frac", "wfrac").map_or(0, |m| fraction_to_ms(m.as_str()));

    (minutes * 60 + seconds) * 1000 + millis
}

/// Which bracket style produced a match of `inline_tag_regex`
pub fn captures_kind(caps: &Captures) -> TagKind {
    if caps.name("wmin").is_some() {
        TagKind::Word
    } else {
        TagKind::Line
    }
}

/// Normalize a fraction digit run to milliseconds
///
/// Longer runs are truncated to 3 digits, shorter ones right-padded with zeros.
fn fraction_to_ms(digits: &str) -> u64 {
    let mut normalized: String = digits.chars().take(3).collect();
    while normalized.len() < 3 {
        normalized.push('0');
    }
    normalized.parse().unwrap_or(0)
}

/// Validate a standalone `[mm:ss.ff]` / `[mm:ss.fff]` tag, returning its value in ms
pub fn validate_timetag_strict(s: &str) -> Option<u64> {
    STRICT_TAG_REGEX.captures(s).map(|caps| captures_to_ms(&caps))
}

/// Match a whole line against the metadata grammar, returning `(key, value)`
pub fn match_metadata(line: &str) -> Option<(String, String)> {
    let caps = METADATA_REGEX.captures(line)?;
    let key = caps.name("key")?.as_str().to_string();
    let value = caps.name("value")?.as_str().to_string();
    Some((key, value))
}

/// Largest minute count a tag can hold
const MAX_MINUTES: u64 = 9_999;

/// Largest value a tag can express, `[9999:99.999]`
pub const MAX_TAG_MS: u64 = (MAX_MINUTES * 60 + 99) * 1_000 + 999;

/// Render milliseconds as a line or word tag
///
/// Past 9999 minutes the remainder goes to the seconds field, which the
/// grammar lets reach 99. Larger values are clamped to `MAX_TAG_MS`.
pub fn format_timetag(ms: u64, kind: TagKind) -> String {
    if ms > MAX_TAG_MS {
        warn!("time {} ms is out of tag range, clamped to {} ms", ms, MAX_TAG_MS);
    }
    let ms = ms.min(MAX_TAG_MS);
    let minutes = (ms / 60_000).min(MAX_MINUTES);
    let seconds = (ms - minutes * 60_000) / 1_000;
    let millis = ms % 1_000;

    match kind {
        TagKind::Line => format!("[{:02}:{:02}.{:03}]", minutes, seconds, millis),
        TagKind::Word => format!("<{:02}:{:02}.{:03}>", minutes, seconds, millis),
    }
}
