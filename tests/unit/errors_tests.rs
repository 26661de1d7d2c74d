/*!
 * Tests for error types and conversions
 */

use karakara::errors::{AppError, KaraokeError, LyricsParserError};

#[test]
fn test_lyricsParserError_unbalancedTokens_shouldDisplayCounts() {
    let error = LyricsParserError::UnbalancedTokens { text: 3, tags: 0 };
    let display = format!("{}", error);
    assert!(display.contains("3 text"));
    assert!(display.contains("0 tags"));
}

#[test]
fn test_lyricsParserError_strict_shouldDisplayLine() {
    let error = LyricsParserError::Strict {
        line: 12,
        message: "unordered time tag".to_string(),
    };
    assert_eq!(error.to_string(), "line 12: unordered time tag");
}

#[test]
fn test_karaokeError_missingStem_shouldDisplayStemName() {
    let error = KaraokeError::MissingStem("vocals".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Stem not found"));
    assert!(display.contains("vocals"));
}

#[test]
fn test_appError_fromParserError_shouldWrap() {
    let error: AppError = LyricsParserError::EvenTokenCount { len: 2 }.into();
    assert!(matches!(error, AppError::Parser(LyricsParserError::EvenTokenCount { len: 2 })));
    assert!(error.to_string().starts_with("Parser error"));
}

#[test]
fn test_appError_fromKaraokeError_shouldWrap() {
    let error: AppError = KaraokeError::Alignment("timeout".to_string()).into();
    assert!(matches!(error, AppError::Karaoke(KaraokeError::Alignment(_))));
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldConvert() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.lrc");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(ref message) if message.contains("missing.lrc")));

    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref message) if message == "something odd"));
}
