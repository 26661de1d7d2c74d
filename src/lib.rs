/*!
 * # karakara - SPL karaoke lyrics toolkit
 *
 * A Rust library for parsing, normalizing and generating karaoke lyrics in
 * the SPL format, an LRC superset with per-word timing and translation lines.
 *
 * ## Features
 *
 * - Tolerant parsing of hand-authored lyric files:
 *   - line tags, end tags and per-word `<mm:ss.fff>` tags
 *   - several timestamps for one line
 *   - translation lines sharing a timestamp with their primary line
 *   - out-of-order timing repaired by merging words
 * - Normalized serialization back to SPL text
 * - Warnings and per-line errors collected in a report, with a strict mode
 * - Word timing generation from audio through pluggable stem separation
 *   and forced alignment services
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `lyrics`: The SPL document model, parser and serializer:
 *   - `lyrics::timetag`: Time tag patterns and formatting
 *   - `lyrics::line_parser`: Per-line word timeline construction
 *   - `lyrics::assembler`: Routing of lines into a sorted document
 *   - `lyrics::serializer`: SPL text output
 *   - `lyrics::diagnostics`: Warnings, line errors and parse reports
 * - `karaoke`: Word timing generation from audio:
 *   - `karaoke::generator`: Alignment of by-line lyrics
 *   - `karaoke::mock`: Mock collaborators for tests
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod karaoke;
pub mod lyrics;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, KaraokeError, LyricsParserError};
pub use karaoke::{AlignedWord, Aligner, AudioBuffer, KaraokeGenerator, StemSeparator};
pub use lyrics::{parse, parse_with_options, parse_with_report, serialize, LyricLine, LyricWord, Lyrics, ParseReport};
