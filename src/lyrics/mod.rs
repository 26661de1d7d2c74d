/*!
 * SPL lyric parsing and serialization.
 *
 * SPL is an LRC superset carrying per-line start/end tags, per-word angle
 * tags, duplicate-timestamp lines and translation lines that share a
 * timestamp with their primary line.
 *
 * # Architecture
 *
 * - `timetag`: Time tag and metadata tag patterns, millisecond conversion
 * - `line_parser`: Per-line preprocessing and word timeline construction
 * - `assembler`: Line pool that routes parsed lines into a sorted document
 * - `serializer`: Reconstructs SPL text from a document
 * - `diagnostics`: Warnings and per-line errors collected during a parse
 * - `model`: The document types
 */

pub mod model;
pub mod timetag;
pub mod line_parser;
pub mod assembler;
pub mod serializer;
pub mod diagnostics;

// Re-export main types
pub use model::{BasicLyricLine, LyricLine, LyricWord, Lyrics};
pub use assembler::{parse, parse_with_options, parse_with_report, LinePool};
pub use serializer::{construct_line, serialize};
pub use diagnostics::{LineError, ParseReport, ParseWarning};
pub use timetag::{format_timetag, validate_timetag_strict, TagKind};
