/*!
 * Parse/serialize round trips on whole documents
 *
 * Serialization may differ from the input in fraction width, merged
 * unordered tags and promoted end tags, but reparsing it must give back
 * exactly the same document.
 */

use anyhow::Result;
use karakara::app_config::ParserConfig;
use karakara::file_utils::FileManager;
use karakara::lyrics::{parse, parse_with_options, serialize, LyricWord, Lyrics};
use crate::common;

fn assert_stable(text: &str) -> Lyrics {
    let parsed = parse(text);
    let serialized = serialize(&parsed);
    let reparsed = parse(&serialized);
    assert_eq!(reparsed, parsed, "unstable round trip through:\n{}", serialized);
    assert_eq!(serialize(&reparsed), serialized);
    parsed
}

#[test]
fn test_roundTrip_withSampleDocument_shouldBeStable() {
    common::init_logger();
    let lyrics = assert_stable(common::SAMPLE_LYRICS);
    assert_eq!(lyrics.len(), 7);
}

#[test]
fn test_roundTrip_withUnorderedTags_shouldKeepMergedWords() {
    let lyrics = assert_stable("[00:50.000]第一遍<00:49.000>正常<00:52.000>");
    assert_eq!(lyrics.lines[0].text(), "第一遍正常");
    assert_eq!(serialize(&lyrics), "\n[00:50.000]第一遍正常[00:52.000]\n");
}

#[test]
fn test_roundTrip_withTimedReferenceLines_shouldKeepReferenceTiming() {
    let lyrics = assert_stable("[00:10.00]我<00:10.50>爱你\n[00:10.00]I<00:10.40>love you[00:11.00]\n");
    let reference = &lyrics.lines[0].reference_lines[0];
    assert_eq!(reference[0].start, None);
    assert_eq!(reference[0].end, Some(10_400));
    assert_eq!(reference[1].end, Some(11_000));
}

#[test]
fn test_roundTrip_withUntaggedReferenceStartingEarly_shouldKeepReference() {
    let lyrics = assert_stable("[00:10.000]a\n<00:05.000>b\nplain\n<00:12.000>late<00:13.000>");
    let references = &lyrics.lines[0].reference_lines;
    assert_eq!(references.len(), 3);
    assert_eq!(references[0], vec![LyricWord::timed("b", Some(5_000), None)]);
    assert_eq!(references[2][0].start, Some(12_000));
}

#[test]
fn test_roundTrip_withEarlyReferencesOnSeveralLines_shouldKeepEachOnItsLine() {
    let lyrics = assert_stable(
        "[00:10.000]a[00:11.000]\n<00:01.000>x\n[00:10.000]alt\n<00:02.000>y\n[00:20.000]<00:20.500>c\n<00:03.000>z",
    );
    assert_eq!(lyrics.lines[0].reference_lines.len(), 3);
    assert_eq!(lyrics.lines[1].reference_lines.len(), 1);
}

#[test]
fn test_roundTrip_withLargestTimestamps_shouldBeStable() {
    let lyrics = assert_stable("[9999:99.999]last\n[9999:00.000]<9999:61.500>a[9999:62.000]");
    assert_eq!(lyrics.lines.len(), 2);
    assert_eq!(lyrics.lines[1].start, Some(((9_999 * 60 + 99) * 1_000) + 999));
    assert_eq!(lyrics.lines[0].end, Some((9_999 * 60 + 62) * 1_000));
}

#[test]
fn test_roundTrip_withTimedEmptyBody_shouldKeepWordStart() {
    let lyrics = assert_stable("[00:03.000]<00:03.000>\nref");
    assert_eq!(lyrics.lines[0].content, vec![LyricWord::timed("", Some(3_000), None)]);
    assert_eq!(lyrics.lines[0].reference_lines.len(), 1);
}

#[test]
fn test_roundTrip_withPlaceholdersAndGaps_shouldBeStable() {
    assert_stable("[00:01]a<00:01.5><00:02>b\n[00:03]\n[00:03]alt\n[00:04]<00:04.2>");
}

#[test]
fn test_roundTrip_withMixedBracketsAndOrphans_shouldBeStable() {
    assert_stable("lost\n[00:01.00]a[00:02.00]b[00:03.00]\nref\n\nlost again\n[00:09.00][00:05.00]dup");
}

#[test]
fn test_roundTrip_withFilledLineEnds_shouldBeStable() {
    let config = ParserConfig {
        fill_implicit_line_end: true,
        ..Default::default()
    };
    let parsed = parse_with_options("[00:01.00]a\n[00:02.00]b\n[00:03.00]c", &config).unwrap();
    let reparsed = parse_with_options(&serialize(&parsed), &config).unwrap();
    assert_eq!(reparsed, parsed);
    assert_eq!(parsed.lines[0].end, Some(2_000));
}

#[test]
fn test_roundTrip_throughFiles_shouldBeStable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "song.lrc", common::SAMPLE_LYRICS)?;

    let parsed = parse(&FileManager::read_to_string(&input)?);
    let output = FileManager::generate_output_path(&input, temp_dir.path(), "normalized");
    FileManager::write_to_file(&output, &serialize(&parsed))?;

    assert_eq!(parse(&FileManager::read_to_string(&output)?), parsed);
    Ok(())
}
