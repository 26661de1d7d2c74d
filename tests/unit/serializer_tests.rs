/*!
 * Tests for SPL serialization
 */

use karakara::lyrics::{construct_line, format_timetag, parse, serialize, LyricWord, TagKind};

/// Test that plain lines keep their shape
#[test]
fn test_serialize_withByLineLyrics_shouldNotAddWordTags() {
    let lyrics = parse("[00:05.00]今天天气真好\n[00:15.00]这句歌词只持续两秒哦[00:17.00]");
    assert_eq!(
        serialize(&lyrics),
        "\n[00:05.000]今天天气真好\n\n[00:15.000]这句歌词只持续两秒哦[00:17.000]\n"
    );
}

/// Test the per-word timeline and its promoted end
#[test]
fn test_serialize_withByWordLine_shouldWriteContiguousTags() {
    let lyrics = parse("[00:40.00]要<00:41.00>吃<00:41.5>小[00:44]");
    assert_eq!(
        serialize(&lyrics),
        "\n[00:40.000]要<00:41.000>吃<00:41.500>小[00:44.000]\n"
    );
}

/// Test that a delayed first word keeps its angle tag
#[test]
fn test_serialize_withDelayedStart_shouldKeepFirstWordTag() {
    let lyrics = parse("[00:40.00]<00:41.00>要<00:42.00>吃");
    assert_eq!(serialize(&lyrics), "\n[00:40.000]<00:41.000>要<00:42.000>吃\n");
}

/// Test metadata and reference lines
#[test]
fn test_serialize_withMetadataAndReferences_shouldWriteThemInPlace() {
    let lyrics = parse("[ar:someone]\n[ti:song]\n[00:01.00]君が好き\nkimi ga suki\n[00:01.00]I like you");
    assert_eq!(
        serialize(&lyrics),
        "[ar: someone]\n[ti: song]\n\n[00:01.000]君が好き\n[00:01.000]kimi ga suki\n[00:01.000]I like you\n"
    );
}

/// Test repeated timestamps are written as separate lines
#[test]
fn test_serialize_withDuplicateTimestamps_shouldWriteEachOccurrence() {
    let lyrics = parse("[00:30.00][00:10.00]副歌");
    assert_eq!(serialize(&lyrics), "\n[00:10.000]副歌\n\n[00:30.000]副歌\n");
}

/// Test tags that need more than two minute digits
#[test]
fn test_formatTimetag_withLongTrack_shouldGrowMinutes() {
    assert_eq!(format_timetag(125 * 60_000 + 1_500, TagKind::Line), "[125:01.500]");
    assert_eq!(format_timetag(0, TagKind::Word), "<00:00.000>");
}

/// Test a reference line with its own word timing
#[test]
fn test_constructLine_withoutImpliedStart_shouldWriteFirstTag() {
    let words = vec![
        LyricWord::timed("I", Some(1_000), Some(1_200)),
        LyricWord::timed("like", Some(1_200), None),
    ];
    assert_eq!(construct_line(&words, None), "<00:01.000>I<00:01.200>like");
}
