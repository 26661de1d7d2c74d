/*!
 * Karaoke generation with mock collaborators
 */

use karakara::app_config::KaraokeConfig;
use karakara::errors::KaraokeError;
use karakara::karaoke::mock::{AlignCall, MockAligner, MockSeparator};
use karakara::karaoke::{AudioBuffer, KaraokeGenerator};
use karakara::lyrics::{parse, LyricWord, Lyrics};
use crate::common;

const SAMPLE_RATE: u32 = 16_000;

fn ten_seconds() -> AudioBuffer {
    AudioBuffer::mono(vec![0.0; 10 * SAMPLE_RATE as usize], SAMPLE_RATE)
}

fn latin(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

fn sample_lyrics() -> Lyrics {
    parse(
        "[00:01.00]作词：someone
[00:02.00]hello world
[00:04.00]你好
[00:05.00]la la[00:06.00]
[00:08.00]<00:08.00>already<00:09.00>timed",
    )
}

#[tokio::test]
async fn test_generate_withSelectedLines_shouldAlignOnlyThem() {
    common::init_logger();
    let lyrics = sample_lyrics();
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::even(300), KaraokeConfig::default());

    let result = generator.generate(&lyrics, &ten_seconds(), latin).await.unwrap();

    assert_eq!(result.lines[0], lyrics.lines[0]);
    assert_eq!(
        result.lines[1].content,
        vec![
            LyricWord::timed("hello ", Some(2_000), Some(2_300)),
            LyricWord::timed("world", Some(2_300), Some(2_600)),
        ]
    );
    assert_eq!(result.lines[2], lyrics.lines[2]);
    assert_eq!(
        result.lines[3].content,
        vec![
            LyricWord::timed("la ", Some(5_000), Some(5_300)),
            LyricWord::timed("la", Some(5_300), Some(5_600)),
        ]
    );
    assert_eq!(result.lines[3].end, Some(6_000));
    assert_eq!(result.lines[4], lyrics.lines[4]);
}

#[tokio::test]
async fn test_generate_shouldClipAudioToLineBounds() {
    let aligner = MockAligner::even(100);
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), aligner, KaraokeConfig::default());

    generator.generate(&sample_lyrics(), &ten_seconds(), latin).await.unwrap();

    assert_eq!(
        generator.aligner().calls(),
        vec![
            // Until the next line's start
            AlignCall { transcript: "hello world".to_string(), samples: 2 * SAMPLE_RATE as usize },
            // Until the line's own end
            AlignCall { transcript: "la la".to_string(), samples: SAMPLE_RATE as usize },
        ]
    );
}

#[tokio::test]
async fn test_generate_withLinesPastTrackEnd_shouldClampClips() {
    let lyrics = parse("[00:09.00]last words\n[00:20.00]too late");
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::even(100), KaraokeConfig::default());

    let result = generator.generate(&lyrics, &ten_seconds(), latin).await.unwrap();

    let calls = generator.aligner().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].samples, SAMPLE_RATE as usize);
    assert_eq!(result.lines[1], lyrics.lines[1]);
}

#[tokio::test]
async fn test_generate_withFailingAligner_shouldLeaveLinesUnchanged() {
    let lyrics = sample_lyrics();
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::failing(), KaraokeConfig::default());

    let result = generator.generate(&lyrics, &ten_seconds(), latin).await.unwrap();

    assert_eq!(result, lyrics);
    assert_eq!(generator.aligner().call_count(), 2);
}

#[tokio::test]
async fn test_generate_withUnplacedWords_shouldKeepWholeText() {
    let lyrics = parse("[00:02.00]hello world");
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::unplaced(), KaraokeConfig::default());

    let result = generator.generate(&lyrics, &ten_seconds(), latin).await.unwrap();
    assert_eq!(result, lyrics);
}

fn detect_script(text: &str) -> Option<String> {
    let code = if text.is_ascii() { "EN" } else { "zh" };
    Some(code.to_string())
}

#[tokio::test]
async fn test_generateForLanguage_withDefaultTarget_shouldAlignDetectedLines() {
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::even(100), KaraokeConfig::default());

    generator.generate_for_language(&sample_lyrics(), &ten_seconds(), detect_script).await.unwrap();

    let transcripts: Vec<String> = generator.aligner().calls().into_iter().map(|c| c.transcript).collect();
    assert_eq!(transcripts, vec!["hello world".to_string(), "la la".to_string()]);
}

#[tokio::test]
async fn test_generateForLanguage_withOtherTarget_shouldSwitchLines() {
    let config = KaraokeConfig {
        target_language: "zh".to_string(),
        ..Default::default()
    };
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::even(100), config);

    generator.generate_for_language(&sample_lyrics(), &ten_seconds(), detect_script).await.unwrap();

    let transcripts: Vec<String> = generator.aligner().calls().into_iter().map(|c| c.transcript).collect();
    assert_eq!(transcripts, vec!["你好".to_string()]);
}

#[tokio::test]
async fn test_generateForLanguage_withUndetectedText_shouldAlignNothing() {
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::even(100), KaraokeConfig::default());

    let result = generator.generate_for_language(&sample_lyrics(), &ten_seconds(), |_| None).await.unwrap();

    assert_eq!(result, sample_lyrics());
    assert_eq!(generator.aligner().call_count(), 0);
}

#[tokio::test]
async fn test_generate_withCreditLinesAllowed_shouldAlignThem() {
    let lyrics = parse("[00:01.00]作词：someone");
    let config = KaraokeConfig {
        skip_credit_lines: false,
        ..Default::default()
    };
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::even(100), config);

    generator.generate(&lyrics, &ten_seconds(), latin).await.unwrap();
    assert_eq!(generator.aligner().call_count(), 1);
}

#[tokio::test]
async fn test_generate_withSeparatorFailure_shouldFail() {
    let generator = KaraokeGenerator::new(MockSeparator::failing(), MockAligner::even(100), KaraokeConfig::default());

    let result = generator.generate(&sample_lyrics(), &ten_seconds(), latin).await;
    assert!(matches!(result, Err(KaraokeError::Separation(_))));
}

#[tokio::test]
async fn test_generate_withMissingVocalStem_shouldFail() {
    let generator = KaraokeGenerator::new(MockSeparator::with_stem("drums"), MockAligner::even(100), KaraokeConfig::default());

    let result = generator.generate(&sample_lyrics(), &ten_seconds(), latin).await;
    assert!(matches!(result, Err(KaraokeError::MissingStem(ref stem)) if stem == "vocals"));
}

#[tokio::test]
async fn test_generate_withWrongSampleRate_shouldRejectAudio() {
    let generator = KaraokeGenerator::new(MockSeparator::passthrough(), MockAligner::even(100), KaraokeConfig::default());
    let audio = AudioBuffer::mono(vec![0.0; 44_100], 44_100);

    let result = generator.generate(&sample_lyrics(), &audio, latin).await;
    assert!(matches!(result, Err(KaraokeError::InvalidAudio(_))));
    assert_eq!(generator.aligner().call_count(), 0);
}
