/*!
 * Fills word timing of by-line lyrics from a vocal track.
 */

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::KaraokeConfig;
use crate::errors::KaraokeError;
use crate::lyrics::diagnostics::Diagnostics;
use crate::lyrics::line_parser::repair_order;
use crate::lyrics::{BasicLyricLine, LyricLine, LyricWord, Lyrics};
use super::{ms_to_sample, AlignedWord, Aligner, AudioBuffer, StemSeparator};

// Credit lines like `作词：someone` are sung by nobody.
static CREDIT_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(作?词|作?曲|编曲|演?唱|专辑|歌手?|制作人?|和声|混音?|录音?|监制|策划|封面设计|文案|出品|OP|SP|翻译|PV|母带|调教|调校|曲?绘|原曲|編曲|作詞|唄|呗)\s*[：:].+",
    )
    .unwrap()
});

/// Whether a line is a credit such as `作曲: someone` rather than sung text
pub fn is_credit_line(text: &str) -> bool {
    CREDIT_LINE_REGEX.is_match(text)
}

/// Generates word timing with a stem separator and a forced aligner
#[derive(Debug)]
pub struct KaraokeGenerator<S, A> {
    separator: S,
    aligner: A,
    config: KaraokeConfig,
}

impl<S: StemSeparator, A: Aligner> KaraokeGenerator<S, A> {
    pub fn new(separator: S, aligner: A, config: KaraokeConfig) -> Self {
        Self {
            separator,
            aligner,
            config,
        }
    }

    pub fn aligner(&self) -> &A {
        &self.aligner
    }

    /// Return a copy of `lyrics` with word timing on every selected by-line line
    ///
    /// `select` receives the text of each single-word line and decides whether
    /// it should be aligned, typically by checking its language. A line whose
    /// alignment fails is logged and left unchanged.
    pub async fn generate<F>(&self, lyrics: &Lyrics, audio: &AudioBuffer, select: F) -> Result<Lyrics, KaraokeError>
    where
        F: Fn(&str) -> bool,
    {
        if audio.sample_rate != self.config.sample_rate {
            return Err(KaraokeError::InvalidAudio(format!(
                "expected {} Hz audio, got {} Hz",
                self.config.sample_rate, audio.sample_rate
            )));
        }
        if audio.is_empty() {
            return Err(KaraokeError::InvalidAudio("audio has no samples".to_string()));
        }

        let stems = self.separator.separate(audio).await?;
        let vocal_stem = stems
            .get(&self.config.vocal_stem)
            .ok_or_else(|| KaraokeError::MissingStem(self.config.vocal_stem.clone()))?;
        let samples = vocal_stem
            .channels
            .first()
            .ok_or_else(|| KaraokeError::InvalidAudio("vocal stem has no channels".to_string()))?;
        let sample_rate = vocal_stem.sample_rate;

        let mut output = lyrics.clone();
        let next_starts: Vec<Option<u64>> = output
            .lines
            .iter()
            .skip(1)
            .map(|l| l.start)
            .chain(std::iter::once(None))
            .collect();

        for (idx, (line, next_start)) in output.lines.iter_mut().zip(next_starts).enumerate() {
            let Some(text) = self.alignable_text(line, &select) else {
                continue;
            };

            let line_start = line.start.unwrap_or(0);
            let start = ms_to_sample(line_start, sample_rate);
            let end = line
                .end
                .or(next_start)
                .map_or(samples.len(), |ms| ms_to_sample(ms, sample_rate))
                .min(samples.len());
            if start >= end {
                warn!("line {}: no audio between samples {} and {}, skipped: {:?}", idx, start, end, text);
                continue;
            }

            info!("aligning line {}: samples [{}, {}) {:?}", idx, start, end, text);
            match self.aligner.align(&samples[start..end], &text, sample_rate).await {
                Ok(aligned) => line.content = splice_words(&text, &aligned, line.start),
                Err(e) => warn!("line {}: alignment failed, line left unchanged: {}", idx, e),
            }
        }

        Ok(output)
    }

    /// Like `generate`, selecting the lines in the configured target language
    ///
    /// `detect` returns the language code of a text, or `None` when unsure.
    /// Codes are compared ignoring ASCII case.
    pub async fn generate_for_language<D>(
        &self,
        lyrics: &Lyrics,
        audio: &AudioBuffer,
        detect: D,
    ) -> Result<Lyrics, KaraokeError>
    where
        D: Fn(&str) -> Option<String>,
    {
        let target = self.config.target_language.as_str();
        info!("aligning lines detected as {:?}", target);
        self.generate(lyrics, audio, |text| {
            detect(text).is_some_and(|language| language.eq_ignore_ascii_case(target))
        })
        .await
    }

    fn alignable_text<F>(&self, line: &LyricLine, select: &F) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        let [word] = line.content.as_slice() else {
            return None;
        };
        let text = word.content.as_str();
        if text.is_empty() || !select(text) {
            debug!("not selected for alignment: {:?}", text);
            return None;
        }
        if self.config.skip_credit_lines && is_credit_line(text) {
            info!("found credit line, skip: {:?}", text);
            return None;
        }
        Some(text.to_string())
    }
}

/// Turn aligner output into words covering the whole of `text`
///
/// Text between two placed words becomes a gap word from the previous end to
/// the next start. Positions are shifted by the line start.
fn splice_words(text: &str, aligned: &[AlignedWord], line_start: Option<u64>) -> BasicLyricLine {
    let offset = line_start.unwrap_or(0);
    let mut words: BasicLyricLine = Vec::new();
    let mut cursor = 0;

    for aligned_word in aligned {
        let Some((start, end)) = aligned_word.position else {
            debug!("aligner could not place {:?}", aligned_word.word);
            continue;
        };
        let Some(found) = text[cursor..].find(&aligned_word.word).map(|pos| cursor + pos) else {
            debug!("aligned word {:?} not found after byte {}", aligned_word.word, cursor);
            continue;
        };

        if found > cursor {
            let gap = &text[cursor..found];
            let gap_start = words.last().map_or(line_start, |w| w.end);
            match words.last_mut() {
                // No pause between the words, the gap text belongs to the previous one.
                Some(prev) if prev.end == Some(start + offset) => prev.content.push_str(gap),
                _ => words.push(LyricWord::timed(gap, gap_start, Some(start + offset))),
            }
        }
        words.push(LyricWord::timed(
            aligned_word.word.as_str(),
            Some(start + offset),
            Some(end + offset),
        ));
        cursor = found + aligned_word.word.len();
    }

    let tail = &text[cursor..];
    if !tail.is_empty() || words.is_empty() {
        let tail_start = words.last().map_or(line_start, |w| w.end);
        words.push(LyricWord::timed(tail, tail_start, None));
    }

    repair_order(words, &mut Diagnostics::new())
}
