use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Lyric parser settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Karaoke generation settings
    #[serde(default)]
    pub karaoke: KaraokeConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Lyric parser settings
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ParserConfig {
    /// Treat any warning or malformed line as a failure
    #[serde(default)]
    pub strict: bool,

    /// Give lines without an end tag the start of the following line as their end
    #[serde(default)]
    pub fill_implicit_line_end: bool,
}

/// Karaoke generation settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KaraokeConfig {
    /// Language code of the lines that should receive word timing
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Sample rate the aligner expects, in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Name of the separated stem that holds the vocals
    #[serde(default = "default_vocal_stem")]
    pub vocal_stem: String,

    /// Leave credit lines such as `作词: ...` untouched
    #[serde(default = "default_true")]
    pub skip_credit_lines: bool,
}

impl Default for KaraokeConfig {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            sample_rate: default_sample_rate(),
            vocal_stem: default_vocal_stem(),
            skip_credit_lines: default_true(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_sample_rate() -> u32 {
    16_000
}

fn default_vocal_stem() -> String {
    "vocals".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration, writing a default file first if none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    // @validates: Karaoke settings
    pub fn validate(&self) -> Result<()> {
        let language = &self.karaoke.target_language;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(anyhow!("Invalid target language code: {:?}", language));
        }

        if self.karaoke.sample_rate == 0 {
            return Err(anyhow!("Sample rate must be greater than zero"));
        }

        if self.karaoke.vocal_stem.trim().is_empty() {
            return Err(anyhow!("Vocal stem name must not be empty"));
        }

        Ok(())
    }
}
