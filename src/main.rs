// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use karakara::app_config::{self, Config};
use karakara::file_utils::FileManager;
use karakara::lyrics::{self, ParseReport};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse lyric files and write them back in normalized form
    Normalize {
        /// Lyric file, or directory searched for .lrc/.spl files
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output file for a single input, output directory for a directory input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Report warnings and malformed lines without writing anything
    Check {
        /// Lyric file, or directory searched for .lrc/.spl files
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Print the parsed document as JSON
    Dump {
        /// Lyric file
        #[arg(value_name = "INPUT_FILE")]
        input_file: PathBuf,
    },

    /// Generate shell completions for karakara
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// karakara - SPL karaoke lyrics toolkit
///
/// Parses hand-authored LRC/SPL lyric files, repairs their timing and
/// writes them back in a normalized form.
#[derive(Parser, Debug)]
#[command(name = "karakara")]
#[command(version)]
#[command(about = "SPL karaoke lyrics parser and normalizer")]
#[command(long_about = "karakara parses LRC/SPL lyric files, repairs inconsistent timing and writes them back normalized.

EXAMPLES:
    karakara normalize song.lrc                  # Print the normalized lyrics
    karakara normalize song.lrc -o out.lrc       # Write them to a file
    karakara normalize lyrics/                   # Write song.normalized.lrc next to each file
    karakara --strict check lyrics/              # Fail on any warning
    karakara dump song.lrc > song.json           # Parsed document as JSON
    karakara completions bash > karakara.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in karakara.json by default. You can specify a
    different config file with --config-path. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "karakara.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Treat any warning or malformed line as an error
    #[arg(long, global = true)]
    strict: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Level is adjusted through log::set_max_level once the config is loaded
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "karakara", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Normalize {
            input_path,
            output,
            force_overwrite,
        } => run_normalize(&config, &input_path, output.as_deref(), force_overwrite),
        Commands::Check { input_path } => run_check(&config, &input_path),
        Commands::Dump { input_file } => run_dump(&config, &input_file),
        Commands::Completions { .. } => Ok(()),
    }
}

// @loads: Config file, with CLI overrides applied and the log level updated
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    if let Some(cmd_log_level) = &cli.log_level {
        let log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(log_level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    if cli.strict {
        config.parser.strict = true;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

fn parse_file(config: &Config, path: &Path) -> Result<ParseReport> {
    let text = FileManager::read_to_string(path)?;
    let report = lyrics::parse_with_report(&text, &config.parser);
    info!(
        "{}: {} lines, {} metadata tags",
        path.display(),
        report.lyrics.len(),
        report.lyrics.metadata.len()
    );
    Ok(report)
}

fn into_lyrics(config: &Config, path: &Path, report: ParseReport) -> Result<lyrics::Lyrics> {
    if config.parser.strict {
        report
            .into_strict()
            .with_context(|| format!("Strict parsing failed: {}", path.display()))
    } else {
        Ok(report.lyrics)
    }
}

fn run_normalize(config: &Config, input_path: &Path, output: Option<&Path>, force_overwrite: bool) -> Result<()> {
    if input_path.is_file() {
        let report = parse_file(config, input_path)?;
        let normalized = lyrics::serialize(&into_lyrics(config, input_path, report)?);

        return match output {
            Some(output_file) => write_output(output_file, &normalized, force_overwrite),
            None => {
                print!("{}", normalized);
                Ok(())
            }
        };
    }

    let files = FileManager::find_lyric_files(input_path)?;
    if files.is_empty() {
        warn!("No lyric files found in: {}", input_path.display());
        return Ok(());
    }

    let mut failed = 0;
    for file in &files {
        let output_dir = output
            .map(Path::to_path_buf)
            .or_else(|| file.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let output_file = FileManager::generate_output_path(file, &output_dir, "normalized");

        let result = parse_file(config, file)
            .and_then(|report| into_lyrics(config, file, report))
            .and_then(|lyrics| write_output(&output_file, &lyrics::serialize(&lyrics), force_overwrite));
        if let Err(e) = result {
            error!("Error processing file: {:#}", e);
            failed += 1;
        }
    }

    info!("Normalized {} of {} files", files.len() - failed, files.len());
    if failed > 0 {
        return Err(anyhow!("{} files could not be normalized", failed));
    }
    Ok(())
}

fn write_output(output_file: &Path, content: &str, force_overwrite: bool) -> Result<()> {
    if FileManager::file_exists(output_file) && !force_overwrite {
        warn!("Output file already exists: {}. Use -f to force overwrite.", output_file.display());
        return Ok(());
    }
    FileManager::write_to_file(output_file, content)?;
    info!("Success: {}", output_file.display());
    Ok(())
}

fn run_check(config: &Config, input_path: &Path) -> Result<()> {
    let files = FileManager::find_lyric_files(input_path)?;
    let mut anomalies = 0;

    for file in &files {
        let report = parse_file(config, file)?;
        for line_error in &report.errors {
            println!("{}: error: {}", file.display(), line_error);
        }
        for warning in &report.warnings {
            println!("{}: warning: {}", file.display(), warning);
        }
        anomalies += report.errors.len() + report.warnings.len();
    }

    info!("Checked {} files, {} problems found", files.len(), anomalies);
    if config.parser.strict && anomalies > 0 {
        return Err(anyhow!("{} problems found in strict mode", anomalies));
    }
    Ok(())
}

fn run_dump(config: &Config, input_file: &Path) -> Result<()> {
    let report = parse_file(config, input_file)?;
    let lyrics = into_lyrics(config, input_file, report)?;
    let json = serde_json::to_string_pretty(&lyrics).context("Failed to serialize lyrics to JSON")?;
    println!("{}", json);
    Ok(())
}
