// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use rand::prelude::IndexedRandom;
use std::io::Write;
use std::time::Duration;

use crate::app_config::Config;
use crate::pipeline::{DriverPreferences, GenerationRequest, VideoPipeline};
use crate::progress::{ProgressLevel, ProgressLog};

mod app_config;
mod director;
mod errors;
mod file_utils;
mod pipeline;
mod progress;
mod providers;
mod routing;

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

fn to_level_filter(level: app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a full video for a topic (default command)
    Generate(GenerateArgs),

    /// Generate candidate titles for a topic and print them
    Titles {
        /// Topic to generate titles for
        #[arg(value_name = "TOPIC")]
        topic: String,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for reelforge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Topic to generate a video about
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Video title (generated from the topic when omitted)
    #[arg(short, long)]
    title: Option<String>,

    /// Pick a random title from generated candidates instead of prompting
    #[arg(short, long, conflicts_with = "title")]
    random: bool,

    /// Disable image fallback drivers
    #[arg(long)]
    no_backups: bool,

    /// Text driver to use (gemini, pollinations, chatgpt, groq)
    #[arg(long)]
    text_driver: Option<String>,

    /// Explicit text fallback driver
    #[arg(long)]
    text_fallback: Option<String>,

    /// Image driver to use (replicate, pollinations, gemini, openai)
    #[arg(long)]
    image_driver: Option<String>,

    /// Explicit image fallback driver
    #[arg(long)]
    image_fallback: Option<String>,

    /// Voice driver to use (elevenlabs, pollinations, groq)
    #[arg(long)]
    voice_driver: Option<String>,

    /// Explicit voice fallback driver
    #[arg(long)]
    voice_fallback: Option<String>,

    /// Target video duration in seconds
    #[arg(short, long)]
    duration: Option<u32>,

    /// Print the render command instead of running the renderer
    #[arg(long)]
    manual_render: bool,

    /// Job identifier (a fresh one is generated when omitted)
    #[arg(long)]
    job_id: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// ReelForge - AI video generation orchestrator
///
/// Turns a topic into a rendered short video: script, narration audio,
/// scene images and a final render, with automatic provider fallback.
#[derive(Parser, Debug)]
#[command(name = "reelforge")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered video generation tool")]
#[command(long_about = "ReelForge turns a topic into a rendered short video using AI providers.

EXAMPLES:
    reelforge \"The history of coffee\"               # Generate with default drivers
    reelforge -r \"The history of coffee\"            # Pick a random generated title
    reelforge --text-driver groq \"Quantum computing\" # Use a specific text driver
    reelforge --no-backups \"Space elevators\"        # Disable image fallbacks
    reelforge --manual-render \"Deep sea life\"       # Print the render command only
    reelforge titles \"Ancient Rome\"                 # Print title candidates
    reelforge completions bash > reelforge.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, defaults
    are used and API keys are read from the environment (GEMINI_API_KEY,
    OPENAI_API_KEY, GROQ_API_KEY, POLLINATIONS_API_KEY, REPLICATE_API_TOKEN,
    ELEVENLABS_API_KEY).

DRIVERS:
    text   - gemini (default), pollinations, chatgpt, groq
    image  - replicate (default), pollinations, gemini, openai
    voice  - elevenlabs (default), pollinations, groq")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Topic to generate a video about
    #[arg(value_name = "TOPIC")]
    topic: Option<String>,

    /// Video title (generated from the topic when omitted)
    #[arg(short, long)]
    title: Option<String>,

    /// Pick a random title from generated candidates instead of prompting
    #[arg(short, long, conflicts_with = "title")]
    random: bool,

    /// Disable image fallback drivers
    #[arg(long)]
    no_backups: bool,

    /// Text driver to use (gemini, pollinations, chatgpt, groq)
    #[arg(long)]
    text_driver: Option<String>,

    /// Explicit text fallback driver
    #[arg(long)]
    text_fallback: Option<String>,

    /// Image driver to use (replicate, pollinations, gemini, openai)
    #[arg(long)]
    image_driver: Option<String>,

    /// Explicit image fallback driver
    #[arg(long)]
    image_fallback: Option<String>,

    /// Voice driver to use (elevenlabs, pollinations, groq)
    #[arg(long)]
    voice_driver: Option<String>,

    /// Explicit voice fallback driver
    #[arg(long)]
    voice_fallback: Option<String>,

    /// Target video duration in seconds
    #[arg(short, long)]
    duration: Option<u32>,

    /// Print the render command instead of running the renderer
    #[arg(long)]
    manual_render: bool,

    /// Job identifier (a fresh one is generated when omitted)
    #[arg(long)]
    job_id: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "reelforge", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Titles { topic, config_path }) => run_titles(&topic, &config_path).await,
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let topic = cli
                .topic
                .ok_or_else(|| anyhow!("TOPIC is required when no subcommand is specified"))?;

            let generate_args = GenerateArgs {
                topic,
                title: cli.title,
                random: cli.random,
                no_backups: cli.no_backups,
                text_driver: cli.text_driver,
                text_fallback: cli.text_fallback,
                image_driver: cli.image_driver,
                image_fallback: cli.image_fallback,
                voice_driver: cli.voice_driver,
                voice_fallback: cli.voice_fallback,
                duration: cli.duration,
                manual_render: cli.manual_render,
                job_id: cli.job_id,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_generate(generate_args).await
        }
    }
}

/// Print title candidates for a topic
async fn run_titles(topic: &str, config_path: &str) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let director =
        director::Director::new(routing::text::TextRouter::from_config(&config, None, None));

    let titles = director
        .generate_titles(topic)
        .await
        .context("Title generation failed")?;

    for (index, title) in titles.iter().enumerate() {
        println!("{}. {}", index + 1, title);
    }
    Ok(())
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    let config = Config::load_or_default(&options.config_path)?;

    // Command line log level wins over the configured one
    let log_level = options
        .log_level
        .map(|l| to_level_filter(l.into()))
        .unwrap_or_else(|| to_level_filter(config.log_level));
    log::set_max_level(log_level);

    // Resolve the title before the job starts so the pipeline never prompts
    let title = match (&options.title, options.random) {
        (Some(title), _) => Some(title.clone()),
        (None, true) => {
            info!("Generating title candidates for: {}", options.topic);
            let director = director::Director::new(routing::text::TextRouter::from_config(
                &config,
                options.text_driver.as_deref().map(app_config::TextDriver::from_name),
                options.text_fallback.as_deref().map(app_config::TextDriver::from_name),
            ));
            let titles = director
                .generate_titles(&options.topic)
                .await
                .context("Title generation failed")?;
            let chosen = titles
                .choose(&mut rand::rng())
                .cloned()
                .ok_or_else(|| anyhow!("No titles generated"))?;
            info!("Chosen title: {}", chosen);
            Some(chosen)
        }
        (None, false) => None,
    };

    let job_id = options
        .job_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    info!("Job id: {}", job_id);

    let request = GenerationRequest {
        topic: options.topic,
        title,
        use_backups: !options.no_backups,
        preferences: DriverPreferences {
            text_driver: options.text_driver,
            text_fallback: options.text_fallback,
            image_driver: options.image_driver,
            image_fallback: options.image_fallback,
            voice_driver: options.voice_driver,
            voice_fallback: options.voice_fallback,
        },
        job_id: job_id.clone(),
        target_duration_secs: options.duration,
        manual_render: options.manual_render,
    };

    let progress = ProgressLog::new();
    let pipeline = VideoPipeline::new(config, progress.clone());

    // Run the job on its own task and follow its progress log, the same way
    // an external poller would
    let worker = tokio::spawn(async move { pipeline.run(&request).await });

    let mut seen = 0;
    let output_dir = loop {
        tokio::time::sleep(Duration::from_millis(500)).await;

        let entries = progress.read(&job_id);
        for entry in &entries[seen.min(entries.len())..] {
            let marker = match entry.level {
                ProgressLevel::Info => " ",
                ProgressLevel::Warning => "!",
                ProgressLevel::Error => "E",
            };
            println!("[{}] {} {}", entry.timestamp, marker, entry.message);
        }
        seen = entries.len();

        if worker.is_finished() {
            break worker.await.context("Pipeline task panicked")??;
        }
    };

    info!("Job artifacts written to: {}", output_dir.display());
    Ok(())
}
