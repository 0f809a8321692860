// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

use crate::app_config::{Config, TranslationProviderKind};
use app_controller::Controller;
use translation::TranslationService;

mod app_config;
mod app_controller;
mod document;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod rewriter;
mod site_data;
mod sitemap;
mod slug_registry;
mod translation;

/// CLI Wrapper for TranslationProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProviderKind {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProviderKind::Google,
            CliTranslationProvider::Mock => TranslationProviderKind::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the slug registry from the source-language corpus and persist it
    Extract,

    /// Produce localized documents for one language across the whole corpus
    Generate {
        /// Target language code (e.g. 'de', 'it')
        #[arg(value_name = "LANG")]
        language: String,
    },

    /// Refresh alternate-link metadata on already-generated documents
    #[command(name = "update-hreflang")]
    UpdateHreflang,

    /// Resync the shared sitemap from the persisted slug registry
    #[command(name = "update-sitemap")]
    UpdateSitemap,

    /// Generate shell completions for weblingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// weblingo - HTML corpus localization pipeline
///
/// Localizes an English HTML content corpus into the configured target
/// languages while preserving markup, rewriting internal links to their
/// localized equivalents and keeping the slug registry consistent.
#[derive(Parser, Debug)]
#[command(name = "weblingo")]
#[command(version = "1.0.0")]
#[command(about = "HTML corpus localization pipeline")]
#[command(long_about = "weblingo localizes an English HTML corpus into several target languages.

EXAMPLES:
    weblingo extract                    # Build and persist the slug registry
    weblingo generate de                # Generate the German corpus
    weblingo update-hreflang            # Refresh alternate links everywhere
    weblingo update-sitemap             # Resync the shared sitemap
    weblingo -p mock generate it        # Dry-run with the deterministic provider
    weblingo completions bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "weblingo", &mut std::io::stdout());
        return Ok(());
    }

    // Load the configuration, creating a default one on first use
    let mut config = if file_utils::FileManager::file_exists(&cli.config_path) {
        Config::from_file(&cli.config_path)?
    } else {
        warn!(
            "Config file {} not found, creating a default one",
            cli.config_path
        );
        let config = Config::default();
        config.save_to_file(&cli.config_path)?;
        config
    };

    // Command line overrides
    if let Some(provider) = cli.provider {
        config.translation.provider = provider.into();
    }
    let level = match cli.log_level {
        Some(cmd_level) => cmd_level.into(),
        None => match &config.log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        },
    };
    log::set_max_level(level);

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Extract => {
            let service = TranslationService::new(&controller.config().translation);
            controller.run_extract(&service).await
        }
        Commands::Generate { language } => {
            let service = TranslationService::new(&controller.config().translation);
            controller.run_generate(&language, &service).await
        }
        Commands::UpdateHreflang => controller.run_update_hreflang(),
        Commands::UpdateSitemap => {
            let result = controller.run_update_sitemap();
            if result.is_ok() {
                info!("Sitemap sync complete");
            }
            result
        }
        Commands::Completions { .. } => unreachable!("handled before config loading"),
    }
}
