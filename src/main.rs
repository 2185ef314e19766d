// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use course_loader::app_config::{self, Config};
use course_loader::content::{NavigationTree, WordViewModel};
use course_loader::database::SchemaLayout;
use course_loader::language_utils;
use course_loader::{ContentError, CourseService, DatabaseConnection};

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
    /// Show which tables exist and which layout will be used
    Schema,

    /// Print the module-grouped navigation tree
    Tree {
        /// Print JSON instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// Print the assembled details of one word
    Word {
        /// Word identifier
        #[arg(value_name = "WORD_ID")]
        word_id: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions for course-loader
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// course-loader - course content inspection tool
///
/// Loads a language-course SQLite database the same way the course UI does
/// and prints the navigation tree or a word's assembled details.
#[derive(Parser, Debug)]
#[command(name = "course-loader")]
#[command(version)]
#[command(about = "Load navigation and word details from a course database")]
#[command(long_about = "course-loader reads a course SQLite database (legacy or normalized layout) and prints what the course UI would display.

EXAMPLES:
    course-loader schema                          # Show detected tables and layout
    course-loader tree                            # Print the navigation outline
    course-loader -d course.sqlite3 tree --json   # Navigation tree as JSON
    course-loader -l fr word 12                   # Word 12 with French translations
    course-loader completions bash > course-loader.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Course database file (overrides the config)
    #[arg(short, long, env = "COURSE_DATABASE")]
    database: Option<PathBuf>,

    /// Translation language code, e.g. 'es', 'fr' (overrides the config)
    #[arg(short, long)]
    language: Option<String>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Console logger writing colored lines to stderr
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                tag,
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
    // The logger accepts every level; the effective level is applied through
    // set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "course-loader", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let db_path = config.database_path()?;
    let db = DatabaseConnection::open(&db_path)
        .with_context(|| format!("Cannot open course database {:?}", db_path))?;
    let service = CourseService::new(Arc::new(db), config);

    match cli.command {
        Commands::Schema => {
            let report = service.inspect_schema().await;
            let layout = SchemaLayout::detect(&report);
            println!("Layout: {}", layout);
            for (table, columns) in &report.columns {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                println!("  {} ({})", table, columns.join(", "));
            }
        }
        Commands::Tree { json } => {
            let catalog = service.load_navigation().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                print_tree(&catalog.tree);
            }
        }
        Commands::Word { word_id, json } => match service.word_details(word_id).await {
            Ok(model) if json => println!("{}", serde_json::to_string_pretty(&model)?),
            Ok(model) => print_word(&model, &service.config().target_language),
            Err(ContentError::NotFound { word_id }) => {
                return Err(anyhow!("word not found: {}", word_id));
            }
            Err(e) => return Err(e.into()),
        },
        // Generated above, before the database is opened
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the config file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(database) = &cli.database {
        config.database_path = Some(database.to_string_lossy().into_owned());
    }

    if let Some(language) = &cli.language {
        config.target_language = language.clone();
    }

    match &cli.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    config.validate().context("Configuration validation failed")?;
    debug!("Using configuration: {:?}", config);

    Ok(config)
}

fn print_tree(tree: &NavigationTree) {
    if tree.is_empty() {
        println!("(no words)");
        return;
    }

    for group in &tree.groups {
        println!("{} ({})", group.label(), group.words.len());
        for word in &group.words {
            println!("  [{}] {}", word.id, word.term);
        }
    }
}

fn print_word(model: &WordViewModel, language: &str) {
    println!("{} [{}]", model.term, model.id);
    if let Some(pronunciation) = &model.pronunciation {
        println!("  pronunciation: {}", pronunciation);
    }
    if let Some(definition) = &model.definition {
        println!("  definition: {}", definition);
    }
    let language_name =
        language_utils::get_language_name(language).unwrap_or_else(|_| language.to_string());
    println!(
        "  translation ({}): {}",
        language_name,
        model.translation.as_deref().unwrap_or("-")
    );

    if !model.example_sentences.is_empty() {
        println!("Examples:");
        for example in &model.example_sentences {
            println!("  - {}", example.sentence);
            if let Some(translation) = &example.translation {
                println!("    {}", translation);
            }
        }
    }

    if !model.conversation.is_empty() {
        println!("Conversation:");
        for turn in &model.conversation.turns {
            println!("  {}: {}", turn.speaker, turn.text);
        }
    }

    for clip in &model.clips {
        println!("Clip: {} {}", clip.url, clip.title.as_deref().unwrap_or(""));
    }
}
