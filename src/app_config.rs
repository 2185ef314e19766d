use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::database::DatabaseConnection;

/// Application configuration module
/// This module handles loading, validating and saving the course loader
/// settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Course database file; the platform data directory is used when unset
    #[serde(default)]
    pub database_path: Option<String>,

    /// Language translations are resolved into (ISO code)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Navigation tree settings
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Navigation tree settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NavigationConfig {
    /// List catalog modules that have no words (normalized databases only)
    #[serde(default = "default_true")]
    pub show_empty_modules: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            show_empty_modules: default_true(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
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
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "es".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        if let Some(path) = &self.database_path {
            if path.trim().is_empty() {
                return Err(anyhow!("Database path must not be empty when set"));
            }
        }

        Ok(())
    }

    /// Resolved database location
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => DatabaseConnection::default_database_path(),
        }
    }

    /// Load the configuration file, writing the defaults when it is missing
    pub fn load_or_create<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if config_path.exists() {
            let file = File::open(config_path)
                .with_context(|| format!("Failed to open config file: {:?}", config_path))?;

            let reader = BufReader::new(file);
            serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))
        } else {
            warn!("Config file not found at {:?}, creating default config.", config_path);

            let config = Config::default();
            let config_json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;

            std::fs::write(config_path, config_json).with_context(|| {
                format!("Failed to write default config to file: {:?}", config_path)
            })?;

            Ok(config)
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            target_language: default_target_language(),
            navigation: NavigationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
