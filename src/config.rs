//! Runtime configuration
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional TOML file (`--config`), and individual command-line flags.

use crate::animator::DEFAULT_CADENCE;
use crate::conversation::DEFAULT_REPLY_DELAY;
use crate::error::{ChatError, Result};
use crate::reply::{DEFAULT_CATALOG, DEFAULT_SUFFIX};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command-line flags
#[derive(Parser, Debug, Default)]
#[command(name = "chatty")]
#[command(version, about = "Terminal chat widget with typed-out replies")]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Delay between revealed characters, in milliseconds
    #[arg(long)]
    pub cadence_ms: Option<u64>,

    /// Simulated wait before a reply starts typing, in milliseconds
    #[arg(long)]
    pub reply_delay_ms: Option<u64>,

    /// Seed for reply selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub typing: TypingConfig,
    pub reply: ReplyConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TypingConfig {
    pub cadence_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReplyConfig {
    pub delay_ms: u64,
    pub catalog: Vec<String>,
    pub suffix: String,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// No file means no logging; the terminal belongs to the UI
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for TypingConfig {
    fn default() -> Self {
        TypingConfig {
            cadence_ms: DEFAULT_CADENCE.as_millis() as u64,
        }
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        ReplyConfig {
            delay_ms: DEFAULT_REPLY_DELAY.as_millis() as u64,
            catalog: DEFAULT_CATALOG.iter().map(|s| s.to_string()).collect(),
            suffix: DEFAULT_SUFFIX.to_string(),
            seed: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Defaults, then the config file if given, then individual flags
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Config::default(),
        };
        if let Some(ms) = cli.cadence_ms {
            config.typing.cadence_ms = ms;
        }
        if let Some(ms) = cli.reply_delay_ms {
            config.reply.delay_ms = ms;
        }
        if cli.seed.is_some() {
            config.reply.seed = cli.seed;
        }
        if cli.log_file.is_some() {
            config.log.file = cli.log_file.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.typing.cadence_ms == 0 {
            return Err(ChatError::Config(
                "typing.cadence_ms must be at least 1".to_string(),
            ));
        }
        if self.reply.catalog.is_empty() {
            return Err(ChatError::Config("reply.catalog is empty".to_string()));
        }
        Ok(())
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.typing.cadence_ms)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply.delay_ms)
    }
}
