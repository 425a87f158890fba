use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;
pub mod watcher;

use crate::cli::Cli;

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub schemas: SchemaSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Schema files to load at startup.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct SchemaSettings {
    /// File paths or glob patterns (e.g. "schemas/*.json")
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputSettings {
    /// Pretty-print synthesized payloads
    pub pretty: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingSettings {
    /// One of trace, debug, info, warn, error
    pub level: String,
}

impl Settings {
    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::build(&cli.config)?;

        // Apply CLI overrides (CLI > env vars > config file)
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(config_path: &Path) -> Result<Self, anyhow::Error> {
        let settings = Self::build(config_path)?;
        settings.validate()?;
        Ok(settings)
    }

    fn build(config_path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .set_default("output.pretty", true)?
            .set_default("logging.level", "info")?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        // Schemas named on the command line replace the configured set
        let schemas = cli.command.schemas();
        if !schemas.is_empty() {
            self.schemas.paths = schemas.to_vec();
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
        if cli.command.compact() {
            self.output.pretty = false;
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// The configured log level; validation guarantees it parses.
    pub fn log_level(&self) -> tracing::Level {
        self.logging.level.parse().unwrap_or(tracing::Level::INFO)
    }
}
