//! Runtime configuration for the sqlpad binary.
//!
//! Precedence, highest first:
//! 1. Command-line flags
//! 2. `SQLPAD_BASE_URL`
//! 3. Config file (RON, `sqlpad.ron` by default)
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use sqlpad_engine::ClientSettings;
use sqlpad_logging::sqlpad_info;

use super::logging::LogDestination;
use crate::cli::Cli;

pub const BASE_URL_ENV: &str = "SQLPAD_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub parse_path: String,
    pub probe_path: String,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub max_body_bytes: u64,
    pub probe_on_start: bool,
    pub log: LogDestination,
    pub log_file: PathBuf,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            parse_path: client.parse_path,
            probe_path: client.probe_path,
            connect_timeout_ms: None,
            request_timeout_ms: None,
            max_body_bytes: client.max_bytes,
            probe_on_start: false,
            log: LogDestination::File,
            log_file: PathBuf::from("sqlpad.log"),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.base_url = base_url;
        }
        self
    }

    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(timeout) = cli.request_timeout_ms {
            self.request_timeout_ms = Some(timeout);
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
        self.probe_on_start |= cli.probe;
        self.verbose |= cli.verbose;
        self
    }

    /// Full resolution: file, then environment, then flags.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let config = Self::load(&cli.config)?
            .with_env(|key| std::env::var(key).ok())
            .with_cli(cli);
        Ok(config)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            parse_path: self.parse_path.clone(),
            probe_path: self.probe_path.clone(),
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            max_bytes: self.max_body_bytes,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn log_summary(&self) {
        sqlpad_info!(
            "Config: base_url={} parse_path={} request_timeout_ms={:?} probe_on_start={}",
            self.base_url,
            self.parse_path,
            self.request_timeout_ms,
            self.probe_on_start
        );
    }
}
