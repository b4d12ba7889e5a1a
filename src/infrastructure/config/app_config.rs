//! Application configuration.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::infrastructure::image::ImageLoaderConfig;

const APP_QUALIFIER: &str = "io";
const APP_ORGANIZATION: &str = "photofeed";
const APP_NAME: &str = "photofeed";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, merged from the config file and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Unsplash access key sent as the `client_id` credential.
    #[serde(default)]
    pub access_key: Option<String>,

    /// Override for the API base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Maximum entries in the image byte cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Maximum concurrent image downloads.
    #[serde(default = "default_max_downloads")]
    pub max_concurrent_downloads: usize,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_cache_capacity() -> usize {
    crate::infrastructure::image::memory_cache::DEFAULT_CACHE_CAPACITY
}

fn default_max_downloads() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            base_url: None,
            log_path: None,
            log_level: LogLevel::default(),
            cache_capacity: default_cache_capacity(),
            max_concurrent_downloads: default_max_downloads(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Folds CLI overrides into the file-derived configuration.
    pub fn merge_args(&mut self, args: &CliArgs) {
        if args.access_key.is_some() {
            self.access_key.clone_from(&args.access_key);
        }
        if args.base_url.is_some() {
            self.base_url.clone_from(&args.base_url);
        }
        if args.log_path.is_some() {
            self.log_path.clone_from(&args.log_path);
        }
        if let Some(level) = args.log_level {
            self.log_level = level;
        }
    }

    /// Image loader settings derived from this configuration.
    #[must_use]
    pub fn loader_config(&self) -> ImageLoaderConfig {
        ImageLoaderConfig {
            cache_capacity: self.cache_capacity,
            max_concurrent_downloads: self.max_concurrent_downloads,
            timeout_secs: self.timeout_secs,
        }
    }

    pub(crate) fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_win_over_file_values() {
        let mut config = AppConfig {
            access_key: Some("from-file".into()),
            log_level: LogLevel::Warn,
            ..AppConfig::default()
        };
        let args = CliArgs {
            config: None,
            access_key: Some("from-cli".into()),
            base_url: None,
            log_path: None,
            log_level: Some(LogLevel::Debug),
        };

        config.merge_args(&args);

        assert_eq!(config.access_key.as_deref(), Some("from-cli"));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn absent_cli_values_keep_file_values() {
        let mut config = AppConfig {
            base_url: Some("https://stage.example".into()),
            ..AppConfig::default()
        };
        let args = CliArgs {
            config: None,
            access_key: None,
            base_url: None,
            log_path: None,
            log_level: None,
        };

        config.merge_args(&args);

        assert_eq!(config.base_url.as_deref(), Some("https://stage.example"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn loader_config_mirrors_the_tuning_knobs() {
        let config = AppConfig {
            cache_capacity: 12,
            max_concurrent_downloads: 2,
            timeout_secs: 5,
            ..AppConfig::default()
        };
        let loader = config.loader_config();
        assert_eq!(loader.cache_capacity, 12);
        assert_eq!(loader.max_concurrent_downloads, 2);
        assert_eq!(loader.timeout_secs, 5);
    }
}
