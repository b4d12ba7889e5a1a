//! Configuration file persistence.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::app_config::AppConfig;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Loads and saves the application configuration file.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Creates a manager rooted at the platform config directory.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration directory cannot be
    /// determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = AppConfig::project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a manager with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        if !self.config_dir.exists() {
            info!("Creating configuration directory at {:?}", self.config_dir);
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Loads the configuration, falling back to defaults when the file
    /// does not exist yet.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes the configuration to disk.
    ///
    /// # Errors
    /// Returns `ConfigError` if the directory cannot be created or the
    /// file cannot be written.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_config_dir()?;
        let config_path = self.config_dir.join(CONFIG_FILE_NAME);
        let contents = toml::to_string_pretty(config)?;
        fs::write(&config_path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::app_config::LogLevel;
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = StorageManager::with_dir(dir.path().to_path_buf());

        let config = storage.load_config(None).unwrap();
        assert!(config.access_key.is_none());
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = StorageManager::with_dir(dir.path().to_path_buf());

        let config = AppConfig {
            access_key: Some("abc".into()),
            log_level: LogLevel::Debug,
            cache_capacity: 7,
            ..AppConfig::default()
        };
        storage.save_config(&config).unwrap();

        let loaded = storage.load_config(None).unwrap();
        assert_eq!(loaded.access_key.as_deref(), Some("abc"));
        assert_eq!(loaded.log_level, LogLevel::Debug);
        assert_eq!(loaded.cache_capacity, 7);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "log_level = 3").unwrap();
        let storage = StorageManager::with_dir(dir.path().to_path_buf());

        let result = storage.load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::TomlDe(_))));
    }
}
