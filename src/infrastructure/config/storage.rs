use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading errors.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Where the loaded configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    /// Parsed from an existing file.
    File(PathBuf),
    /// The file was missing and defaults were written to it.
    Created(PathBuf),
    /// The file failed to parse; defaults are in effect.
    Malformed {
        /// Offending file.
        path: PathBuf,
        /// Parse failure.
        error: toml::de::Error,
    },
}

impl ConfigSource {
    /// Returns the parse error when defaults replaced a broken file.
    #[must_use]
    pub const fn parse_error(&self) -> Option<&toml::de::Error> {
        match self {
            Self::Malformed { error, .. } => Some(error),
            Self::File(_) | Self::Created(_) => None,
        }
    }

    /// Logs how the configuration was obtained. Call after logging is initialized.
    pub fn log(&self) {
        match self {
            Self::File(path) => debug!(path = %path.display(), "Loaded config file"),
            Self::Created(path) => {
                info!(path = %path.display(), "Config file not found, created default");
            }
            Self::Malformed { path, error } => warn!(
                path = %path.display(),
                error = %error,
                "Failed to parse config file, using defaults"
            ),
        }
    }
}

/// Locates, creates and reads the configuration file.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Create a new `StorageManager` for the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `StorageManager` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads the application configuration, writing defaults if the file is missing.
    ///
    /// A file that fails to parse is left untouched and defaults are used. The
    /// returned [`ConfigSource`] says which of these happened, so it can be
    /// reported once logging is up.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default cannot be written.
    pub fn load_config(
        &self,
        path_override: Option<&Path>,
    ) -> Result<(AppConfig, ConfigSource), ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        if !config_path.exists() {
            let default_config = AppConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&config_path, &default_config)?;
            return Ok((default_config, ConfigSource::Created(config_path)));
        }

        let content = fs::read_to_string(&config_path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => Ok((config, ConfigSource::File(config_path))),
            Err(error) => Ok((
                AppConfig::default(),
                ConfigSource::Malformed {
                    path: config_path,
                    error,
                },
            )),
        }
    }

    fn save_to_file<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_creates_default_if_missing() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("emote-porter"));

        let (config, source) = manager.load_config(None).unwrap();
        assert_eq!(config.emotes.size_limit_bytes, 262_144);
        assert!(matches!(source, ConfigSource::Created(_)));

        let config_file = dir.path().join("emote-porter").join(CONFIG_FILE_NAME);
        assert!(config_file.exists());

        let (reloaded, source) = manager.load_config(None).unwrap();
        assert!(matches!(source, ConfigSource::File(_)));
        assert_eq!(reloaded.permissions.known_commands, config.permissions.known_commands);
    }

    #[test]
    fn test_load_config_handles_malformed_file() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        let config_file = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_file, "size_limit_bytes = [").unwrap();

        let (config, source) = manager.load_config(None).unwrap();
        assert_eq!(config.emotes.size_limit_bytes, 262_144);
        assert!(source.parse_error().is_some());
        assert!(matches!(source, ConfigSource::Malformed { ref path, .. } if *path == config_file));
        let content = fs::read_to_string(&config_file).unwrap();
        assert_eq!(content, "size_limit_bytes = [");
    }

    #[test]
    fn test_load_config_from_override_path() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("unused"));
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[emotes]\nmax_frame_stride = 2\n").unwrap();

        let (config, source) = manager.load_config(Some(&custom)).unwrap();
        assert!(source.parse_error().is_none());

        assert_eq!(config.emotes.max_frame_stride, 2);
    }
}
