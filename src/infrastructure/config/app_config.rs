//! Application configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::domain::services::PermissionPolicy;
use crate::infrastructure::image::{DEFAULT_MAX_STRIDE, DEFAULT_SIZE_LIMIT, TranscoderConfig};
use crate::infrastructure::seventv::{SEVEN_TV_API_URL, SEVEN_TV_API_VERSION};

pub(crate) const APP_NAME: &str = "emote-porter";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

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

/// Application configuration, read from `config.toml` and CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// 7TV API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Emote transcoding settings.
    #[serde(default)]
    pub emotes: EmotesConfig,

    /// Command permission settings.
    #[serde(default)]
    pub permissions: PermissionsConfig,

    /// Guild record storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// 7TV API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API host.
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// API version path segment.
    #[serde(default = "default_api_version")]
    pub version: String,

    /// Timeout for each HTTP request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Emote transcoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotesConfig {
    /// Emoji upload limit in bytes.
    #[serde(default = "default_size_limit")]
    pub size_limit_bytes: u64,

    /// Largest frame-keep interval tried for animations.
    #[serde(default = "default_max_stride")]
    pub max_frame_stride: usize,

    /// Let animations play faster instead of stretching kept frames.
    #[serde(default)]
    pub speed_up: bool,
}

impl EmotesConfig {
    /// Converts into transcoder settings.
    ///
    /// The stride is kept within `1..=DEFAULT_MAX_STRIDE`.
    #[must_use]
    pub fn transcoder(&self) -> TranscoderConfig {
        TranscoderConfig {
            size_limit: self.size_limit_bytes,
            max_stride: self.max_frame_stride.clamp(1, DEFAULT_MAX_STRIDE),
            speed_up: self.speed_up,
        }
    }
}

impl Default for EmotesConfig {
    fn default() -> Self {
        Self {
            size_limit_bytes: default_size_limit(),
            max_frame_stride: default_max_stride(),
            speed_up: false,
        }
    }
}

/// Command permission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// Commands that never take overrides; platform permissions gate them.
    #[serde(default = "default_ignored_commands")]
    pub ignored_commands: Vec<String>,

    /// Outcome for commands without overrides. Unlisted commands are denied.
    #[serde(default = "default_command_defaults")]
    pub defaults: BTreeMap<String, bool>,

    /// Administrators skip override checks.
    #[serde(default = "default_true")]
    pub ignore_overrides_if_administrator: bool,

    /// Every command that exists, by qualified name.
    #[serde(default = "default_known_commands")]
    pub known_commands: Vec<String>,
}

impl PermissionsConfig {
    /// Converts into the resolver policy.
    #[must_use]
    pub fn policy(&self) -> PermissionPolicy {
        PermissionPolicy {
            ignored_commands: self.ignored_commands.iter().cloned().collect(),
            defaults: self
                .defaults
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            admin_bypass: self.ignore_overrides_if_administrator,
        }
    }
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            ignored_commands: default_ignored_commands(),
            defaults: default_command_defaults(),
            ignore_overrides_if_administrator: true,
            known_commands: default_known_commands(),
        }
    }
}

/// Guild record storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per guild.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_api_url() -> String {
    SEVEN_TV_API_URL.to_string()
}

fn default_api_version() -> String {
    SEVEN_TV_API_VERSION.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_size_limit() -> u64 {
    DEFAULT_SIZE_LIMIT
}

const fn default_max_stride() -> usize {
    DEFAULT_MAX_STRIDE
}

const fn default_true() -> bool {
    true
}

fn default_ignored_commands() -> Vec<String> {
    PermissionPolicy::default()
        .ignored_commands
        .into_iter()
        .collect()
}

fn default_command_defaults() -> BTreeMap<String, bool> {
    PermissionPolicy::default().defaults.into_iter().collect()
}

fn default_known_commands() -> Vec<String> {
    [
        "7tv emote add",
        "7tv emote remove",
        "7tv emote rename",
        "permissions allow",
        "permissions remove",
        "permissions list",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(data_dir) = &args.data_dir {
            self.storage.data_dir = Some(data_dir.clone());
        }
        if let Some(size_limit) = args.size_limit {
            self.emotes.size_limit_bytes = size_limit;
        }
        if let Some(api_url) = &args.api_url {
            self.api.base_url.clone_from(api_url);
        }
        if args.speed_up {
            self.emotes.speed_up = true;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default guild data directory.
    #[must_use]
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("guilds"))
    }

    /// Returns effective log path. Logging goes to stderr when unset.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone()
    }

    /// Returns effective guild data directory.
    #[must_use]
    pub fn effective_data_dir(&self) -> Option<PathBuf> {
        self.storage.data_dir.clone().or_else(Self::default_data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.emotes.size_limit_bytes, 262_144);
        assert_eq!(config.emotes.max_frame_stride, 4);
        assert_eq!(config.api.base_url, "https://7tv.io");
        assert!(config.permissions.ignore_overrides_if_administrator);
        assert!(
            config
                .permissions
                .known_commands
                .iter()
                .any(|c| c == "7tv emote add")
        );

        let policy = config.permissions.policy();
        assert!(policy.is_ignored("permissions allow"));
        assert!(!policy.default_for("7tv emote add"));
        assert!(policy.default_for("permissions list"));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [emotes]
            size_limit_bytes = 1024
            speed_up = true

            [permissions]
            ignore_overrides_if_administrator = false

            [permissions.defaults]
            "7tv emote add" = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.emotes.transcoder().size_limit, 1024);
        assert_eq!(config.emotes.max_frame_stride, 4);
        assert!(config.emotes.speed_up);

        let policy = config.permissions.policy();
        assert!(!policy.admin_bypass);
        assert!(policy.default_for("7tv emote add"));
        assert!(!policy.default_for("permissions list"));
        assert_eq!(config.permissions.ignored_commands.len(), 3);
    }

    #[test]
    fn test_frame_stride_is_clamped() {
        let config: AppConfig = toml::from_str("[emotes]\nmax_frame_stride = 10\n").unwrap();
        assert_eq!(config.emotes.transcoder().max_stride, DEFAULT_MAX_STRIDE);

        let config: AppConfig = toml::from_str("[emotes]\nmax_frame_stride = 0\n").unwrap();
        assert_eq!(config.emotes.transcoder().max_stride, 1);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            size_limit: Some(2048),
            data_dir: Some(PathBuf::from("/tmp/guilds")),
            speed_up: true,
            ..CliArgs::default()
        };

        config.merge_with_args(&args);

        assert_eq!(config.emotes.size_limit_bytes, 2048);
        assert!(config.emotes.speed_up);
        assert_eq!(
            config.effective_data_dir(),
            Some(PathBuf::from("/tmp/guilds"))
        );
    }
}
