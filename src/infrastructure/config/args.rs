use super::app_config::LogLevel;
use clap::Args;
use std::path::PathBuf;

/// Global command line options.
#[derive(Debug, Clone, Default, Args)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Directory holding guild records.
    #[arg(long, value_name = "DIR", env = "EMOTE_PORTER_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Emoji size limit in bytes.
    #[arg(long, value_name = "BYTES", global = true)]
    pub size_limit: Option<u64>,

    /// 7TV API host.
    #[arg(long, value_name = "URL", env = "SEVEN_TV_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Keep frame delays when dropping frames, so animations play faster.
    #[arg(long, global = true)]
    pub speed_up: bool,
}
