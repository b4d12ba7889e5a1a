//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use super::app_config::LogLevel;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "photofeed",
    version,
    about = "Fetch and cache an Unsplash photo feed",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Unsplash access key.
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", value_name = "KEY")]
    pub access_key: Option<String>,

    /// API base URL override.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}
