//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "gym-session")]
#[command(about = "A crash-resilient workout session timer with an HTTP surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Directory for the persisted session draft (defaults to the
    /// platform-local data directory)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the remote workout/exercise API
    #[arg(long, default_value = "http://localhost:5000")]
    pub api_base: String,

    /// Bearer token for the remote API
    #[arg(long)]
    pub api_token: Option<String>,

    /// User the session belongs to
    #[arg(short, long, default_value = "local")]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Resolve the directory the session draft is persisted under
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gym-session")
        })
    }
}
