use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Newsline CLI - command-line client for the Newsline news service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the news service API
    #[arg(long, env = "NEWSLINE_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Path to the SQLite credential database
    #[arg(long, env = "NEWSLINE_DB_FILE")]
    pub db_file: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "10")]
    pub http_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in with email and password
    Login {
        /// Account email (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account and log in
    Register {
        /// Display name (prompted for when omitted)
        #[arg(long)]
        name: Option<String>,
        /// Account email (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Show the profile of the current user
    Me,
    /// List active sessions for the account
    Sessions,
    /// Log out on this device
    Logout,
    /// Log out on every device
    LogoutAll,
    /// List news items
    News {
        /// Number of items to skip
        #[arg(long, default_value = "0")]
        skip: u32,
        /// Maximum number of items to return
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// List comments for a news item
    Comments {
        /// News item id
        news_id: i64,
    },
}

/// HTTP client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the news service API
    pub base_url: String,

    /// Connect timeout in seconds
    pub connect_timeout: u64,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Maximum idle connections per host
    pub max_connections: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: 10,
            request_timeout: 10,
            max_connections: 20,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment with defaults
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self {
            base_url: std::env::var("NEWSLINE_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),

            connect_timeout: std::env::var("HTTP_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            request_timeout: std::env::var("HTTP_REQUEST_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            max_connections: std::env::var("HTTP_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
        }
    }

    /// Configuration pointing at the given base URL, defaults elsewhere
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Resolve the credential database path: explicit value, or the
/// platform data directory
pub fn resolve_db_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(expand_tilde(path));
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory for credential store"))?;
    Ok(data_dir.join("newsline").join("credentials.sqlite3"))
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}
