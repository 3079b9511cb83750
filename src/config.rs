//! Configuration handling for the MySQL MCP gateway.
//!
//! All settings come from CLI arguments with environment variable fallbacks
//! and are fixed for the lifetime of the process.

use crate::models::{ConnectionConfig, ConnectionConfigError};
use clap::{Parser, ValueEnum};
use url::Url;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_MYSQL_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_USER: &str = "root";
pub const DEFAULT_MYSQL_DATABASE: &str = "test";

// Pool configuration defaults
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Connection pool configuration options.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PoolOptions {
    /// Maximum connections in pool (default: 10)
    pub max_connections: Option<u32>,
    /// Minimum connections in pool (default: 1)
    pub min_connections: Option<u32>,
    /// Idle timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Whether to test connections before use (default: true)
    pub test_before_acquire: Option<bool>,
    /// Per-statement timeout in seconds (default: 30)
    pub query_timeout_secs: Option<u64>,
}

impl PoolOptions {
    pub fn max_connections_or_default(&self) -> u32 {
        self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    pub fn min_connections_or_default(&self) -> u32 {
        self.min_connections.unwrap_or(DEFAULT_MIN_CONNECTIONS)
    }

    pub fn idle_timeout_or_default(&self) -> u64 {
        self.idle_timeout_secs.unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS)
    }

    pub fn acquire_timeout_or_default(&self) -> u64 {
        self.acquire_timeout_secs
            .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS)
    }

    pub fn test_before_acquire_or_default(&self) -> bool {
        self.test_before_acquire.unwrap_or(true)
    }

    pub fn query_timeout_or_default(&self) -> u64 {
        self.query_timeout_secs.unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS)
    }

    /// Validate pool options and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(max) = self.max_connections {
            if max == 0 {
                return Err("max_connections must be greater than 0".to_string());
            }
        }
        if let Some(min) = self.min_connections {
            if min > self.max_connections_or_default() {
                return Err(format!(
                    "min_connections ({}) cannot exceed max_connections ({})",
                    min,
                    self.max_connections_or_default()
                ));
            }
        }
        if self.query_timeout_secs == Some(0) {
            return Err("query_timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Configuration for the MySQL MCP gateway.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mysql-mcp-gateway",
    about = "MCP server exposing a MySQL database through statement-class restricted SQL tools",
    version,
    author
)]
pub struct Config {
    /// Full connection URL (mysql://... or sqlite:...).
    /// Overrides the individual --mysql-* settings when present.
    #[arg(long, value_name = "URL", env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// MySQL server host
    #[arg(long, default_value = DEFAULT_MYSQL_HOST, env = "MYSQL_HOST")]
    pub mysql_host: String,

    /// MySQL server port
    #[arg(long, default_value_t = DEFAULT_MYSQL_PORT, env = "MYSQL_PORT")]
    pub mysql_port: u16,

    /// MySQL user name
    #[arg(long, default_value = DEFAULT_MYSQL_USER, env = "MYSQL_USER")]
    pub mysql_user: String,

    /// MySQL password
    #[arg(long, default_value = "", env = "MYSQL_PASSWORD", hide_env_values = true)]
    pub mysql_password: String,

    /// MySQL database name
    #[arg(long, default_value = DEFAULT_MYSQL_DATABASE, env = "MYSQL_DATABASE")]
    pub mysql_database: String,

    /// Maximum number of pooled connections
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_CONNECTIONS,
        env = "MYSQL_CONNECTION_LIMIT"
    )]
    pub connection_limit: u32,

    /// Minimum number of pooled connections kept open
    #[arg(long, default_value_t = DEFAULT_MIN_CONNECTIONS, env = "MCP_MIN_CONNECTIONS")]
    pub min_connections: u32,

    /// Seconds to wait for a free pooled connection
    #[arg(
        long,
        default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS,
        env = "MCP_ACQUIRE_TIMEOUT"
    )]
    pub acquire_timeout: u64,

    /// Seconds before an idle pooled connection is closed
    #[arg(long, default_value_t = DEFAULT_IDLE_TIMEOUT_SECS, env = "MCP_IDLE_TIMEOUT")]
    pub idle_timeout: u64,

    /// Per-statement timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_QUERY_TIMEOUT_SECS,
        env = "MCP_QUERY_TIMEOUT"
    )]
    pub query_timeout: u64,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(long, default_value = DEFAULT_HTTP_HOST, env = "MCP_HTTP_HOST")]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT, env = "MCP_HTTP_PORT")]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(long, default_value = DEFAULT_MCP_ENDPOINT, env = "MCP_ENDPOINT")]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            database_url: None,
            mysql_host: DEFAULT_MYSQL_HOST.to_string(),
            mysql_port: DEFAULT_MYSQL_PORT,
            mysql_user: DEFAULT_MYSQL_USER.to_string(),
            mysql_password: String::new(),
            mysql_database: DEFAULT_MYSQL_DATABASE.to_string(),
            connection_limit: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT_SECS,
            query_timeout: DEFAULT_QUERY_TIMEOUT_SECS,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Build the connection URL.
    ///
    /// `--database-url` wins; otherwise the URL is assembled from the
    /// discrete MySQL settings with proper percent-encoding of credentials.
    pub fn connection_url(&self) -> Result<String, String> {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.trim().to_string());
        }

        let mut url = Url::parse(&format!("mysql://{}:{}", self.mysql_host, self.mysql_port))
            .map_err(|e| format!("Invalid MySQL host or port: {e}"))?;

        url.set_username(&self.mysql_user)
            .map_err(|_| "Invalid MySQL user name".to_string())?;
        if !self.mysql_password.is_empty() {
            url.set_password(Some(&self.mysql_password))
                .map_err(|_| "Invalid MySQL password".to_string())?;
        }
        url.set_path(&format!("/{}", self.mysql_database));

        Ok(url.to_string())
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_connections: Some(self.connection_limit),
            min_connections: Some(self.min_connections.min(self.connection_limit)),
            idle_timeout_secs: Some(self.idle_timeout),
            acquire_timeout_secs: Some(self.acquire_timeout),
            test_before_acquire: None,
            query_timeout_secs: Some(self.query_timeout),
        }
    }

    /// Resolve the full connection configuration.
    pub fn connection_config(&self) -> Result<ConnectionConfig, ConfigError> {
        let url = self.connection_url().map_err(ConfigError::InvalidUrl)?;
        Ok(ConnectionConfig::new(url, self.pool_options())?)
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Errors produced while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Connection(#[from] ConnectionConfigError),
}
