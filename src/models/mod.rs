//! Data models for the MySQL MCP gateway.

pub mod connection;
pub mod request;

pub use connection::{ConnectionConfig, ConnectionConfigError, DatabaseType};
pub use request::{ExecutionMetadata, ExecutionRequest, QueryArguments};
