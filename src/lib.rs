//! MySQL MCP Gateway Library
//!
//! Exposes a relational database to MCP clients through five tools, each
//! restricted to one class of SQL statement (SELECT, CREATE TABLE, INSERT,
//! UPDATE, DELETE).

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{GatewayError, GatewayResult};
pub use mcp::GatewayService;
pub use tools::{CommandGateway, ToolResponse};
