//! MCP server integration.
//!
//! Bridges the MCP protocol (via `rmcp`) to the command gateway.

pub mod service;

pub use service::GatewayService;
