//! Tool layer.
//!
//! - `classifier`: statement class detection by keyword prefix
//! - `registry`: the five operations and their allowed classes
//! - `format`: response envelope
//! - `gateway`: validation, class enforcement and dispatch

pub mod classifier;
pub mod format;
pub mod gateway;
pub mod registry;

pub use classifier::{StatementClass, classify};
pub use format::{MutationSummary, ToolResponse};
pub use gateway::CommandGateway;
pub use registry::{Operation, lookup, lookup_by_class, operations, tool_definitions};
