//! MCP service implementation.
//!
//! Lists the registry's operations as tools and forwards every tool call,
//! with its raw arguments, into the [`CommandGateway`]. Argument validation
//! happens in the gateway, not here.

use crate::db::StatementExecutor;
use crate::models::ExecutionRequest;
use crate::tools::CommandGateway;
use crate::tools::registry;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

/// MCP server handler backed by a command gateway.
///
/// `ServerHandler` is implemented by hand rather than with `#[tool_router]`:
/// the tools come from the static registry, and raw arguments must reach the
/// gateway unparsed so it can report malformed input itself.
pub struct GatewayService<E: StatementExecutor> {
    gateway: Arc<CommandGateway<E>>,
}

impl<E: StatementExecutor> GatewayService<E> {
    pub fn new(gateway: Arc<CommandGateway<E>>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<CommandGateway<E>> {
        &self.gateway
    }
}

impl<E: StatementExecutor> Clone for GatewayService<E> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<E: StatementExecutor + 'static> ServerHandler for GatewayService<E> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mysql-mcp-gateway".to_owned(),
                title: Some("MySQL MCP Gateway".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SQL tools for a single MySQL database.\n\
                \n\
                Each tool accepts one argument, `query`, holding a complete SQL statement, \
                and only runs statements of its own kind:\n\
                - `run_sql_query`: SELECT\n\
                - `create_table`: CREATE TABLE\n\
                - `insert_data`: INSERT INTO\n\
                - `update_data`: UPDATE\n\
                - `delete_data`: DELETE FROM\n\
                \n\
                Statements sent to the wrong tool are rejected without being run. \
                Errors reported by the database come back as tool output flagged as an error."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(registry::tool_definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "Tool call received");
        let execution = ExecutionRequest::new(
            request.name.into_owned(),
            request.arguments.map(JsonValue::Object),
        );

        self.gateway
            .execute(execution)
            .await
            .map(Into::into)
            .map_err(Into::into)
    }
}
