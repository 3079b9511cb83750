//! Response envelope shared by every operation.
//!
//! Results are always delivered as a single text content block. Rows and
//! mutation summaries are pretty-printed JSON; database rejections are a
//! plain message with the error flag set.

use crate::db::types::JsonRow;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{DatabaseType, ExecutionMetadata};
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Body of a successful mutating operation.
#[derive(Debug, Clone, Serialize)]
pub struct MutationSummary<'a> {
    pub success: bool,
    pub message: &'a str,
    pub result: ExecutionMetadata,
}

/// What the gateway hands back to the transport for a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    pub text: String,
    /// Set only when the database rejected the statement.
    pub is_error: bool,
}

impl ToolResponse {
    /// Row set as a JSON array of objects.
    pub fn rows(rows: &[JsonRow]) -> GatewayResult<Self> {
        Ok(Self {
            text: to_pretty_json(rows)?,
            is_error: false,
        })
    }

    /// `{ success, message, result }` for a mutating operation.
    pub fn mutation(message: &str, result: ExecutionMetadata) -> GatewayResult<Self> {
        let summary = MutationSummary {
            success: true,
            message,
            result,
        };
        Ok(Self {
            text: to_pretty_json(&summary)?,
            is_error: false,
        })
    }

    pub fn database_error(db_type: DatabaseType, message: &str) -> Self {
        Self {
            text: format!("{} error: {}", db_type, message),
            is_error: true,
        }
    }
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> GatewayResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| GatewayError::internal(format!("Failed to serialize response: {}", e)))
}

impl From<ToolResponse> for CallToolResult {
    fn from(response: ToolResponse) -> Self {
        let content = vec![Content::text(response.text)];
        if response.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}
