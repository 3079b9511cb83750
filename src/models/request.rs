//! Per-call request and result data.

use crate::error::{GatewayError, GatewayResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One tool call as delivered by the transport: a name plus whatever
/// arguments the caller sent. Nothing about the arguments is trusted yet.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub operation_name: String,
    pub arguments: Option<JsonValue>,
}

impl ExecutionRequest {
    pub fn new(operation_name: impl Into<String>, arguments: Option<JsonValue>) -> Self {
        Self {
            operation_name: operation_name.into(),
            arguments,
        }
    }
}

/// Validated arguments shared by every operation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryArguments {
    /// Complete SQL statement to execute. It is sent to the database verbatim.
    pub query: String,
}

impl QueryArguments {
    /// Parse untyped arguments, rejecting anything without a non-empty
    /// string `query` field.
    pub fn parse(raw: Option<&JsonValue>) -> GatewayResult<Self> {
        let value = raw.ok_or_else(|| {
            GatewayError::invalid_arguments("Missing arguments: expected an object with a 'query' field")
        })?;

        if !value.is_object() {
            return Err(GatewayError::invalid_arguments(
                "Arguments must be an object with a 'query' field",
            ));
        }

        let args = Self::deserialize(value)
            .map_err(|e| GatewayError::invalid_arguments(e.to_string()))?;

        if args.query.trim().is_empty() {
            return Err(GatewayError::invalid_arguments(
                "'query' must be a non-empty string",
            ));
        }

        Ok(args)
    }
}

/// Execution metadata reported by the driver for a mutating statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    pub rows_affected: u64,
    /// Last auto-generated id on the connection (MySQL `LAST_INSERT_ID()`,
    /// SQLite `last_insert_rowid()`).
    pub last_insert_id: Option<u64>,
}
