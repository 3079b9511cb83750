//! Error types for the MySQL MCP gateway.
//!
//! Every failure is tagged with an [`ErrorKind`]:
//! - `Protocol`: the caller sent something the gateway will not run
//!   (unknown tool, bad arguments, wrong tool for the statement).
//! - `Operational`: the database itself rejected the statement. These are
//!   reported back to the caller as data, never as a protocol error.
//! - `Fault`: anything else (pool, network, decoding). Propagated as-is.

use crate::tools::classifier::StatementClass;
use thiserror::Error;

/// Classification of a [`GatewayError`] by who is responsible for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Protocol,
    Operational,
    Fault,
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Unknown tool: {name}")]
    UnknownOperation { name: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Only {required} statements are allowed with {operation}")]
    StatementClassMismatch {
        operation: String,
        required: StatementClass,
        found: StatementClass,
    },

    #[error("{message}")]
    Database {
        message: String,
        /// e.g., "42S01" for an existing table
        code: Option<String>,
    },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn class_mismatch(
        operation: impl Into<String>,
        required: StatementClass,
        found: StatementClass,
    ) -> Self {
        Self::StatementClassMismatch {
            operation: operation.into(),
            required,
            found,
        }
    }

    pub fn database(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            code,
        }
    }

    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Who is responsible for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownOperation { .. }
            | Self::InvalidArguments { .. }
            | Self::StatementClassMismatch { .. } => ErrorKind::Protocol,
            Self::Database { .. } => ErrorKind::Operational,
            Self::Connection { .. } | Self::Timeout { .. } | Self::Internal { .. } => {
                ErrorKind::Fault
            }
        }
    }

    /// True if the database rejected the statement.
    pub fn is_operational(&self) -> bool {
        self.kind() == ErrorKind::Operational
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Timeout { .. } => {
                Some("Consider increasing the timeout or optimizing the statement")
            }
            _ => None,
        }
    }
}

/// Convert sqlx errors to GatewayError.
///
/// Only errors raised by the database server itself become
/// `GatewayError::Database`. Everything else is a fault.
impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                GatewayError::database(db_err.message(), code)
            }
            sqlx::Error::Configuration(msg) => GatewayError::connection(
                msg.to_string(),
                "Check the connection settings and credentials",
            ),
            // The pool's configured wait is only known to `DbPool`; see `acquire_error`.
            sqlx::Error::PoolTimedOut => GatewayError::connection(
                "Timed out waiting for a pooled connection",
                "Raise --acquire-timeout or MYSQL_CONNECTION_LIMIT, or reduce concurrent load",
            ),
            sqlx::Error::PoolClosed => {
                GatewayError::connection("Connection pool is closed", "Restart the server")
            }
            sqlx::Error::Io(io_err) => GatewayError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => GatewayError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => GatewayError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnDecode { index, source } => {
                GatewayError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                GatewayError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => GatewayError::internal("Database worker crashed"),
            other => GatewayError::internal(format!("Unexpected driver error: {}", other)),
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Map gateway errors onto JSON-RPC error codes.
impl From<GatewayError> for rmcp::ErrorData {
    fn from(err: GatewayError) -> Self {
        let data = suggestion_data(err.suggestion());
        match &err {
            GatewayError::UnknownOperation { .. } => rmcp::ErrorData::new(
                rmcp::model::ErrorCode::METHOD_NOT_FOUND,
                err.to_string(),
                data,
            ),
            GatewayError::InvalidArguments { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), data)
            }
            GatewayError::StatementClassMismatch { found, .. } => {
                let data = crate::tools::registry::lookup_by_class(*found).map(|op| {
                    serde_json::json!({
                        "suggestion": format!("Use the '{}' tool for this statement", op.name)
                    })
                });
                rmcp::ErrorData::invalid_params(err.to_string(), data)
            }
            // Normally rendered as tool output by the gateway; kept for callers
            // that surface it directly.
            GatewayError::Database { message, code } => {
                let msg = match code {
                    Some(code) => format!("{} (SQLSTATE: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::invalid_params(msg, data)
            }
            GatewayError::Connection { .. }
            | GatewayError::Timeout { .. }
            | GatewayError::Internal { .. } => rmcp::ErrorData::internal_error(err.to_string(), data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            GatewayError::unknown_operation("drop_everything").kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            GatewayError::invalid_arguments("missing query").kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            GatewayError::class_mismatch(
                "run_sql_query",
                StatementClass::Read,
                StatementClass::Delete
            )
            .kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            GatewayError::database("syntax error", None).kind(),
            ErrorKind::Operational
        );
        assert_eq!(
            GatewayError::connection("refused", "start the server").kind(),
            ErrorKind::Fault
        );
        assert_eq!(GatewayError::timeout("query", 30).kind(), ErrorKind::Fault);
        assert_eq!(GatewayError::internal("boom").kind(), ErrorKind::Fault);
    }

    #[test]
    fn test_only_database_errors_are_operational() {
        assert!(GatewayError::database("duplicate key", Some("23000".into())).is_operational());
        assert!(!GatewayError::internal("decode").is_operational());
        assert!(!GatewayError::invalid_arguments("bad").is_operational());
    }

    #[test]
    fn test_mismatch_message_names_operation_and_class() {
        let err = GatewayError::class_mismatch(
            "run_sql_query",
            StatementClass::Read,
            StatementClass::Delete,
        );
        assert_eq!(
            err.to_string(),
            "Only SELECT statements are allowed with run_sql_query"
        );
    }

    #[test]
    fn test_database_error_display_is_raw_message() {
        let err = GatewayError::database("Table 'users' already exists", Some("42S01".into()));
        assert_eq!(err.to_string(), "Table 'users' already exists");
    }

    #[test]
    fn test_pool_timeout_is_fault() {
        let err: GatewayError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, GatewayError::Connection { .. }));
        assert!(!err.to_string().contains("30s"));
        assert_eq!(err.kind(), ErrorKind::Fault);
    }

    #[test]
    fn test_pool_closed_is_fault() {
        let err: GatewayError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, GatewayError::Connection { .. }));
    }

    #[test]
    fn test_row_not_found_is_fault() {
        let err: GatewayError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::Fault);
    }

    #[test]
    fn test_unknown_operation_maps_to_method_not_found() {
        let mcp_err: rmcp::ErrorData = GatewayError::unknown_operation("nope").into();
        assert_eq!(mcp_err.code.0, -32601);
        assert!(mcp_err.message.contains("nope"));
    }

    #[test]
    fn test_invalid_arguments_maps_to_invalid_params() {
        let mcp_err: rmcp::ErrorData = GatewayError::invalid_arguments("missing query").into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_mismatch_maps_to_invalid_params_with_tool_hint() {
        let mcp_err: rmcp::ErrorData = GatewayError::class_mismatch(
            "run_sql_query",
            StatementClass::Read,
            StatementClass::Delete,
        )
        .into();
        assert_eq!(mcp_err.code.0, -32602);
        let data = mcp_err.data.unwrap();
        assert_eq!(data["suggestion"], "Use the 'delete_data' tool for this statement");
    }

    #[test]
    fn test_mismatch_with_unknown_statement_has_no_hint() {
        let mcp_err: rmcp::ErrorData = GatewayError::class_mismatch(
            "insert_data",
            StatementClass::Insert,
            StatementClass::Unknown,
        )
        .into();
        assert!(mcp_err.data.is_none());
    }

    #[test]
    fn test_database_error_includes_sql_state() {
        let mcp_err: rmcp::ErrorData =
            GatewayError::database("syntax error", Some("42000".to_string())).into();
        assert!(mcp_err.message.contains("42000"));
    }

    #[test]
    fn test_faults_map_to_internal_error() {
        let mcp_err: rmcp::ErrorData = GatewayError::internal("boom").into();
        assert_eq!(mcp_err.code.0, -32603);

        let mcp_err: rmcp::ErrorData = GatewayError::connection("refused", "try again").into();
        assert_eq!(mcp_err.code.0, -32603);
        assert_eq!(mcp_err.data.unwrap()["suggestion"], "try again");
    }
}
