//! Command gateway.
//!
//! Takes one `(operation, arguments)` pair from the transport, checks that
//! the statement belongs to the class the operation allows, runs it on the
//! injected executor and wraps the outcome in a [`ToolResponse`].
//!
//! Outcomes:
//! - `Ok(response)` with `is_error == false`: the statement ran.
//! - `Ok(response)` with `is_error == true`: the database rejected it.
//! - `Err(_)`: protocol errors (nothing was executed) and faults.

use crate::db::executor::StatementExecutor;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{ExecutionRequest, QueryArguments};
use crate::tools::classifier::classify;
use crate::tools::format::ToolResponse;
use crate::tools::registry::{self, Operation};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, error, info, warn};
use uuid::Uuid;

/// Validates, classifies and dispatches tool calls.
///
/// Holds no per-call state, so one instance serves any number of
/// concurrent calls.
pub struct CommandGateway<E: StatementExecutor> {
    executor: Arc<E>,
}

impl<E: StatementExecutor> CommandGateway<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }

    /// Run one tool call end to end.
    pub async fn execute(&self, request: ExecutionRequest) -> GatewayResult<ToolResponse> {
        let correlation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "gateway.execute",
            correlation_id = %correlation_id,
            operation = %request.operation_name,
        );

        async move {
            let Some(operation) = registry::lookup(&request.operation_name) else {
                warn!("Unknown operation requested");
                return Err(GatewayError::unknown_operation(&request.operation_name));
            };

            let args = QueryArguments::parse(request.arguments.as_ref()).inspect_err(|e| {
                warn!(error = %e, "Rejected arguments");
            })?;

            info!("Executing operation");
            self.dispatch(operation, &args.query).await
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, operation: &Operation, sql: &str) -> GatewayResult<ToolResponse> {
        let found = classify(sql);
        debug!(class = %found, allowed = %operation.allowed_class, "Classified statement");

        if found != operation.allowed_class {
            warn!(
                class = %found,
                allowed = %operation.allowed_class,
                "Statement class not allowed for operation"
            );
            return Err(GatewayError::class_mismatch(
                operation.name,
                operation.allowed_class,
                found,
            ));
        }

        let start = Instant::now();
        let outcome = match operation.completion_message {
            None => self.executor.fetch_rows(sql).await.and_then(|rows| {
                info!(
                    rows = rows.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Query completed"
                );
                ToolResponse::rows(&rows)
            }),
            Some(message) => self.executor.execute(sql).await.and_then(|meta| {
                info!(
                    rows_affected = meta.rows_affected,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Statement completed"
                );
                ToolResponse::mutation(message, meta)
            }),
        };

        match outcome {
            Ok(response) => Ok(response),
            Err(GatewayError::Database { message, code }) => {
                warn!(
                    code = code.as_deref().unwrap_or("none"),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %message,
                    "Database rejected statement"
                );
                Ok(ToolResponse::database_error(
                    self.executor.database_type(),
                    &message,
                ))
            }
            Err(e) => {
                error!(error = %e, "Statement execution failed");
                Err(e)
            }
        }
    }
}

impl<E: StatementExecutor> Clone for CommandGateway<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}
