//! Statement execution.
//!
//! [`StatementExecutor`] is the seam between the gateway and the database.
//! [`DbPool`] is the production implementation; tests substitute their own.
//!
//! Every call runs exactly one statement. Stacked input is refused by
//! [`ensure_single_statement`] before a connection is checked out, and the
//! statement itself goes through `sqlx::query`, the prepared path, which
//! MySQL refuses to use for more than one statement. The connection goes
//! back to the pool when the guard drops, on success, error and timeout alike.

use crate::db::pool::{DbPool, PoolBackend};
use crate::db::statement::ensure_single_statement;
use crate::db::types::{JsonRow, RowToJson};
use crate::error::{GatewayError, GatewayResult};
use crate::models::{DatabaseType, ExecutionMetadata};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Runs raw SQL against a database.
pub trait StatementExecutor: Send + Sync {
    /// Backend type, used to prefix database error reports.
    fn database_type(&self) -> DatabaseType;

    /// Run a row-returning statement.
    fn fetch_rows(&self, sql: &str) -> impl Future<Output = GatewayResult<Vec<JsonRow>>> + Send;

    /// Run a mutating statement and report what the driver says it did.
    fn execute(&self, sql: &str) -> impl Future<Output = GatewayResult<ExecutionMetadata>> + Send;
}

impl StatementExecutor for DbPool {
    fn database_type(&self) -> DatabaseType {
        self.db_type()
    }

    async fn fetch_rows(&self, sql: &str) -> GatewayResult<Vec<JsonRow>> {
        ensure_single_statement(sql, self.db_type())?;
        debug!(
            timeout_secs = self.query_timeout().as_secs(),
            "Fetching rows"
        );
        let timeouts = Timeouts::of(self);
        match self.backend() {
            PoolBackend::MySql(p) => mysql::fetch_rows(p, sql, timeouts).await,
            PoolBackend::SQLite(p) => sqlite::fetch_rows(p, sql, timeouts).await,
        }
    }

    async fn execute(&self, sql: &str) -> GatewayResult<ExecutionMetadata> {
        ensure_single_statement(sql, self.db_type())?;
        debug!(
            timeout_secs = self.query_timeout().as_secs(),
            "Executing statement"
        );
        let timeouts = Timeouts::of(self);
        match self.backend() {
            PoolBackend::MySql(p) => mysql::execute(p, sql, timeouts).await,
            PoolBackend::SQLite(p) => sqlite::execute(p, sql, timeouts).await,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Timeouts {
    acquire: Duration,
    query: Duration,
}

impl Timeouts {
    fn of(pool: &DbPool) -> Self {
        Self {
            acquire: pool.acquire_timeout(),
            query: pool.query_timeout(),
        }
    }
}

fn timeout_error(operation: &str, timeout: Duration) -> GatewayError {
    GatewayError::timeout(operation, timeout.as_secs())
}

/// Map a failed checkout, reporting the pool's configured wait on timeout.
fn acquire_error(error: sqlx::Error, acquire_timeout: Duration) -> GatewayError {
    match error {
        sqlx::Error::PoolTimedOut => timeout_error("connection pool acquire", acquire_timeout),
        other => GatewayError::from(other),
    }
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================

mod mysql {
    use super::*;
    use sqlx::{MySql, MySqlPool};

    pub async fn fetch_rows(
        pool: &MySqlPool,
        sql: &str,
        timeouts: Timeouts,
    ) -> GatewayResult<Vec<JsonRow>> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| acquire_error(e, timeouts.acquire))?;
        let query = sqlx::query::<MySql>(sql).persistent(false);
        match timeout(timeouts.query, query.fetch_all(&mut *conn)).await {
            Ok(Ok(rows)) => Ok(rows.iter().map(|r| r.to_json_map()).collect()),
            Ok(Err(e)) => Err(GatewayError::from(e)),
            Err(_) => Err(timeout_error("query execution", timeouts.query)),
        }
    }

    pub async fn execute(
        pool: &MySqlPool,
        sql: &str,
        timeouts: Timeouts,
    ) -> GatewayResult<ExecutionMetadata> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| acquire_error(e, timeouts.acquire))?;
        let query = sqlx::query::<MySql>(sql).persistent(false);
        match timeout(timeouts.query, query.execute(&mut *conn)).await {
            Ok(Ok(r)) => Ok(ExecutionMetadata {
                rows_affected: r.rows_affected(),
                last_insert_id: Some(r.last_insert_id()),
            }),
            Ok(Err(e)) => Err(GatewayError::from(e)),
            Err(_) => Err(timeout_error("statement execution", timeouts.query)),
        }
    }
}

mod sqlite {
    use super::*;
    use sqlx::{Sqlite, SqlitePool};

    pub async fn fetch_rows(
        pool: &SqlitePool,
        sql: &str,
        timeouts: Timeouts,
    ) -> GatewayResult<Vec<JsonRow>> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| acquire_error(e, timeouts.acquire))?;
        let query = sqlx::query::<Sqlite>(sql).persistent(false);
        match timeout(timeouts.query, query.fetch_all(&mut *conn)).await {
            Ok(Ok(rows)) => Ok(rows.iter().map(|r| r.to_json_map()).collect()),
            Ok(Err(e)) => Err(GatewayError::from(e)),
            Err(_) => Err(timeout_error("query execution", timeouts.query)),
        }
    }

    pub async fn execute(
        pool: &SqlitePool,
        sql: &str,
        timeouts: Timeouts,
    ) -> GatewayResult<ExecutionMetadata> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| acquire_error(e, timeouts.acquire))?;
        let query = sqlx::query::<Sqlite>(sql).persistent(false);
        match timeout(timeouts.query, query.execute(&mut *conn)).await {
            Ok(Ok(r)) => Ok(ExecutionMetadata {
                rows_affected: r.rows_affected(),
                last_insert_id: u64::try_from(r.last_insert_rowid()).ok(),
            }),
            Ok(Err(e)) => Err(GatewayError::from(e)),
            Err(_) => Err(timeout_error("statement execution", timeouts.query)),
        }
    }
}
