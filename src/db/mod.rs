//! Database access layer.
//!
//! - `pool`: the shared connection pool
//! - `executor`: the `StatementExecutor` seam used by the gateway
//! - `statement`: single-statement enforcement
//! - `types`: row to JSON conversion

pub mod executor;
pub mod pool;
pub mod statement;
pub mod types;

pub use executor::StatementExecutor;
pub use pool::{DbPool, PoolBackend};
pub use types::{JsonRow, RowToJson};
