//! Single-statement enforcement.
//!
//! Each tool call must carry exactly one SQL statement. Text that stacks
//! further statements after a `;` is rejected before a connection is
//! checked out. Uses the [sqlparser](https://docs.rs/sqlparser/) tokenizer so
//! semicolons inside string literals, quoted identifiers and comments do
//! not count.

use crate::error::{GatewayError, GatewayResult};
use crate::models::DatabaseType;
use sqlparser::dialect::{Dialect, MySqlDialect, SQLiteDialect};
use sqlparser::tokenizer::{Token, Tokenizer};

pub const MULTIPLE_STATEMENTS_MESSAGE: &str =
    "Multiple statements are not allowed; send exactly one statement per call";

fn get_dialect(db_type: DatabaseType) -> Box<dyn Dialect> {
    match db_type {
        DatabaseType::MySQL => Box::new(MySqlDialect {}),
        DatabaseType::SQLite => Box::new(SQLiteDialect {}),
    }
}

/// Reject statement text containing more than one statement.
///
/// A single trailing `;` (optionally followed by whitespace or comments)
/// is allowed. Text that cannot be tokenized is rejected as well, since
/// its statement boundaries are unknown.
pub fn ensure_single_statement(sql: &str, db_type: DatabaseType) -> GatewayResult<()> {
    let dialect = get_dialect(db_type);
    let tokens = Tokenizer::new(dialect.as_ref(), sql)
        .tokenize()
        .map_err(|e| GatewayError::database(format!("Could not tokenize statement: {}", e), None))?;

    let mut seen_terminator = false;
    for token in &tokens {
        match token {
            Token::Whitespace(_) | Token::EOF => {}
            Token::SemiColon => seen_terminator = true,
            _ if seen_terminator => {
                return Err(GatewayError::database(MULTIPLE_STATEMENTS_MESSAGE, None));
            }
            _ => {}
        }
    }
    Ok(())
}
