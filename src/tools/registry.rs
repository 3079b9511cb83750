//! The fixed set of operations the gateway exposes.
//!
//! Each operation accepts exactly one statement class. The table is static:
//! nothing is registered at runtime.

use crate::models::QueryArguments;
use crate::tools::classifier::StatementClass;
use rmcp::model::{JsonObject, Tool};
use std::sync::{Arc, LazyLock};

/// A named operation bound to one statement class.
#[derive(Debug)]
pub struct Operation {
    pub name: &'static str,
    pub description: &'static str,
    pub allowed_class: StatementClass,
    /// Message returned on success for mutating operations. `None` for
    /// operations that return rows.
    pub completion_message: Option<&'static str>,
}

impl Operation {
    pub fn returns_rows(&self) -> bool {
        !self.allowed_class.is_mutating()
    }
}

static OPERATIONS: [Operation; 5] = [
    Operation {
        name: "run_sql_query",
        description: "Executes a read-only SQL query (SELECT statements only)",
        allowed_class: StatementClass::Read,
        completion_message: None,
    },
    Operation {
        name: "create_table",
        description: "Creates a new table in the MySQL database (CREATE TABLE statements only)",
        allowed_class: StatementClass::CreateTable,
        completion_message: Some("Table created successfully"),
    },
    Operation {
        name: "insert_data",
        description: "Inserts data into a table in the MySQL database (INSERT statements only)",
        allowed_class: StatementClass::Insert,
        completion_message: Some("Data inserted successfully"),
    },
    Operation {
        name: "update_data",
        description: "Updates data in a table in the MySQL database (UPDATE statements only)",
        allowed_class: StatementClass::Update,
        completion_message: Some("Data updated successfully"),
    },
    Operation {
        name: "delete_data",
        description: "Deletes data from a table in the MySQL database (DELETE statements only)",
        allowed_class: StatementClass::Delete,
        completion_message: Some("Data deleted successfully"),
    },
];

static INPUT_SCHEMA: LazyLock<Arc<JsonObject>> = LazyLock::new(|| {
    let schema = schemars::schema_for!(QueryArguments);
    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
});

/// All operations, in listing order.
pub fn operations() -> &'static [Operation] {
    &OPERATIONS
}

/// Find an operation by its exact name.
pub fn lookup(name: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.name == name)
}

/// The operation that accepts the given statement class, if any.
pub fn lookup_by_class(class: StatementClass) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.allowed_class == class)
}

/// JSON schema shared by every operation's arguments.
pub fn input_schema() -> Arc<JsonObject> {
    INPUT_SCHEMA.clone()
}

/// Tool descriptors for the MCP `tools/list` response.
pub fn tool_definitions() -> Vec<Tool> {
    OPERATIONS
        .iter()
        .map(|op| Tool::new(op.name, op.description, input_schema()))
        .collect()
}
