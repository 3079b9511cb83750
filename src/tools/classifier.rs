//! Statement classification.
//!
//! Routing is a prefix check on the normalized statement text, not a parse.
//! Whether the statement is valid SQL is left to the database engine.

use serde::Serialize;

/// The class of SQL statement a tool is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementClass {
    Read,
    CreateTable,
    Insert,
    Update,
    Delete,
    Unknown,
}

/// Prefixes tested in order; the first match wins.
const PREFIXES: &[(&str, StatementClass)] = &[
    ("select", StatementClass::Read),
    ("create table", StatementClass::CreateTable),
    ("insert into", StatementClass::Insert),
    ("update", StatementClass::Update),
    ("delete from", StatementClass::Delete),
];

impl StatementClass {
    /// SQL keywords that introduce statements of this class.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Read => "SELECT",
            Self::CreateTable => "CREATE TABLE",
            Self::Insert => "INSERT INTO",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE FROM",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// True for classes that modify the database.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::CreateTable | Self::Insert | Self::Update | Self::Delete
        )
    }
}

impl std::fmt::Display for StatementClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Classify a raw statement. Never fails: unmatched text is `Unknown`.
pub fn classify(sql: &str) -> StatementClass {
    let normalized = sql.trim().to_ascii_lowercase();
    PREFIXES
        .iter()
        .find(|(prefix, _)| normalized.starts_with(prefix))
        .map(|(_, class)| *class)
        .unwrap_or(StatementClass::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_class() {
        assert_eq!(classify("SELECT * FROM test_users"), StatementClass::Read);
        assert_eq!(
            classify("CREATE TABLE t (id INT PRIMARY KEY)"),
            StatementClass::CreateTable
        );
        assert_eq!(
            classify("INSERT INTO t (id) VALUES (1)"),
            StatementClass::Insert
        );
        assert_eq!(classify("UPDATE t SET id = 2"), StatementClass::Update);
        assert_eq!(classify("DELETE FROM t WHERE id = 2"), StatementClass::Delete);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("select 1"), StatementClass::Read);
        assert_eq!(classify("SeLeCt 1"), StatementClass::Read);
        assert_eq!(classify("create TABLE x (a int)"), StatementClass::CreateTable);
        assert_eq!(classify("Delete From x"), StatementClass::Delete);
    }

    #[test]
    fn test_classify_trims_whitespace() {
        assert_eq!(classify("   \n\tSELECT 1  \n"), StatementClass::Read);
        assert_eq!(classify("\n  update t set a = 1"), StatementClass::Update);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify(""), StatementClass::Unknown);
        assert_eq!(classify("   "), StatementClass::Unknown);
        assert_eq!(classify("DROP TABLE users"), StatementClass::Unknown);
        assert_eq!(classify("SHOW TABLES"), StatementClass::Unknown);
        assert_eq!(classify("WITH x AS (SELECT 1) SELECT * FROM x"), StatementClass::Unknown);
        assert_eq!(classify("-- comment\nSELECT 1"), StatementClass::Unknown);
    }

    #[test]
    fn test_classify_requires_full_prefix() {
        // "insert" alone is not "insert into"
        assert_eq!(classify("INSERT t VALUES (1)"), StatementClass::Unknown);
        assert_eq!(classify("DELETE t"), StatementClass::Unknown);
        assert_eq!(classify("CREATE INDEX idx ON t (a)"), StatementClass::Unknown);
        assert_eq!(classify("CREATE  TABLE t (a int)"), StatementClass::Unknown);
    }

    #[test]
    fn test_classify_is_prefix_only() {
        // Anything after the prefix is not inspected.
        assert_eq!(classify("selectify"), StatementClass::Read);
        assert_eq!(classify("updated_at"), StatementClass::Update);
        assert_eq!(
            classify("SELECT 1; DELETE FROM users"),
            StatementClass::Read
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let inputs = [
            "SELECT 1",
            "  insert into t values (1)",
            "DROP TABLE x",
            "update t set a=1",
        ];
        for input in inputs {
            assert_eq!(classify(input), classify(input));
            assert_eq!(classify(input), classify(&input.trim().to_lowercase()));
        }
    }

    #[test]
    fn test_keyword_display() {
        assert_eq!(StatementClass::Read.to_string(), "SELECT");
        assert_eq!(StatementClass::CreateTable.to_string(), "CREATE TABLE");
        assert_eq!(StatementClass::Insert.to_string(), "INSERT INTO");
        assert_eq!(StatementClass::Update.to_string(), "UPDATE");
        assert_eq!(StatementClass::Delete.to_string(), "DELETE FROM");
    }

    #[test]
    fn test_is_mutating() {
        assert!(!StatementClass::Read.is_mutating());
        assert!(!StatementClass::Unknown.is_mutating());
        assert!(StatementClass::CreateTable.is_mutating());
        assert!(StatementClass::Delete.is_mutating());
    }
}
