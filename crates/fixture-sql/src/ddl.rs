//! PostgreSQL DDL text.

use crate::quote::identifier;
use fixture_core::ColumnSpec;

/// Drops and recreates the `public` schema, removing every table in it.
pub const DROP_SCHEMA_SQL: &str = "drop schema public cascade; create schema public;";

/// The reset statement run before any generation.
///
/// This is two statements in one string, so it must go through a
/// simple-query (multi-statement) execution path.
pub fn build_drop_schema() -> &'static str {
    DROP_SCHEMA_SQL
}

/// Generate a `CREATE TABLE` statement.
///
/// Columns keep their input order. No trailing semicolon is added.
pub fn build_create_table(table_name: &str, columns: &[ColumnSpec]) -> String {
    let column_defs: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", identifier(&c.name), c.sql_type))
        .collect();

    format!(
        "CREATE TABLE {} ({})",
        identifier(table_name),
        column_defs.join(", ")
    )
}
