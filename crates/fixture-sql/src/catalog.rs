//! `information_schema` queries for schema discovery.

use crate::quote::identifier;

/// Lists the base tables of the `public` schema, by name.
pub const LIST_TABLES_SQL: &str = "SELECT table_name
FROM information_schema.tables
WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
ORDER BY table_name";

/// Lists `(column_name, data_type)` of one `public` table in ordinal order.
///
/// The table name is bound as `$1` rather than spliced into the text.
pub const LIST_COLUMNS_SQL: &str = "SELECT column_name, data_type
FROM information_schema.columns
WHERE table_schema = 'public' AND table_name = $1
ORDER BY ordinal_position";

/// Generate a row count query for a table.
pub fn build_row_count(table_name: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", identifier(table_name))
}
