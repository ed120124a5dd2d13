//! Table schema definitions.
//!
//! The same types describe a table in two situations:
//!
//! - freshly generated, right before its `CREATE TABLE` runs
//! - read back from `information_schema`, right before it is populated
//!
//! Column types are kept as the raw catalog string rather than a
//! [`SupportedType`](crate::SupportedType), because an introspected table may
//! contain columns the generator cannot fill. That is reported when values
//! are generated, not when the catalog is read.

use serde::{Deserialize, Serialize};

/// A single column: its name and SQL type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,

    /// Column type, e.g. `integer` or `character varying`
    #[serde(rename = "type")]
    pub sql_type: String,
}

impl ColumnSpec {
    /// Create a new column spec.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }
}

/// Schema of a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name
    pub table_name: String,

    /// Columns in ordinal order
    pub columns: Vec<ColumnSpec>,
}

impl TableInfo {
    /// Create a new table info.
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
        }
    }
}
