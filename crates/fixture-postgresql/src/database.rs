//! Database collaborator traits.

use crate::error::DatabaseError;
use async_trait::async_trait;
use fixture_core::{ColumnSpec, TableInfo};

/// Executes SQL text, discarding any rows it returns.
///
/// `sql` may contain several `;`-separated statements.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<(), DatabaseError>;
}

/// Reads the live schema of the `public` schema.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Table names, sorted.
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError>;

    /// `(column_name, data_type)` pairs of one table, in ordinal order.
    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnSpec>, DatabaseError>;

    /// Number of rows currently in a table.
    async fn row_count(&self, table: &str) -> Result<u64, DatabaseError>;

    /// Every table together with its columns.
    async fn discover(&self) -> Result<Vec<TableInfo>, DatabaseError> {
        let mut tables = Vec::new();
        for table_name in self.list_tables().await? {
            let columns = self.list_columns(&table_name).await?;
            tables.push(TableInfo::new(table_name, columns));
        }
        Ok(tables)
    }
}
