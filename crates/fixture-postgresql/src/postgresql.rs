//! `tokio-postgres` implementation of the database collaborators.

use crate::database::{Catalog, SqlExecutor};
use crate::error::DatabaseError;
use async_trait::async_trait;
use fixture_core::{ColumnSpec, TableInfo};
use fixture_sql::{build_row_count, LIST_COLUMNS_SQL, LIST_TABLES_SQL};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

/// A PostgreSQL database reached through a connection string.
///
/// Every operation opens its own connection and drops it when the operation
/// returns, whether it succeeded or not. Concurrent work units therefore
/// never share a session.
#[derive(Clone, Debug)]
pub struct PostgreSQL {
    connection_string: String,
}

impl PostgreSQL {
    /// Create a handle for the given connection string.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = PostgreSQL::new("host=localhost user=postgres password=postgres dbname=testdb");
    /// db.check_connection().await?;
    /// ```
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    /// Open a connection and run `SELECT 1`.
    pub async fn check_connection(&self) -> Result<(), DatabaseError> {
        let client = self.connect().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }

    async fn connect(&self) -> Result<Client, DatabaseError> {
        let (client, connection) = tokio_postgres::connect(&self.connection_string, NoTls).await?;

        // The connection task ends once the client is dropped.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(client)
    }
}

async fn query_tables(client: &Client) -> Result<Vec<String>, DatabaseError> {
    let rows = client.query(LIST_TABLES_SQL, &[]).await?;
    Ok(rows.iter().map(|row| row.get::<_, String>(0)).collect())
}

async fn query_columns(client: &Client, table: &str) -> Result<Vec<ColumnSpec>, DatabaseError> {
    let rows = client.query(LIST_COLUMNS_SQL, &[&table]).await?;
    Ok(rows
        .iter()
        .map(|row| ColumnSpec::new(row.get::<_, String>(0), row.get::<_, String>(1)))
        .collect())
}

#[async_trait]
impl SqlExecutor for PostgreSQL {
    async fn execute(&self, sql: &str) -> Result<(), DatabaseError> {
        let client = self.connect().await?;
        // batch_execute uses the simple query protocol, which accepts the
        // two-statement schema reset as well as single statements.
        client.batch_execute(sql).await?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for PostgreSQL {
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let client = self.connect().await?;
        query_tables(&client).await
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnSpec>, DatabaseError> {
        let client = self.connect().await?;
        query_columns(&client, table).await
    }

    async fn row_count(&self, table: &str) -> Result<u64, DatabaseError> {
        let client = self.connect().await?;
        let row = client.query_one(&build_row_count(table), &[]).await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }

    /// Reads the whole catalog over a single connection.
    async fn discover(&self) -> Result<Vec<TableInfo>, DatabaseError> {
        let client = self.connect().await?;
        let mut tables = Vec::new();
        for table_name in query_tables(&client).await? {
            let columns = query_columns(&client, &table_name).await?;
            debug!("Discovered table {} with {} columns", table_name, columns.len());
            tables.push(TableInfo::new(table_name, columns));
        }
        Ok(tables)
    }
}
