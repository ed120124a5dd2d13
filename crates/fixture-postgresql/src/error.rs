//! Error types for the fixture orchestrator.

use fixture_generator::GeneratorError;
use thiserror::Error;

/// Failure reported by a database collaborator.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// Statement rejected by the in-memory database.
    #[error("{0}")]
    Rejected(String),
}

/// Errors that end a fixture run.
///
/// Every variant is fatal; nothing is retried.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Dropping and recreating the public schema failed.
    #[error("Error clearing database")]
    SchemaReset(#[source] DatabaseError),

    /// A CREATE TABLE statement failed.
    #[error("Error creating table {table}")]
    TableCreation {
        table: String,
        #[source]
        source: DatabaseError,
    },

    /// Reading tables or columns from the catalog failed.
    #[error("Error reading database schema")]
    SchemaDiscovery(#[source] DatabaseError),

    /// An INSERT statement failed.
    #[error("Error populating table {table}")]
    TableInsert {
        table: String,
        #[source]
        source: DatabaseError,
    },

    /// A catalog column has a type with no value generator.
    #[error("Error generating values for table {table}")]
    ValueGeneration {
        table: String,
        #[source]
        source: GeneratorError,
    },

    /// Counting rows during verification failed.
    #[error("Error counting rows in table {table}")]
    RowCount {
        table: String,
        #[source]
        source: DatabaseError,
    },

    /// Random generation failed, e.g. a column type with no generator.
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Worker pool size must be at least 1.
    #[error("Invalid concurrency: {0} (must be at least 1)")]
    InvalidConcurrency(usize),
}
