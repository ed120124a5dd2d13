//! Check a populated database against the parameters that produced it.

use crate::database::Catalog;
use crate::error::OrchestratorError;
use fixture_core::Parameters;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// A single difference between the database and the parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    TableCount {
        expected: usize,
        actual: usize,
    },
    ColumnCount {
        table: String,
        expected: usize,
        actual: usize,
    },
    UnexpectedType {
        table: String,
        column: String,
        sql_type: String,
    },
    RowCount {
        table: String,
        expected: u64,
        actual: u64,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::TableCount { expected, actual } => {
                write!(f, "expected {expected} tables, found {actual}")
            }
            Mismatch::ColumnCount {
                table,
                expected,
                actual,
            } => write!(f, "table {table}: expected {expected} columns, found {actual}"),
            Mismatch::UnexpectedType {
                table,
                column,
                sql_type,
            } => write!(
                f,
                "table {table}: column {column} has unconfigured type {sql_type}"
            ),
            Mismatch::RowCount {
                table,
                expected,
                actual,
            } => write!(f, "table {table}: expected {expected} rows, found {actual}"),
        }
    }
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    /// Number of tables inspected.
    pub tables_checked: usize,
    /// Every difference found.
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    /// Whether the database matched the parameters.
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare the live schema and row counts with `params`.
///
/// Checks the table count, each table's column count and column types, and
/// each table's row count. Mismatches are collected rather than returned as
/// errors; only catalog failures are errors.
pub async fn verify<C: Catalog>(
    catalog: &C,
    params: &Parameters,
) -> Result<VerifyReport, OrchestratorError> {
    let tables = catalog
        .discover()
        .await
        .map_err(OrchestratorError::SchemaDiscovery)?;

    let mut report = VerifyReport {
        tables_checked: tables.len(),
        mismatches: Vec::new(),
    };

    if tables.len() != params.count_tables {
        report.mismatches.push(Mismatch::TableCount {
            expected: params.count_tables,
            actual: tables.len(),
        });
    }

    for table in &tables {
        if table.columns.len() != params.count_columns {
            report.mismatches.push(Mismatch::ColumnCount {
                table: table.table_name.clone(),
                expected: params.count_columns,
                actual: table.columns.len(),
            });
        }

        for column in &table.columns {
            if !params.allows_type(&column.sql_type) {
                report.mismatches.push(Mismatch::UnexpectedType {
                    table: table.table_name.clone(),
                    column: column.name.clone(),
                    sql_type: column.sql_type.clone(),
                });
            }
        }

        let rows = catalog
            .row_count(&table.table_name)
            .await
            .map_err(|source| OrchestratorError::RowCount {
                table: table.table_name.clone(),
                source,
            })?;
        if rows != params.count_rows as u64 {
            report.mismatches.push(Mismatch::RowCount {
                table: table.table_name.clone(),
                expected: params.count_rows as u64,
                actual: rows,
            });
        }
    }

    for mismatch in &report.mismatches {
        warn!("Verification mismatch: {}", mismatch);
    }
    info!(
        "Verified {} tables: {} mismatches",
        report.tables_checked,
        report.mismatches.len()
    );
    Ok(report)
}
