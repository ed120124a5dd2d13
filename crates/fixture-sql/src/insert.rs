//! Multi-row INSERT text with random values.

use crate::quote::{identifier, literal};
use fixture_core::ColumnSpec;
use fixture_generator::{random_value, GeneratorError};
use rand::Rng;

/// Errors that can occur while building an INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqlBuildError {
    /// Zero rows or zero columns; an empty VALUES clause is not valid SQL.
    #[error("Nothing to insert into '{0}'")]
    NothingToInsert(String),

    /// A column's type has no value generator.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

/// Generate a random value for `sql_type` and render it as a SQL literal.
pub fn random_literal<R: Rng>(rng: &mut R, sql_type: &str) -> Result<String, GeneratorError> {
    random_value(rng, sql_type).map(|v| literal(&v))
}

/// Generate an `INSERT` statement with `row_count` rows of random values.
///
/// ```text
/// INSERT INTO t (a, b) 
/// VALUES
///     (1, true),
///     (2, false);
/// ```
///
/// Each tuple is filled by calling the value generator once per column, in
/// column order. Returns [`SqlBuildError::NothingToInsert`] instead of
/// malformed SQL when there are no rows or no columns.
pub fn build_insert<R: Rng>(
    rng: &mut R,
    table_name: &str,
    columns: &[ColumnSpec],
    row_count: usize,
) -> Result<String, SqlBuildError> {
    if row_count == 0 || columns.is_empty() {
        return Err(SqlBuildError::NothingToInsert(table_name.to_string()));
    }

    let column_list = columns
        .iter()
        .map(|c| identifier(&c.name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!(
        "INSERT INTO {} ({}) \nVALUES\n",
        identifier(table_name),
        column_list
    );

    for i in 0..row_count {
        let values = columns
            .iter()
            .map(|c| random_literal(rng, &c.sql_type))
            .collect::<Result<Vec<_>, _>>()?;

        sql.push_str("\t(");
        sql.push_str(&values.join(", "));
        sql.push(')');
        sql.push_str(if i + 1 < row_count { ",\n" } else { ";" });
    }

    Ok(sql)
}
