//! Individual generators for identifiers, columns and values.
//!
//! This module dispatches value generation on the column's SQL type name, as
//! reported by the catalog or chosen from the configured type list.

pub mod identifier;
pub mod numeric;

use crate::generator::GeneratorError;
use fixture_core::{ColumnSpec, GeneratedValue, Parameters, SupportedType, TableInfo};
use rand::Rng;

/// Length of generated `character varying` values.
pub const TEXT_VALUE_LENGTH: usize = 20;

/// Generate a value for a column of the given SQL type.
///
/// Fails with [`GeneratorError::UnsupportedType`] for any type name outside
/// [`SupportedType`]; it never falls back to a default value.
pub fn random_value<R: Rng>(rng: &mut R, sql_type: &str) -> Result<GeneratedValue, GeneratorError> {
    let value = match sql_type.parse::<SupportedType>()? {
        SupportedType::Boolean => GeneratedValue::Bool(rng.gen_bool(0.5)),
        SupportedType::Integer => numeric::generate_biased_int(rng),
        SupportedType::DoublePrecision => numeric::generate_biased_double(rng),
        SupportedType::CharacterVarying => {
            GeneratedValue::Text(identifier::random_letters(rng, TEXT_VALUE_LENGTH))
        }
    };
    Ok(value)
}

/// Generate exactly `params.count_columns` column definitions.
///
/// Each column gets an independent random name and a type chosen uniformly
/// from `params.types`. Names are not deduplicated; a collision is left for
/// the database to reject when the table is created.
pub fn random_columns<R: Rng>(
    rng: &mut R,
    params: &Parameters,
) -> Result<Vec<ColumnSpec>, GeneratorError> {
    if params.types.is_empty() {
        return Err(GeneratorError::NoTypes);
    }

    (0..params.count_columns)
        .map(|_| {
            let name = identifier::random_identifier(rng, params.max_name_length)?;
            let sql_type = params.types[rng.gen_range(0..params.types.len())];
            Ok(ColumnSpec::new(name, sql_type.as_sql()))
        })
        .collect()
}

/// Generate a table with a random name and random columns.
pub fn random_table<R: Rng>(rng: &mut R, params: &Parameters) -> Result<TableInfo, GeneratorError> {
    let table_name = identifier::random_identifier(rng, params.max_name_length)?;
    let columns = random_columns(rng, params)?;
    Ok(TableInfo::new(table_name, columns))
}
