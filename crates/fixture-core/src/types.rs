//! Column types supported by the fixture generator.
//!
//! Type names use PostgreSQL's `information_schema.columns.data_type`
//! vocabulary, so the same strings round-trip through `CREATE TABLE` and
//! catalog introspection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A column type the generator knows how to produce values for.
///
/// This is a closed set: any other type name is rejected when parsing
/// parameters and when generating values for an introspected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SupportedType {
    /// `boolean`
    Boolean,
    /// `integer`
    Integer,
    /// `double precision`
    DoublePrecision,
    /// `character varying`
    CharacterVarying,
}

/// Returned when a type name is outside [`SupportedType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported type: {0}")]
pub struct UnsupportedType(pub String);

impl SupportedType {
    /// Every supported type, in declaration order.
    pub const ALL: [SupportedType; 4] = [
        SupportedType::Boolean,
        SupportedType::Integer,
        SupportedType::DoublePrecision,
        SupportedType::CharacterVarying,
    ];

    /// The type name as written in DDL and reported by the catalog.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SupportedType::Boolean => "boolean",
            SupportedType::Integer => "integer",
            SupportedType::DoublePrecision => "double precision",
            SupportedType::CharacterVarying => "character varying",
        }
    }
}

impl fmt::Display for SupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SupportedType {
    type Err = UnsupportedType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(SupportedType::Boolean),
            "integer" => Ok(SupportedType::Integer),
            "double precision" => Ok(SupportedType::DoublePrecision),
            "character varying" => Ok(SupportedType::CharacterVarying),
            other => Err(UnsupportedType(other.to_string())),
        }
    }
}

impl TryFrom<String> for SupportedType {
    type Error = UnsupportedType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SupportedType> for String {
    fn from(value: SupportedType) -> Self {
        value.as_sql().to_string()
    }
}
