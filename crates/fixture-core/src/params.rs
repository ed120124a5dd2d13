//! Run parameters and their `key=value` file format.
//!
//! ```text
//! countTables=3
//! countColumns=2
//! countRows=5
//! maxNameLength=15
//! types=boolean,integer
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Every key is
//! required, and any key not listed above is rejected.

use crate::types::SupportedType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for parameter parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParametersError {
    /// Error reading the parameters file
    #[error("Failed to read parameters file: {0}")]
    Io(#[from] std::io::Error),

    /// Line is not of the form `key=value`
    #[error("Line {line}: expected key=value, got '{content}'")]
    MalformedLine { line: usize, content: String },

    /// Key is not one of the known parameters
    #[error("Unknown field: {0}")]
    UnknownKey(String),

    /// Required key never appeared
    #[error("Missing required field: {0}")]
    MissingKey(&'static str),

    /// Value could not be parsed or is out of range
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    /// A type in `types` is outside the supported set
    #[error("Unsupported type in types: '{0}'")]
    UnsupportedType(String),
}

/// Parameters for a single generation run.
///
/// Created once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    /// Number of tables to create
    pub count_tables: usize,

    /// Number of columns per table (at least 1)
    pub count_columns: usize,

    /// Number of rows to insert into each table
    pub count_rows: usize,

    /// Upper bound for the random part of identifier length (at least 1)
    pub max_name_length: usize,

    /// Column types to draw from (non-empty)
    pub types: Vec<SupportedType>,
}

const COUNT_TABLES: &str = "countTables";
const COUNT_COLUMNS: &str = "countColumns";
const COUNT_ROWS: &str = "countRows";
const MAX_NAME_LENGTH: &str = "maxNameLength";
const TYPES: &str = "types";

impl Parameters {
    /// Load parameters from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParametersError> {
        let content = fs::read_to_string(path)?;
        Self::from_properties(&content)
    }

    /// Parse parameters from `key=value` text.
    ///
    /// A key that appears more than once keeps its last value.
    pub fn from_properties(content: &str) -> Result<Self, ParametersError> {
        let mut count_tables = None;
        let mut count_columns = None;
        let mut count_rows = None;
        let mut max_name_length = None;
        let mut types = None;

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| ParametersError::MalformedLine {
                    line: idx + 1,
                    content: line.to_string(),
                })?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                COUNT_TABLES => count_tables = Some(parse_count(COUNT_TABLES, value)?),
                COUNT_COLUMNS => count_columns = Some(parse_count(COUNT_COLUMNS, value)?),
                COUNT_ROWS => count_rows = Some(parse_count(COUNT_ROWS, value)?),
                MAX_NAME_LENGTH => max_name_length = Some(parse_count(MAX_NAME_LENGTH, value)?),
                TYPES => types = Some(parse_types(value)?),
                other => return Err(ParametersError::UnknownKey(other.to_string())),
            }
        }

        let params = Parameters {
            count_tables: count_tables.ok_or(ParametersError::MissingKey(COUNT_TABLES))?,
            count_columns: count_columns.ok_or(ParametersError::MissingKey(COUNT_COLUMNS))?,
            count_rows: count_rows.ok_or(ParametersError::MissingKey(COUNT_ROWS))?,
            max_name_length: max_name_length
                .ok_or(ParametersError::MissingKey(MAX_NAME_LENGTH))?,
            types: types.ok_or(ParametersError::MissingKey(TYPES))?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the range constraints that parsing alone cannot express.
    pub fn validate(&self) -> Result<(), ParametersError> {
        if self.count_columns < 1 {
            return Err(ParametersError::InvalidValue {
                key: COUNT_COLUMNS,
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_name_length < 1 {
            return Err(ParametersError::InvalidValue {
                key: MAX_NAME_LENGTH,
                reason: "must be at least 1".to_string(),
            });
        }
        if self.types.is_empty() {
            return Err(ParametersError::InvalidValue {
                key: TYPES,
                reason: "must list at least one type".to_string(),
            });
        }
        Ok(())
    }

    /// Whether `sql_type` is one of the configured types.
    pub fn allows_type(&self, sql_type: &str) -> bool {
        self.types.iter().any(|t| t.as_sql() == sql_type)
    }
}

fn parse_count(key: &'static str, value: &str) -> Result<usize, ParametersError> {
    value
        .parse::<usize>()
        .map_err(|e| ParametersError::InvalidValue {
            key,
            reason: format!("'{value}' is not a non-negative integer ({e})"),
        })
}

fn parse_types(value: &str) -> Result<Vec<SupportedType>, ParametersError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<SupportedType>()
                .map_err(|e| ParametersError::UnsupportedType(e.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = "countTables=3
countColumns=2
countRows=5
maxNameLength=15
types=boolean,integer
";

    #[test]
    fn test_parse_valid() {
        let params = Parameters::from_properties(VALID).unwrap();
        assert_eq!(
            params,
            Parameters {
                count_tables: 3,
                count_columns: 2,
                count_rows: 5,
                max_name_length: 15,
                types: vec![SupportedType::Boolean, SupportedType::Integer],
            }
        );
    }

    #[test]
    fn test_parse_all_types_with_spaces_and_comments() {
        let content = "# fixture parameters\n\n  countTables = 0\ncountColumns=1\ncountRows=0\nmaxNameLength=1\ntypes=boolean, integer, double precision ,character varying\n";
        let params = Parameters::from_properties(content).unwrap();
        assert_eq!(params.count_tables, 0);
        assert_eq!(params.types, SupportedType::ALL.to_vec());
    }

    #[test]
    fn test_unknown_key_is_named() {
        let content = format!("{VALID}countIndexes=4\n");
        let err = Parameters::from_properties(&content).unwrap_err();
        assert!(matches!(err, ParametersError::UnknownKey(ref k) if k == "countIndexes"));
        assert_eq!(err.to_string(), "Unknown field: countIndexes");
    }

    #[test]
    fn test_missing_key() {
        let content = VALID.replace("countRows=5\n", "");
        let err = Parameters::from_properties(&content).unwrap_err();
        assert!(matches!(err, ParametersError::MissingKey("countRows")));
    }

    #[test]
    fn test_malformed_line() {
        let content = format!("{VALID}countTables\n");
        let err = Parameters::from_properties(&content).unwrap_err();
        assert!(matches!(err, ParametersError::MalformedLine { line: 6, .. }));
    }

    #[test]
    fn test_non_numeric_value() {
        let content = VALID.replace("countRows=5", "countRows=five");
        let err = Parameters::from_properties(&content).unwrap_err();
        assert!(matches!(
            err,
            ParametersError::InvalidValue {
                key: "countRows",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_value_rejected() {
        let content = VALID.replace("countTables=3", "countTables=-1");
        assert!(Parameters::from_properties(&content).is_err());
    }

    #[test]
    fn test_range_checks() {
        let zero_columns = VALID.replace("countColumns=2", "countColumns=0");
        assert!(matches!(
            Parameters::from_properties(&zero_columns).unwrap_err(),
            ParametersError::InvalidValue {
                key: "countColumns",
                ..
            }
        ));

        let zero_length = VALID.replace("maxNameLength=15", "maxNameLength=0");
        assert!(matches!(
            Parameters::from_properties(&zero_length).unwrap_err(),
            ParametersError::InvalidValue {
                key: "maxNameLength",
                ..
            }
        ));

        let no_types = VALID.replace("types=boolean,integer", "types=");
        assert!(matches!(
            Parameters::from_properties(&no_types).unwrap_err(),
            ParametersError::InvalidValue { key: "types", .. }
        ));
    }

    #[test]
    fn test_unsupported_type() {
        let content = VALID.replace("types=boolean,integer", "types=boolean,text");
        let err = Parameters::from_properties(&content).unwrap_err();
        assert!(matches!(err, ParametersError::UnsupportedType(ref t) if t == "text"));
    }

    #[test]
    fn test_allows_type() {
        let params = Parameters::from_properties(VALID).unwrap();
        assert!(params.allows_type("integer"));
        assert!(!params.allows_type("character varying"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let params = Parameters::from_file(file.path()).unwrap();
        assert_eq!(params.count_rows, 5);

        let err = Parameters::from_file("/nonexistent/params.properties").unwrap_err();
        assert!(matches!(err, ParametersError::Io(_)));
    }

    #[test]
    fn test_serializes_with_file_keys() {
        let params = Parameters::from_properties(VALID).unwrap();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["countTables"], 3);
        assert_eq!(json["types"][1], "integer");
    }
}
