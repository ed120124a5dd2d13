//! Core types for the pg-fixture generator.
//!
//! This crate provides the foundational types shared by every layer:
//!
//! - [`SupportedType`] - The closed set of column types fixtures are built from
//! - [`ColumnSpec`] / [`TableInfo`] - Generated or introspected table schemas
//! - [`GeneratedValue`] - Typed random values before they are rendered to SQL
//! - [`Parameters`] - Run parameters parsed from a `key=value` file
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    ├─── fixture-generator   (random identifiers, columns, values)
//!    │
//!    ├─── fixture-sql         (CREATE TABLE / INSERT / catalog SQL text)
//!    │
//!    └─── fixture-postgresql  (executor, catalog, orchestrator)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{Parameters, SupportedType};
//!
//! let params = Parameters::from_properties(
//!     "countTables=3\ncountColumns=2\ncountRows=5\nmaxNameLength=15\ntypes=boolean,integer\n",
//! )
//! .unwrap();
//!
//! assert_eq!(params.count_tables, 3);
//! assert_eq!(params.types, vec![SupportedType::Boolean, SupportedType::Integer]);
//! ```

pub mod params;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use params::{Parameters, ParametersError};
pub use schema::{ColumnSpec, TableInfo};
pub use types::{SupportedType, UnsupportedType};
pub use values::GeneratedValue;
