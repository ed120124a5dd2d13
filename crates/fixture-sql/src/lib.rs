//! SQL statement text for pg-fixture.
//!
//! This crate only assembles text; it never talks to a database.
//!
//! - [`ddl`] - `CREATE TABLE` and the schema reset
//! - [`insert`] - multi-row `INSERT ... VALUES` with random values
//! - [`catalog`] - `information_schema` queries used for discovery
//! - [`quote`] - identifier and literal rendering, the one place escaping
//!   policy lives

pub mod catalog;
pub mod ddl;
pub mod insert;
pub mod quote;

pub use catalog::{build_row_count, LIST_COLUMNS_SQL, LIST_TABLES_SQL};
pub use ddl::{build_create_table, build_drop_schema};
pub use insert::{build_insert, random_literal, SqlBuildError};
pub use quote::{identifier, literal};
