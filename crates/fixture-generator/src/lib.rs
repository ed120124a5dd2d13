//! Random schema and value generator for pg-fixture.
//!
//! Every function takes the random source explicitly as `&mut R where R: Rng`.
//! Nothing here holds global state, so callers choose between one seeded
//! source per worker ([`DataGenerator::for_unit`]) or a single shared one.
//!
//! # Architecture
//!
//! ```text
//! Parameters
//!      │
//!      ▼
//! ┌─────────────────┐
//! │  DataGenerator  │
//! │                 │
//! │  - seed         │
//! │  - rng (StdRng) │
//! └────────┬────────┘
//!          │
//!          ├──▶ TableInfo { table_name, columns }   (CREATE TABLE)
//!          └──▶ GeneratedValue per column           (INSERT)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::Parameters;
//! use fixture_generator::DataGenerator;
//!
//! let params = Parameters::from_properties(
//!     "countTables=1\ncountColumns=3\ncountRows=10\nmaxNameLength=5\ntypes=integer\n",
//! )
//! .unwrap();
//!
//! let mut generator = DataGenerator::new(42);
//! let table = generator.next_table(&params).unwrap();
//! assert_eq!(table.columns.len(), 3);
//! ```
//!
//! # Value policy
//!
//! - `boolean` - uniform `true` / `false`
//! - `integer` - random `i32` plus 100, wrapping on overflow
//! - `double precision` - uniform `[0, 1)` plus 100
//! - `character varying` - 20 random lowercase letters

pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use generator::{DataGenerator, GeneratorError};
pub use generators::identifier::{random_identifier, random_letters};
pub use generators::{random_columns, random_table, random_value};
