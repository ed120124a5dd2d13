//! PostgreSQL fixture orchestrator.
//!
//! Runs the full generation sequence against a database:
//!
//! ```text
//! schema reset ─▶ create N tables ─▶ discover catalog ─▶ populate each table
//!   (barrier)      (bounded pool)       (barrier)          (bounded pool)
//! ```
//!
//! The database is reached only through the [`SqlExecutor`] and [`Catalog`]
//! traits. [`PostgreSQL`] implements them over `tokio-postgres`, and
//! [`MemoryDatabase`] implements them in memory for tests and dry runs.

pub mod args;
pub mod database;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod postgresql;
pub mod verify;

pub use args::{CommonFixtureArgs, PostgreSQLFixtureArgs, VerifyArgs};
pub use database::{Catalog, SqlExecutor};
pub use error::{DatabaseError, OrchestratorError};
pub use memory::MemoryDatabase;
pub use orchestrator::{Orchestrator, PopulateMetrics, DEFAULT_CONCURRENCY};
pub use postgresql::PostgreSQL;
pub use verify::{verify, Mismatch, VerifyReport};
