//! Fixture integration tests.
//!
//! Each test runs the full reset -> create -> discover -> populate sequence
//! and then checks the resulting catalog with `verify`. The memory tests run
//! anywhere; the PostgreSQL tests need a server at `POSTGRESQL_TEST_URL`.

mod memory_fixture;
mod postgresql_fixture;
