//! Run sequencing and per-table fan-out.

use crate::database::{Catalog, SqlExecutor};
use crate::error::OrchestratorError;
use fixture_core::{Parameters, TableInfo};
use fixture_generator::DataGenerator;
use fixture_sql::{build_create_table, build_drop_schema, build_insert, SqlBuildError};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default number of tables worked on at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Generator stream for table creation units.
const CREATE_STREAM: u64 = 0;

/// Generator stream for table population units.
const POPULATE_STREAM: u64 = 1;

/// Metrics from a fixture run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PopulateMetrics {
    /// Seed the run's data was generated from.
    pub seed: u64,
    /// Number of tables created.
    pub tables_created: u64,
    /// Number of tables that received an INSERT.
    pub tables_populated: u64,
    /// Number of tables with nothing to insert.
    pub tables_skipped: u64,
    /// Number of rows inserted.
    pub rows_inserted: u64,
    /// Time spent resetting the schema and creating tables.
    pub init_duration: Duration,
    /// Time spent discovering the schema and inserting rows.
    pub populate_duration: Duration,
}

impl PopulateMetrics {
    /// Total time across both phases.
    pub fn total_duration(&self) -> Duration {
        self.init_duration + self.populate_duration
    }

    /// Calculate rows per second over the population phase.
    pub fn rows_per_second(&self) -> f64 {
        if self.populate_duration.as_secs_f64() > 0.0 {
            self.rows_inserted as f64 / self.populate_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Drives a fixture run against an executor and a catalog.
///
/// The run moves through three barriers:
///
/// 1. the schema reset completes before any table is created
/// 2. every table is created before the catalog is read
/// 3. the catalog is read before any table is populated
///
/// Between the barriers, per-table work runs on a pool of at most
/// `concurrency` units. The first error stops the pool and is returned;
/// units already in flight are dropped and nothing is rolled back.
pub struct Orchestrator<E, C> {
    executor: E,
    catalog: C,
    generator: DataGenerator,
    concurrency: usize,
}

impl<E: SqlExecutor, C: Catalog> Orchestrator<E, C> {
    /// Create a new orchestrator.
    pub fn new(executor: E, catalog: C, generator: DataGenerator) -> Self {
        Self {
            executor,
            catalog,
            generator,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the maximum number of concurrent table units.
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, OrchestratorError> {
        if concurrency == 0 {
            return Err(OrchestratorError::InvalidConcurrency(concurrency));
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    /// Get the base seed of the run.
    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    /// Reset the schema, create the tables, then fill them.
    pub async fn run(&self, params: &Parameters) -> Result<PopulateMetrics, OrchestratorError> {
        let mut metrics = self.init_database(params).await?;
        let populated = self.populate_tables(params).await?;

        metrics.tables_populated = populated.tables_populated;
        metrics.tables_skipped = populated.tables_skipped;
        metrics.rows_inserted = populated.rows_inserted;
        metrics.populate_duration = populated.populate_duration;

        info!(
            "Run complete: {} tables, {} rows in {:?} ({:.2} rows/sec)",
            metrics.tables_created,
            metrics.rows_inserted,
            metrics.total_duration(),
            metrics.rows_per_second()
        );
        Ok(metrics)
    }

    /// Drop and recreate the public schema, then create
    /// `params.count_tables` random tables.
    pub async fn init_database(
        &self,
        params: &Parameters,
    ) -> Result<PopulateMetrics, OrchestratorError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics {
            seed: self.seed(),
            ..Default::default()
        };

        info!("Resetting public schema");
        self.executor
            .execute(build_drop_schema())
            .await
            .map_err(OrchestratorError::SchemaReset)?;

        info!(
            "Creating {} tables (concurrency: {})",
            params.count_tables, self.concurrency
        );
        let mut units = stream::iter(0..params.count_tables)
            .map(|index| self.create_table(params, index))
            .buffer_unordered(self.concurrency);

        while let Some(result) = units.next().await {
            let table_name = result?;
            metrics.tables_created += 1;
            debug!(
                "Created table {} ({}/{})",
                table_name, metrics.tables_created, params.count_tables
            );
        }

        metrics.init_duration = start_time.elapsed();
        info!(
            "Created {} tables in {:?}",
            metrics.tables_created, metrics.init_duration
        );
        Ok(metrics)
    }

    /// Insert `params.count_rows` random rows into every table the catalog
    /// reports.
    ///
    /// Column names and types come from the catalog, not from whatever this
    /// orchestrator generated, so this also works on a pre-existing schema.
    pub async fn populate_tables(
        &self,
        params: &Parameters,
    ) -> Result<PopulateMetrics, OrchestratorError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics {
            seed: self.seed(),
            ..Default::default()
        };

        let tables = self
            .catalog
            .discover()
            .await
            .map_err(OrchestratorError::SchemaDiscovery)?;
        info!("Discovered {} tables", tables.len());

        if params.count_rows == 0 {
            info!("Row count is 0, nothing to insert");
            metrics.tables_skipped = tables.len() as u64;
            metrics.populate_duration = start_time.elapsed();
            return Ok(metrics);
        }

        info!(
            "Populating {} tables with {} rows each (concurrency: {})",
            tables.len(),
            params.count_rows,
            self.concurrency
        );
        let mut units = stream::iter(tables.iter().enumerate())
            .map(|(index, table)| self.populate_table(table, params.count_rows, index))
            .buffer_unordered(self.concurrency);

        while let Some(result) = units.next().await {
            match result? {
                Some(rows) => {
                    metrics.tables_populated += 1;
                    metrics.rows_inserted += rows;
                }
                None => metrics.tables_skipped += 1,
            }
        }

        metrics.populate_duration = start_time.elapsed();
        info!(
            "Population complete: {} rows in {:?} ({:.2} rows/sec)",
            metrics.rows_inserted,
            metrics.populate_duration,
            metrics.rows_per_second()
        );
        Ok(metrics)
    }

    async fn create_table(
        &self,
        params: &Parameters,
        index: usize,
    ) -> Result<String, OrchestratorError> {
        let mut generator = self.generator.for_unit(CREATE_STREAM, index as u64);
        let table = generator.next_table(params)?;
        let sql = build_create_table(&table.table_name, &table.columns);
        debug!("DDL: {}", sql);

        self.executor
            .execute(&sql)
            .await
            .map_err(|source| OrchestratorError::TableCreation {
                table: table.table_name.clone(),
                source,
            })?;
        Ok(table.table_name)
    }

    /// Returns the number of rows inserted, or `None` if the table was
    /// skipped because it has no columns.
    async fn populate_table(
        &self,
        table: &TableInfo,
        row_count: usize,
        index: usize,
    ) -> Result<Option<u64>, OrchestratorError> {
        let mut generator = self.generator.for_unit(POPULATE_STREAM, index as u64);
        let sql = match build_insert(
            generator.rng(),
            &table.table_name,
            &table.columns,
            row_count,
        ) {
            Ok(sql) => sql,
            Err(SqlBuildError::NothingToInsert(name)) => {
                warn!("Skipping table {}: nothing to insert", name);
                return Ok(None);
            }
            Err(SqlBuildError::Generator(source)) => {
                return Err(OrchestratorError::ValueGeneration {
                    table: table.table_name.clone(),
                    source,
                });
            }
        };
        debug!("Inserting {} rows into {}", row_count, table.table_name);

        self.executor
            .execute(&sql)
            .await
            .map_err(|source| OrchestratorError::TableInsert {
                table: table.table_name.clone(),
                source,
            })?;
        Ok(Some(row_count as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDatabase;
    use fixture_core::{ColumnSpec, SupportedType};
    use fixture_generator::GeneratorError;

    fn test_params() -> Parameters {
        Parameters {
            count_tables: 3,
            count_columns: 2,
            count_rows: 5,
            max_name_length: 15,
            types: vec![SupportedType::Boolean, SupportedType::Integer],
        }
    }

    fn orchestrator(db: &MemoryDatabase, seed: u64) -> Orchestrator<MemoryDatabase, MemoryDatabase> {
        Orchestrator::new(db.clone(), db.clone(), DataGenerator::new(seed))
    }

    #[tokio::test]
    async fn test_run_creates_and_populates() {
        let db = MemoryDatabase::new();
        let params = test_params();

        let metrics = orchestrator(&db, 42).run(&params).await.unwrap();

        assert_eq!(metrics.seed, 42);
        assert_eq!(metrics.tables_created, 3);
        assert_eq!(metrics.tables_populated, 3);
        assert_eq!(metrics.rows_inserted, 15);

        let tables = db.discover().await.unwrap();
        assert_eq!(tables.len(), 3);
        for table in &tables {
            assert_eq!(table.columns.len(), 2);
            for column in &table.columns {
                assert!(params.allows_type(&column.sql_type));
            }
            assert_eq!(db.row_count(&table.table_name).await.unwrap(), 5);
        }
    }

    #[tokio::test]
    async fn test_reset_runs_first_and_inserts_last() {
        let db = MemoryDatabase::new();
        orchestrator(&db, 1).run(&test_params()).await.unwrap();

        let statements = db.statements().await;
        assert_eq!(statements.len(), 1 + 3 + 3);
        assert_eq!(statements[0], build_drop_schema());
        assert!(statements[1..4].iter().all(|s| s.starts_with("CREATE TABLE ")));
        assert!(statements[4..].iter().all(|s| s.starts_with("INSERT INTO ")));
    }

    #[tokio::test]
    async fn test_same_seed_same_statements() {
        let first = MemoryDatabase::new();
        let second = MemoryDatabase::new();
        orchestrator(&first, 9).run(&test_params()).await.unwrap();
        orchestrator(&second, 9)
            .with_concurrency(1)
            .unwrap()
            .run(&test_params())
            .await
            .unwrap();

        let mut a = first.statements().await;
        let mut b = second.statements().await;
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_rerun_replaces_previous_tables() {
        let db = MemoryDatabase::new();
        let params = test_params();

        orchestrator(&db, 1).run(&params).await.unwrap();
        let before = db.list_tables().await.unwrap();

        orchestrator(&db, 2).run(&params).await.unwrap();
        let after = db.list_tables().await.unwrap();

        assert_eq!(after.len(), 3);
        assert!(after.iter().all(|t| !before.contains(t)));
    }

    #[tokio::test]
    async fn test_zero_rows_issues_no_insert() {
        let db = MemoryDatabase::new();
        let params = Parameters {
            count_rows: 0,
            ..test_params()
        };

        let metrics = orchestrator(&db, 3).run(&params).await.unwrap();

        assert_eq!(metrics.rows_inserted, 0);
        assert_eq!(metrics.tables_skipped, 3);
        assert!(db
            .statements()
            .await
            .iter()
            .all(|s| !s.starts_with("INSERT")));
    }

    #[tokio::test]
    async fn test_zero_tables() {
        let db = MemoryDatabase::new();
        let params = Parameters {
            count_tables: 0,
            ..test_params()
        };

        let metrics = orchestrator(&db, 3).run(&params).await.unwrap();
        assert_eq!(metrics.tables_created, 0);
        assert_eq!(metrics.tables_populated, 0);
        assert_eq!(db.statements().await.len(), 1);
    }

    #[tokio::test]
    async fn test_populate_pre_existing_schema() {
        let db = MemoryDatabase::new()
            .with_table(
                "legacy",
                vec![
                    ColumnSpec::new("flag", "boolean"),
                    ColumnSpec::new("note", "character varying"),
                ],
            )
            .await
            .with_table("empty", vec![])
            .await;

        let metrics = orchestrator(&db, 4)
            .populate_tables(&test_params())
            .await
            .unwrap();

        assert_eq!(metrics.tables_populated, 1);
        assert_eq!(metrics.tables_skipped, 1);
        assert_eq!(db.row_count("legacy").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_unsupported_catalog_type_fails() {
        let db = MemoryDatabase::new()
            .with_table("legacy", vec![ColumnSpec::new("body", "text")])
            .await;

        let err = orchestrator(&db, 4)
            .populate_tables(&test_params())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::ValueGeneration {
                ref table,
                source: GeneratorError::UnsupportedType(ref t),
            } if table == "legacy" && t == "text"
        ));
        assert_eq!(err.to_string(), "Error generating values for table legacy");
    }

    #[tokio::test]
    async fn test_insert_failure_names_table() {
        let db = MemoryDatabase::new()
            .with_table("good", vec![ColumnSpec::new("a", "integer")])
            .await
            .with_table("bad", vec![ColumnSpec::new("a", "integer")])
            .await;
        db.fail_table("bad").await;

        let err = orchestrator(&db, 4)
            .populate_tables(&test_params())
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::TableInsert { ref table, .. } if table == "bad"));
    }

    #[tokio::test]
    async fn test_creation_failure_names_table() {
        let params = Parameters {
            count_tables: 1,
            ..test_params()
        };
        let expected = DataGenerator::new(6)
            .for_unit(CREATE_STREAM, 0)
            .next_table(&params)
            .unwrap()
            .table_name;

        let db = MemoryDatabase::new();
        db.fail_table(&expected).await;

        let err = orchestrator(&db, 6).init_database(&params).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::TableCreation { ref table, .. } if *table == expected));
    }

    #[tokio::test]
    async fn test_failed_reset_creates_no_tables() {
        let db = MemoryDatabase::new();
        db.fail_reset().await;

        let err = orchestrator(&db, 5)
            .init_database(&test_params())
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::SchemaReset(_)));
        assert_eq!(db.statements().await, vec![build_drop_schema().to_string()]);
    }

    #[tokio::test]
    async fn test_failed_discovery_inserts_nothing() {
        let db = MemoryDatabase::new()
            .with_table("legacy", vec![ColumnSpec::new("a", "integer")])
            .await;
        db.fail_catalog().await;

        let err = orchestrator(&db, 5)
            .populate_tables(&test_params())
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::SchemaDiscovery(_)));
        assert!(db.statements().await.is_empty());
    }

    /// Repeats the first column of every CREATE TABLE before passing it on.
    struct RepeatFirstColumn(MemoryDatabase);

    #[async_trait::async_trait]
    impl SqlExecutor for RepeatFirstColumn {
        async fn execute(&self, sql: &str) -> Result<(), crate::error::DatabaseError> {
            match sql
                .strip_prefix("CREATE TABLE ")
                .and_then(|rest| rest.split_once(" ("))
            {
                Some((table, body)) => {
                    let first = body
                        .split(", ")
                        .next()
                        .unwrap_or(body)
                        .trim_end_matches(')');
                    let repeated = format!("CREATE TABLE {table} ({first}, {body}");
                    self.0.execute(&repeated).await
                }
                None => self.0.execute(sql).await,
            }
        }
    }

    #[tokio::test]
    async fn test_duplicate_column_names_fail_creation() {
        let params = Parameters {
            count_tables: 1,
            ..test_params()
        };
        let expected = DataGenerator::new(8)
            .for_unit(CREATE_STREAM, 0)
            .next_table(&params)
            .unwrap()
            .table_name;

        let db = MemoryDatabase::new();
        let executor = RepeatFirstColumn(db.clone());
        let err = Orchestrator::new(executor, db.clone(), DataGenerator::new(8))
            .init_database(&params)
            .await
            .unwrap_err();

        match err {
            OrchestratorError::TableCreation { table, source } => {
                assert_eq!(table, expected);
                assert!(source.to_string().contains("specified more than once"));
            }
            other => panic!("Expected TableCreation, got {other:?}"),
        }
        assert!(db.list_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected() {
        let db = MemoryDatabase::new();
        assert!(matches!(
            orchestrator(&db, 1).with_concurrency(0),
            Err(OrchestratorError::InvalidConcurrency(0))
        ));
    }

    #[test]
    fn test_metrics() {
        let metrics = PopulateMetrics {
            rows_inserted: 1000,
            init_duration: Duration::from_secs(2),
            populate_duration: Duration::from_secs(10),
            ..Default::default()
        };

        assert_eq!(metrics.rows_per_second(), 100.0);
        assert_eq!(metrics.total_duration(), Duration::from_secs(12));
        assert_eq!(PopulateMetrics::default().rows_per_second(), 0.0);
    }
}
