//! Handlers behind the `pg-fixture` subcommands.

use crate::logging::mask_connection_password;
use anyhow::Context;
use fixture_core::Parameters;
use fixture_generator::DataGenerator;
use fixture_postgresql::{
    verify, Catalog, MemoryDatabase, Orchestrator, PopulateMetrics, PostgreSQL,
    PostgreSQLFixtureArgs, SqlExecutor, VerifyArgs,
};
use std::path::Path;

/// Which part of a fixture run a command performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reset the schema, create tables, then populate them.
    Run,
    /// Reset the schema and create tables only.
    Init,
    /// Populate whatever tables already exist.
    Populate,
}

fn load_parameters(path: &Path) -> anyhow::Result<Parameters> {
    Parameters::from_file(path)
        .with_context(|| format!("Failed to load parameters from {path:?}"))
}

async fn execute_phase<E: SqlExecutor, C: Catalog>(
    orchestrator: &Orchestrator<E, C>,
    phase: Phase,
    params: &Parameters,
) -> anyhow::Result<PopulateMetrics> {
    let metrics = match phase {
        Phase::Run => orchestrator.run(params).await,
        Phase::Init => orchestrator.init_database(params).await,
        Phase::Populate => orchestrator.populate_tables(params).await,
    };
    metrics.with_context(|| format!("Fixture {phase:?} failed"))
}

/// Execute `phase` against PostgreSQL, or against an in-memory database in
/// dry-run mode, and return the run metrics.
pub async fn run_fixture(
    args: PostgreSQLFixtureArgs,
    phase: Phase,
) -> anyhow::Result<PopulateMetrics> {
    let common = args.common;
    let params = load_parameters(&common.params)?;

    let generator = match common.seed {
        Some(seed) => DataGenerator::new(seed),
        None => DataGenerator::from_entropy(),
    };
    tracing::info!(
        "Fixture {:?}: {} tables, {} columns, {} rows per table (seed={})",
        phase,
        params.count_tables,
        params.count_columns,
        params.count_rows,
        generator.seed()
    );

    let metrics = if common.dry_run {
        if phase == Phase::Populate {
            tracing::warn!("Dry run starts from an empty database: no tables to populate");
        }
        let db = MemoryDatabase::new();
        let orchestrator = Orchestrator::new(db.clone(), db.clone(), generator)
            .with_concurrency(common.concurrency)?;
        let metrics = execute_phase(&orchestrator, phase, &params).await?;

        tracing::info!("Dry run - statements that would be executed:");
        for sql in db.statements().await {
            tracing::info!("{}", sql);
        }
        metrics
    } else {
        let connection_string = args
            .postgresql_connection_string
            .context("--postgresql-connection-string is required unless --dry-run is set")?;
        tracing::info!(
            "Connecting to PostgreSQL at {}",
            mask_connection_password(&connection_string)
        );

        let postgres = PostgreSQL::new(connection_string);
        postgres
            .check_connection()
            .await
            .context("Failed to connect to PostgreSQL")?;

        let orchestrator = Orchestrator::new(postgres.clone(), postgres, generator)
            .with_concurrency(common.concurrency)?;
        execute_phase(&orchestrator, phase, &params).await?
    };

    if let Some(path) = &common.metrics_output {
        write_metrics(path, &metrics)?;
    }
    Ok(metrics)
}

fn write_metrics(path: &Path, metrics: &PopulateMetrics) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(metrics).context("Failed to serialize metrics")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write metrics to {path:?}"))?;
    tracing::info!("Metrics written to {:?}", path);
    Ok(())
}

/// Check a PostgreSQL database against a parameters file.
pub async fn run_verify(args: VerifyArgs) -> anyhow::Result<()> {
    let params = load_parameters(&args.params)?;

    tracing::info!(
        "Verifying PostgreSQL at {} against {} tables x {} rows",
        mask_connection_password(&args.postgresql_connection_string),
        params.count_tables,
        params.count_rows
    );

    let postgres = PostgreSQL::new(args.postgresql_connection_string);
    postgres
        .check_connection()
        .await
        .context("Failed to connect to PostgreSQL")?;

    let report = verify(&postgres, &params)
        .await
        .context("Failed to read the database catalog")?;

    if report.is_ok() {
        tracing::info!(
            "Verification completed successfully - {} tables match the parameters",
            report.tables_checked
        );
        Ok(())
    } else {
        for mismatch in &report.mismatches {
            tracing::error!("{}", mismatch);
        }
        Err(anyhow::anyhow!(
            "Verification failed - {} mismatches across {} tables",
            report.mismatches.len(),
            report.tables_checked
        ))
    }
}
