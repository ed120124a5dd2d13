//! End-to-end fixture runs against the in-memory database.

use fixture_core::{Parameters, SupportedType};
use fixture_generator::DataGenerator;
use fixture_postgresql::{verify, Catalog, MemoryDatabase, Orchestrator};
use fixture_sql::build_drop_schema;

const SEED: u64 = 42;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("fixture_postgresql=debug")
        .try_init()
        .ok();
}

fn load_params() -> Parameters {
    Parameters::from_file("tests/fixtures/fixture_params.properties")
        .expect("Failed to load test parameters")
}

#[tokio::test]
async fn test_memory_fixture_run_and_verify() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let params = load_params();
    let db = MemoryDatabase::new();

    let metrics = Orchestrator::new(db.clone(), db.clone(), DataGenerator::new(SEED))
        .with_concurrency(2)?
        .run(&params)
        .await?;

    assert_eq!(metrics.tables_created, 3);
    assert_eq!(metrics.tables_populated, 3);
    assert_eq!(metrics.rows_inserted, 15);

    let tables = db.discover().await?;
    assert_eq!(tables.len(), 3);
    for table in &tables {
        assert_eq!(table.columns.len(), 2);
        for column in &table.columns {
            let sql_type: SupportedType = column.sql_type.parse()?;
            assert!(params.types.contains(&sql_type));
        }
        assert_eq!(db.row_count(&table.table_name).await?, 5);
    }

    let report = verify(&db, &params).await?;
    assert!(report.is_ok(), "unexpected mismatches: {:?}", report.mismatches);

    // 1 reset + 3 CREATE TABLE + 3 INSERT
    let statements = db.statements().await;
    assert_eq!(statements.len(), 7);
    assert_eq!(statements[0], build_drop_schema());
    Ok(())
}

#[tokio::test]
async fn test_memory_fixture_rerun_replaces_tables() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let params = load_params();
    let db = MemoryDatabase::new();

    Orchestrator::new(db.clone(), db.clone(), DataGenerator::new(SEED))
        .run(&params)
        .await?;
    let first = db.list_tables().await?;

    Orchestrator::new(db.clone(), db.clone(), DataGenerator::new(SEED + 1))
        .run(&params)
        .await?;
    let second = db.list_tables().await?;

    assert_eq!(second.len(), 3);
    assert!(first.iter().all(|name| !second.contains(name)));
    assert!(verify(&db, &params).await?.is_ok());
    Ok(())
}

#[tokio::test]
async fn test_memory_fixture_same_seed_same_statements() -> Result<(), Box<dyn std::error::Error>>
{
    init_tracing();
    let params = load_params();

    let mut runs = Vec::new();
    for concurrency in [1, 4] {
        let db = MemoryDatabase::new();
        Orchestrator::new(db.clone(), db.clone(), DataGenerator::new(SEED))
            .with_concurrency(concurrency)?
            .run(&params)
            .await?;
        let mut statements = db.statements().await;
        statements.sort();
        runs.push(statements);
    }

    assert_eq!(runs[0], runs[1]);
    Ok(())
}
