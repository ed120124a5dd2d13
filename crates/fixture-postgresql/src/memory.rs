//! In-memory stand-in for PostgreSQL.
//!
//! [`MemoryDatabase`] understands exactly the statements `fixture-sql`
//! produces: the schema reset, `CREATE TABLE` and multi-row `INSERT`. It
//! keeps a catalog and per-table row counts, rejects what PostgreSQL would
//! reject for those statements (duplicate tables or columns, unknown tables
//! or columns, VALUES tuples whose length differs from the column list), and
//! records every statement it receives.

use crate::database::{Catalog, SqlExecutor};
use crate::error::DatabaseError;
use async_trait::async_trait;
use fixture_core::ColumnSpec;
use fixture_sql::ddl::DROP_SCHEMA_SQL;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryTable {
    columns: Vec<ColumnSpec>,
    rows: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: BTreeMap<String, MemoryTable>,
    statements: Vec<String>,
    failing_tables: HashSet<String>,
    fail_reset: bool,
    fail_catalog: bool,
}

/// An in-memory database. Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table directly, as if it existed before the run.
    pub async fn with_table(self, name: &str, columns: Vec<ColumnSpec>) -> Self {
        self.state.lock().await.tables.insert(
            name.to_string(),
            MemoryTable {
                columns,
                rows: 0,
            },
        );
        self
    }

    /// Make every later statement that targets `table` fail.
    pub async fn fail_table(&self, table: &str) {
        self.state
            .lock()
            .await
            .failing_tables
            .insert(table.to_string());
    }

    /// Make every later schema reset fail.
    pub async fn fail_reset(&self) {
        self.state.lock().await.fail_reset = true;
    }

    /// Make every later catalog read fail.
    pub async fn fail_catalog(&self) {
        self.state.lock().await.fail_catalog = true;
    }

    /// Every statement received so far, in arrival order.
    pub async fn statements(&self) -> Vec<String> {
        self.state.lock().await.statements.clone()
    }

    fn apply(state: &mut MemoryState, sql: &str) -> Result<(), DatabaseError> {
        if sql == DROP_SCHEMA_SQL {
            if state.fail_reset {
                return Err(rejected("injected failure for schema reset".to_string()));
            }
            state.tables.clear();
            return Ok(());
        }

        if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
            let (table, body) = split_table_name(rest)?;
            check_not_failing(state, &table)?;
            let columns = parse_column_defs(body)?;
            if state.tables.contains_key(&table) {
                return Err(rejected(format!("relation \"{table}\" already exists")));
            }
            let mut seen = HashSet::new();
            for column in &columns {
                if !seen.insert(column.name.as_str()) {
                    return Err(rejected(format!(
                        "column \"{}\" specified more than once",
                        column.name
                    )));
                }
            }
            state
                .tables
                .insert(table, MemoryTable { columns, rows: 0 });
            return Ok(());
        }

        if let Some(rest) = sql.strip_prefix("INSERT INTO ") {
            let (table, body) = split_table_name(rest)?;
            check_not_failing(state, &table)?;
            let (column_list, values) = body
                .split_once(") \nVALUES\n")
                .ok_or_else(|| rejected("syntax error in INSERT".to_string()))?;
            let entry = state
                .tables
                .get_mut(&table)
                .ok_or_else(|| rejected(format!("relation \"{table}\" does not exist")))?;
            let targets: Vec<String> = column_list.split(", ").map(unquote).collect();
            for name in &targets {
                if !entry.columns.iter().any(|c| &c.name == name) {
                    return Err(rejected(format!(
                        "column \"{name}\" of relation \"{table}\" does not exist"
                    )));
                }
            }
            let arities = tuple_arities(values)?;
            for arity in &arities {
                if *arity > targets.len() {
                    return Err(rejected(
                        "INSERT has more expressions than target columns".to_string(),
                    ));
                }
                if *arity < targets.len() {
                    return Err(rejected(
                        "INSERT has more target columns than expressions".to_string(),
                    ));
                }
            }
            entry.rows += arities.len() as u64;
            return Ok(());
        }

        Err(rejected(format!("unsupported statement: {sql}")))
    }
}

fn rejected(message: String) -> DatabaseError {
    DatabaseError::Rejected(message)
}

fn check_not_failing(state: &MemoryState, table: &str) -> Result<(), DatabaseError> {
    if state.failing_tables.contains(table) {
        return Err(rejected(format!("injected failure for table \"{table}\"")));
    }
    Ok(())
}

fn check_catalog(state: &MemoryState) -> Result<(), DatabaseError> {
    if state.fail_catalog {
        return Err(rejected("injected failure for catalog read".to_string()));
    }
    Ok(())
}

/// Count the values of each tuple in `(a, b),\n\t(c, d);`.
///
/// Commas and parentheses inside single-quoted literals are ignored. The
/// list must end with `;` after the last tuple.
fn tuple_arities(values: &str) -> Result<Vec<usize>, DatabaseError> {
    let syntax_error = || rejected("syntax error in VALUES".to_string());
    let mut arities = Vec::new();
    let mut depth = 0usize;
    let mut count = 0usize;
    let mut in_quote = false;
    let mut terminated = false;

    for c in values.chars() {
        if terminated {
            if !c.is_whitespace() {
                return Err(syntax_error());
            }
            continue;
        }
        if in_quote {
            // A doubled quote closes and immediately reopens the literal.
            if c == '\'' {
                in_quote = false;
            }
            continue;
        }
        match c {
            '\'' if depth > 0 => in_quote = true,
            '(' => {
                depth += 1;
                if depth == 1 {
                    count = 1;
                }
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(syntax_error)?;
                if depth == 0 {
                    arities.push(count);
                }
            }
            ',' if depth == 1 => count += 1,
            ',' if depth == 0 => {}
            ';' if depth == 0 => terminated = true,
            c if depth == 0 && !c.is_whitespace() => return Err(syntax_error()),
            _ => {}
        }
    }

    if !terminated || in_quote || depth != 0 || arities.is_empty() {
        return Err(rejected("syntax error at end of input".to_string()));
    }
    Ok(arities)
}

/// Split `name (rest` into the unquoted name and `rest`.
fn split_table_name(s: &str) -> Result<(String, &str), DatabaseError> {
    let (name, rest) = s
        .split_once(" (")
        .ok_or_else(|| rejected(format!("syntax error near {s}")))?;
    Ok((unquote(name), rest))
}

/// Parse `a integer, b double precision)` into column specs.
fn parse_column_defs(body: &str) -> Result<Vec<ColumnSpec>, DatabaseError> {
    let body = body
        .strip_suffix(')')
        .ok_or_else(|| rejected("syntax error in CREATE TABLE".to_string()))?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    body.split(", ")
        .map(|def| {
            let (name, sql_type) = def
                .split_once(' ')
                .ok_or_else(|| rejected(format!("column \"{def}\" has no type")))?;
            Ok(ColumnSpec::new(unquote(name), sql_type))
        })
        .collect()
}

fn unquote(name: &str) -> String {
    match name.strip_prefix('"').and_then(|n| n.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => name.to_string(),
    }
}

#[async_trait]
impl SqlExecutor for MemoryDatabase {
    async fn execute(&self, sql: &str) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().await;
        state.statements.push(sql.to_string());
        Self::apply(&mut state, sql)
    }
}

#[async_trait]
impl Catalog for MemoryDatabase {
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let state = self.state.lock().await;
        check_catalog(&state)?;
        Ok(state.tables.keys().cloned().collect())
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnSpec>, DatabaseError> {
        let state = self.state.lock().await;
        check_catalog(&state)?;
        Ok(state
            .tables
            .get(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    async fn row_count(&self, table: &str) -> Result<u64, DatabaseError> {
        let state = self.state.lock().await;
        check_catalog(&state)?;
        state
            .tables
            .get(table)
            .map(|t| t.rows)
            .ok_or_else(|| rejected(format!("relation \"{table}\" does not exist")))
    }
}
