//! DuckDB executor and driver implementation

use crate::error::{DbError, DbResult};
use crate::traits::{
    Closeable, CreateDatabaseOptions, Driver, DropDatabaseOptions, Executor, ExecutorOptions,
    RunSummary,
};
use async_trait::async_trait;
use duckdb::{AccessMode, Config, Connection};
use sl_core::{
    discover_seed_units, discover_units, ConnectionSettings, Direction, MigrationUnit, RunBound,
    RunRequest, SeedSource, TableName, UnitFormat,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const MEMORY: &str = ":memory:";

/// DuckDB database file (or `:memory:`) selected by connection settings.
///
/// Priority: `path` > `database` (with `.duckdb` appended) > in-memory.
pub fn database_path(settings: &ConnectionSettings) -> String {
    settings
        .path
        .clone()
        .or_else(|| settings.database.as_deref().map(duckdb_file_name))
        .unwrap_or_else(|| MEMORY.to_string())
}

fn duckdb_file_name(name: &str) -> String {
    if name.ends_with(".duckdb") {
        name.to_string()
    } else {
        format!("{}.duckdb", name)
    }
}

/// Open a connection, handling the `:memory:` special case
fn open_connection(path: &str) -> DbResult<Connection> {
    let conn = if path == MEMORY {
        Connection::open_in_memory()
    } else {
        Connection::open(Path::new(path))
    };
    conn.map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path)))
}

/// Open an existing database file without write access
fn open_read_only(path: &str) -> DbResult<Connection> {
    Config::default()
        .access_mode(AccessMode::ReadOnly)
        .and_then(|config| Connection::open_with_flags(Path::new(path), config))
        .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path)))
}

/// One row of the ledger table
#[derive(Debug, Clone, PartialEq, Eq)]
struct LedgerEntry {
    id: i64,
    name: String,
}

fn ledger_error(table: &TableName, err: impl std::fmt::Display) -> DbError {
    DbError::LedgerError {
        table: table.to_string(),
        message: err.to_string(),
    }
}

/// Create the ledger table (and its schema, when qualified) if absent.
fn ensure_ledger(conn: &Connection, table: &TableName) -> DbResult<()> {
    let mut sql = String::new();
    if let Some((schema, _)) = table.split_once('.') {
        sql.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {};\n", schema));
    }
    sql.push_str(&format!(
        "CREATE TABLE IF NOT EXISTS {} (
             id     BIGINT    NOT NULL,
             name   VARCHAR   NOT NULL,
             run_on TIMESTAMP NOT NULL DEFAULT current_timestamp
         );",
        table
    ));
    conn.execute_batch(&sql).map_err(|e| ledger_error(table, e))
}

fn ledger_exists(conn: &Connection, table: &TableName) -> DbResult<bool> {
    let (schema, name) = table.split_once('.').unwrap_or(("main", table.as_str()));
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, name],
            |row| row.get(0),
        )
        .map_err(|e| ledger_error(table, e))?;
    Ok(count > 0)
}

/// Applied entries in application order (oldest first). A ledger that was
/// never created has no entries.
fn ledger_entries(conn: &Connection, table: &TableName) -> DbResult<Vec<LedgerEntry>> {
    if !ledger_exists(conn, table)? {
        return Ok(Vec::new());
    }
    let mut stmt = conn
        .prepare(&format!("SELECT id, name FROM {} ORDER BY id", table))
        .map_err(|e| ledger_error(table, e))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LedgerEntry {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(|e| ledger_error(table, e))?;
    let entries = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ledger_error(table, e))?;
    Ok(entries)
}

fn record(conn: &Connection, table: &TableName, name: &str) -> DbResult<()> {
    let next_id: i64 = conn.query_row(
        &format!(
            "SELECT CAST(COALESCE(MAX(id), 0) + 1 AS BIGINT) FROM {}",
            table
        ),
        [],
        |row| row.get(0),
    )?;
    conn.execute(
        &format!("INSERT INTO {} (id, name) VALUES (?, ?)", table),
        duckdb::params![next_id, name],
    )?;
    Ok(())
}

fn forget(conn: &Connection, table: &TableName, id: i64) -> DbResult<()> {
    conn.execute(
        &format!("DELETE FROM {} WHERE id = ?", table),
        duckdb::params![id],
    )?;
    Ok(())
}

/// Execute `body` within `BEGIN` / `COMMIT` when `enabled`, rolling back on
/// error.
fn with_transaction<F>(conn: &Connection, enabled: bool, body: F) -> DbResult<()>
where
    F: FnOnce(&Connection) -> DbResult<()>,
{
    if !enabled {
        return body(conn);
    }

    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| DbError::ExecutionError(format!("BEGIN failed: {}", e)))?;

    let result = body(conn);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = conn.execute_batch("COMMIT") {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(DbError::ExecutionError(format!(
                    "COMMIT failed: {}",
                    commit_err
                )));
            }
        }
        Err(_) => {
            let _ = conn.execute_batch("ROLLBACK");
        }
    }
    result
}

fn unit_failed(name: &str, direction: Direction, err: DbError) -> DbError {
    DbError::MigrationFailed {
        name: name.to_string(),
        direction: direction.to_string(),
        message: err.to_string(),
    }
}

/// Pick the units a bounded run executes, in order.
///
/// `eligible` filters out units that should not run (already applied);
/// a `To` bound stops after the named unit, which must exist.
fn select_units<'a, F>(
    units: &'a [MigrationUnit],
    eligible: F,
    bound: &RunBound,
) -> DbResult<Vec<&'a MigrationUnit>>
where
    F: Fn(&MigrationUnit) -> bool,
{
    let last = match bound {
        RunBound::To(dest) => Some(
            units
                .iter()
                .position(|u| u.matches(dest))
                .ok_or_else(|| DbError::DestinationNotFound(dest.clone()))?,
        ),
        RunBound::Count(_) | RunBound::All => None,
    };

    let mut selected = Vec::new();
    for (index, unit) in units.iter().enumerate() {
        if last.is_some_and(|last| index > last) || bound.is_exhausted(selected.len()) {
            break;
        }
        if eligible(unit) {
            selected.push(unit);
        }
    }
    Ok(selected)
}

/// Table a CSV seed loads into: the file stem without a leading timestamp
/// prefix, so `20240101-users.csv` fills `users`.
fn csv_table_name(stem: &str) -> DbResult<TableName> {
    let digits = stem.len() - stem.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let name = match stem[digits..].strip_prefix(['-', '_']) {
        Some(rest) if digits > 0 && !rest.is_empty() => rest,
        _ => stem,
    };
    TableName::try_new(name)
        .map_err(|message| DbError::CsvError(format!("table name '{}' {}", name, message)))
}

fn load_csv(conn: &Connection, unit: &MigrationUnit) -> DbResult<()> {
    let table = csv_table_name(&unit.name)?;
    let path = unit.path.display().to_string().replace('\'', "''");
    conn.execute_batch(&format!(
        "CREATE OR REPLACE TABLE {} AS SELECT * FROM read_csv_auto('{}')",
        table, path
    ))
    .map_err(|e| DbError::CsvError(format!("{}: {}", unit.path.display(), e)))
}

/// DuckDB-backed migration and seed executor
pub struct DuckDbExecutor {
    conn: Option<Mutex<Connection>>,
    options: ExecutorOptions,
}

impl DuckDbExecutor {
    /// Open the database at `path` (or `:memory:`).
    ///
    /// A dry run never creates the file: an existing database is opened
    /// read-only, a missing one is planned against an empty in-memory one.
    pub fn open(path: &str, options: ExecutorOptions) -> DbResult<Self> {
        let conn = if !options.dry_run || path == MEMORY {
            open_connection(path)?
        } else if Path::new(path).exists() {
            open_read_only(path)?
        } else {
            log::info!("{} does not exist yet; planning against an empty database", path);
            open_connection(MEMORY)?
        };
        log::debug!(
            "Opened duckdb executor at {} for {}",
            path,
            options.units_dir.display()
        );
        Ok(Self {
            conn: Some(Mutex::new(conn)),
            options,
        })
    }

    /// Open an executor on a fresh in-memory database
    pub fn in_memory(options: ExecutorOptions) -> DbResult<Self> {
        Self::open(MEMORY, options)
    }

    /// Run `f` with the locked connection
    fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.conn.as_ref().ok_or(DbError::ConnectionClosed)?;
        let guard = conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        f(&guard)
    }

    /// Names recorded in the ledger, oldest first
    pub fn applied(&self) -> DbResult<Vec<String>> {
        self.with_conn(|conn| {
            Ok(ledger_entries(conn, &self.options.ledger_table)?
                .into_iter()
                .map(|e| e.name)
                .collect())
        })
    }

    fn forward_sync(
        &self,
        conn: &Connection,
        units: &[MigrationUnit],
        request: &RunRequest,
    ) -> DbResult<RunSummary> {
        let table = &self.options.ledger_table;
        let applied: HashSet<String> = ledger_entries(conn, table)?
            .into_iter()
            .map(|e| e.name)
            .collect();
        let selected = select_units(
            units,
            |u| !applied.contains(&request.ledger_name(&u.name)),
            &request.bound,
        )?;

        let mut summary = RunSummary::new(Direction::Up, request.dry_run);
        for unit in selected {
            let ledger_name = request.ledger_name(&unit.name);
            if request.dry_run {
                log::info!("[dry-run] would apply {}", ledger_name);
                summary.units.push(ledger_name);
                continue;
            }

            let sql = unit.statements(Direction::Up)?;
            log::info!("Applying {}", ledger_name);
            with_transaction(conn, request.use_transactions, |conn| {
                if let Some(sql) = &sql {
                    conn.execute_batch(sql)?;
                }
                record(conn, table, &ledger_name)
            })
            .map_err(|e| unit_failed(&ledger_name, Direction::Up, e))?;
            summary.units.push(ledger_name);
        }
        Ok(summary)
    }

    fn backward_sync(
        &self,
        conn: &Connection,
        units: &[MigrationUnit],
        request: &RunRequest,
    ) -> DbResult<RunSummary> {
        let table = &self.options.ledger_table;
        let limit = match &request.bound {
            RunBound::Count(n) => *n as usize,
            RunBound::All => usize::MAX,
            RunBound::To(dest) => {
                return Err(DbError::ExecutionError(format!(
                    "destination '{}' is not supported when reverting",
                    dest
                )))
            }
        };

        // Every entry must have its file before anything is reverted
        let plan = ledger_entries(conn, table)?
            .into_iter()
            .filter(|e| request.owns_ledger_entry(&e.name))
            .rev()
            .take(limit)
            .map(|entry| {
                let unit_name = request.unit_name(&entry.name);
                let unit = units
                    .iter()
                    .find(|u| u.name == unit_name)
                    .ok_or_else(|| DbError::MissingUnit {
                        name: entry.name.clone(),
                        dir: self.options.units_dir.display().to_string(),
                    })?;
                Ok((entry, unit))
            })
            .collect::<DbResult<Vec<(LedgerEntry, &MigrationUnit)>>>()?;

        let mut summary = RunSummary::new(Direction::Down, request.dry_run);
        for (entry, unit) in plan {
            if request.dry_run {
                log::info!("[dry-run] would revert {}", entry.name);
                summary.units.push(entry.name);
                continue;
            }

            let sql = unit.statements(Direction::Down)?;
            if sql.is_none() {
                log::warn!(
                    "{} has no down section; only removing it from the ledger",
                    entry.name
                );
            }
            log::info!("Reverting {}", entry.name);
            with_transaction(conn, request.use_transactions, |conn| {
                if let Some(sql) = &sql {
                    conn.execute_batch(sql)?;
                }
                forget(conn, table, entry.id)
            })
            .map_err(|e| unit_failed(&entry.name, Direction::Down, e))?;
            summary.units.push(entry.name);
        }
        Ok(summary)
    }

    fn static_seeds_sync(
        &self,
        conn: &Connection,
        units: &[MigrationUnit],
        request: &RunRequest,
    ) -> DbResult<RunSummary> {
        let selected = select_units(units, |_| true, &request.bound)?;

        let mut summary = RunSummary::new(Direction::Up, request.dry_run);
        for unit in selected {
            if request.dry_run {
                log::info!("[dry-run] would seed {}", unit.name);
                summary.units.push(unit.name.clone());
                continue;
            }

            log::info!("Seeding {}", unit.name);
            let result = match unit.format {
                UnitFormat::Csv => load_csv(conn, unit),
                UnitFormat::Sql | UnitFormat::Yaml => {
                    let sql = unit.statements(Direction::Up)?;
                    with_transaction(conn, request.use_transactions, |conn| {
                        if let Some(sql) = &sql {
                            conn.execute_batch(sql)?;
                        }
                        Ok(())
                    })
                }
            };
            result.map_err(|e| unit_failed(&unit.name, Direction::Up, e))?;
            summary.units.push(unit.name.clone());
        }
        Ok(summary)
    }
}

#[async_trait]
impl Closeable for DuckDbExecutor {
    async fn close(&mut self) -> DbResult<()> {
        let conn = self.conn.take().ok_or(DbError::ConnectionClosed)?;
        let conn = conn
            .into_inner()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        conn.close()
            .map_err(|(_, e)| DbError::ConnectionError(format!("close failed: {}", e)))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl Executor for DuckDbExecutor {
    async fn create_ledger_table(&self) -> DbResult<()> {
        self.with_conn(|conn| ensure_ledger(conn, &self.options.ledger_table))
    }

    async fn run_forward(&self, request: &RunRequest) -> DbResult<RunSummary> {
        let units = discover_units(&self.options.units_dir)?;
        self.with_conn(|conn| self.forward_sync(conn, &units, request))
    }

    async fn run_backward(&self, request: &RunRequest) -> DbResult<RunSummary> {
        let units = discover_units(&self.options.units_dir)?;
        self.with_conn(|conn| self.backward_sync(conn, &units, request))
    }

    async fn run_seeds(&self, source: SeedSource, request: &RunRequest) -> DbResult<RunSummary> {
        match source {
            SeedSource::VersionControlled => {
                let units = discover_units(&self.options.units_dir)?;
                self.with_conn(|conn| self.forward_sync(conn, &units, request))
            }
            SeedSource::Static => {
                let units = discover_seed_units(&self.options.units_dir)?;
                self.with_conn(|conn| self.static_seeds_sync(conn, &units, request))
            }
        }
    }
}

/// DuckDB database administration.
///
/// A DuckDB database is a file; databases are created next to the configured
/// database file (or in the working directory for in-memory settings).
pub struct DuckDbDriver {
    base_dir: PathBuf,
    open: bool,
}

impl DuckDbDriver {
    pub fn new(settings: &ConnectionSettings) -> Self {
        let path = database_path(settings);
        let base_dir = if path == MEMORY {
            PathBuf::from(".")
        } else {
            Path::new(&path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        Self {
            base_dir,
            open: true,
        }
    }

    /// Driver rooted at an explicit directory
    pub fn in_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            open: true,
        }
    }

    /// File backing database `name`
    pub fn database_file(&self, name: &str) -> DbResult<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(DbError::ExecutionError(format!(
                "invalid database name '{}'",
                name
            )));
        }
        Ok(self.base_dir.join(duckdb_file_name(name)))
    }

    fn ensure_open(&self) -> DbResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(DbError::ConnectionClosed)
        }
    }
}

#[async_trait]
impl Closeable for DuckDbDriver {
    async fn close(&mut self) -> DbResult<()> {
        self.ensure_open()?;
        self.open = false;
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl Driver for DuckDbDriver {
    async fn create_database(&self, name: &str, options: CreateDatabaseOptions) -> DbResult<()> {
        self.ensure_open()?;
        let file = self.database_file(name)?;
        if file.exists() {
            if options.if_not_exists {
                log::info!("Database {} already exists", file.display());
                return Ok(());
            }
            return Err(DbError::DatabaseExists(name.to_string()));
        }

        let path = file.display().to_string();
        let conn = open_connection(&path)?;
        conn.close()
            .map_err(|(_, e)| DbError::ConnectionError(format!("close failed: {}", e)))?;
        log::info!("Created database {}", path);
        Ok(())
    }

    async fn drop_database(&self, name: &str, options: DropDatabaseOptions) -> DbResult<()> {
        self.ensure_open()?;
        let file = self.database_file(name)?;
        if !file.exists() {
            if options.if_exists {
                log::info!("Database {} does not exist", file.display());
                return Ok(());
            }
            return Err(DbError::DatabaseMissing(name.to_string()));
        }

        std::fs::remove_file(&file).map_err(|e| DbError::Io {
            path: file.display().to_string(),
            source: e,
        })?;
        let wal = PathBuf::from(format!("{}.wal", file.display()));
        if wal.exists() {
            let _ = std::fs::remove_file(&wal);
        }
        log::info!("Dropped database {}", file.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
