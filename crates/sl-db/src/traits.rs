//! Executor, driver, and connector traits

use crate::error::DbResult;
use async_trait::async_trait;
use sl_core::{ConnectionSettings, Direction, RunRequest, SeedSource, TableName};
use std::path::PathBuf;

/// Anything holding a live backend connection.
///
/// `close` is called exactly once, by whoever owns the handle, after the
/// last operation.
#[async_trait]
pub trait Closeable: Send {
    /// Release the connection
    async fn close(&mut self) -> DbResult<()>;

    /// Backend identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Applies and reverts migration units, tracking them in a ledger table.
#[async_trait]
pub trait Executor: Closeable + Sync {
    /// Create the ledger table if it does not exist
    async fn create_ledger_table(&self) -> DbResult<()>;

    /// Apply pending units in name order, bounded by the request
    async fn run_forward(&self, request: &RunRequest) -> DbResult<RunSummary>;

    /// Revert the most recently applied units, bounded by the request
    async fn run_backward(&self, request: &RunRequest) -> DbResult<RunSummary>;

    /// Apply seed units from the executor's directory
    async fn run_seeds(&self, source: SeedSource, request: &RunRequest) -> DbResult<RunSummary>;
}

/// Database administration without a ledger.
#[async_trait]
pub trait Driver: Closeable + Sync {
    /// Create a database
    async fn create_database(&self, name: &str, options: CreateDatabaseOptions) -> DbResult<()>;

    /// Drop a database
    async fn drop_database(&self, name: &str, options: DropDatabaseOptions) -> DbResult<()>;
}

/// Opens connected executors and drivers for a set of connection settings.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect an executor bound to a unit directory and ledger table
    async fn connect_executor(
        &self,
        settings: &ConnectionSettings,
        options: ExecutorOptions,
    ) -> DbResult<Box<dyn Executor>>;

    /// Connect a driver for database administration
    async fn connect_driver(&self, settings: &ConnectionSettings) -> DbResult<Box<dyn Driver>>;
}

/// What an executor operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Effective (scoped) directory holding the units
    pub units_dir: PathBuf,
    /// Ledger table recording applied units
    pub ledger_table: TableName,
    /// Plan only: the backend must not be created or written
    pub dry_run: bool,
}

/// Options for [`Driver::create_database`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateDatabaseOptions {
    /// Creating an existing database succeeds
    pub if_not_exists: bool,
}

/// Options for [`Driver::drop_database`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropDatabaseOptions {
    /// Dropping a missing database succeeds
    pub if_exists: bool,
}

/// Outcome of a run: the units executed (or planned, for dry runs), in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub direction: Direction,
    pub units: Vec<String>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn new(direction: Direction, dry_run: bool) -> Self {
        Self {
            direction,
            units: Vec::new(),
            dry_run,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
