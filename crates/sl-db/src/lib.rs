//! sl-db - Database layer for Sluice
//!
//! This crate provides the `Executor`, `Driver` and `Connector` traits
//! and their DuckDB implementations (plus a PostgreSQL stub for future
//! implementation).

pub mod connector;
pub mod duckdb;
pub mod error;
pub(crate) mod postgres;
pub mod traits;

pub use connector::DefaultConnector;
pub use duckdb::{DuckDbDriver, DuckDbExecutor};
pub use error::{DbError, DbResult};
pub use traits::{
    Closeable, Connector, CreateDatabaseOptions, Driver, DropDatabaseOptions, Executor,
    ExecutorOptions, RunSummary,
};
