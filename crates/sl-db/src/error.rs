//! Error types for sl-db

use sl_core::CoreError;
use thiserror::Error;

/// Executor and driver errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Ledger table could not be created or read (D003)
    #[error("[D003] Ledger table '{table}' failed: {message}")]
    LedgerError { table: String, message: String },

    /// A migration unit failed and was rolled back when possible (D004)
    #[error("[D004] Migration '{name}' ({direction}) failed: {message}")]
    MigrationFailed {
        name: String,
        direction: String,
        message: String,
    },

    /// Destination does not name a known unit (D005)
    #[error("[D005] Destination '{0}' does not match any migration")]
    DestinationNotFound(String),

    /// Ledger references a unit that is no longer on disk (D006)
    #[error("[D006] Applied migration '{name}' has no file in {dir}")]
    MissingUnit { name: String, dir: String },

    /// Not implemented (D007)
    #[error("[D007] Feature not implemented for {backend}: {feature}")]
    NotImplemented { backend: String, feature: String },

    /// Mutex poisoned (D008)
    #[error("[D008] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Database already exists (D009)
    #[error("[D009] Database '{0}' already exists")]
    DatabaseExists(String),

    /// Database does not exist (D010)
    #[error("[D010] Database '{0}' does not exist")]
    DatabaseMissing(String),

    /// CSV loading error (D011)
    #[error("[D011] CSV load failed: {0}")]
    CsvError(String),

    /// Operation on a handle whose connection was already closed (D012)
    #[error("[D012] Connection is closed")]
    ConnectionClosed,

    /// Unit discovery or parsing failed (D013)
    #[error("[D013] {0}")]
    Core(#[from] CoreError),

    /// Filesystem error (D014)
    #[error("[D014] Failed to access '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
