//! PostgreSQL backend stub

use crate::error::{DbError, DbResult};
use crate::traits::{Driver, Executor};
use sl_core::ConnectionSettings;

fn not_implemented(feature: &str) -> DbError {
    DbError::NotImplemented {
        backend: "postgres".to_string(),
        feature: feature.to_string(),
    }
}

/// Connect a migration executor (not yet implemented)
///
/// Postgres settings are fully resolved and validated, but no wire client is
/// linked yet, so connecting always fails.
pub(crate) fn connect_executor(settings: &ConnectionSettings) -> DbResult<Box<dyn Executor>> {
    log::debug!(
        "postgres executor requested for {}",
        settings.host.as_deref().unwrap_or("<no host>")
    );
    Err(not_implemented("migration executor"))
}

/// Connect a database driver (not yet implemented)
pub(crate) fn connect_driver(settings: &ConnectionSettings) -> DbResult<Box<dyn Driver>> {
    log::debug!(
        "postgres driver requested for {}",
        settings.host.as_deref().unwrap_or("<no host>")
    );
    Err(not_implemented("database administration"))
}
