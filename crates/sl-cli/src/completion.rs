//! Completion protocol: close once, then surface the outcome

use anyhow::{Context, Result};
use sl_db::Closeable;

/// Marker logged after a fully successful invocation
pub(crate) const DONE_MARKER: &str = "Done";

/// Close `handle` and report the combined result.
///
/// A run error always wins; a close failure alongside it is only logged.
/// A close failure after a successful run is surfaced. On full success the
/// completion marker is logged.
pub(crate) async fn complete<H, T>(mut handle: Box<H>, outcome: Result<T>) -> Result<T>
where
    H: Closeable + ?Sized,
{
    let backend = handle.db_type();
    let closed = handle.close().await;
    drop(handle);

    match (outcome, closed) {
        (Ok(value), Ok(())) => {
            log::info!("{}", DONE_MARKER);
            Ok(value)
        }
        (Ok(_), Err(close_err)) => {
            Err(close_err).with_context(|| format!("Failed to close {} connection", backend))
        }
        (Err(run_err), Ok(())) => Err(run_err),
        (Err(run_err), Err(close_err)) => {
            log::warn!(
                "Failed to close {} connection after error: {}",
                backend,
                close_err
            );
            Err(run_err)
        }
    }
}

#[cfg(test)]
#[path = "completion_test.rs"]
mod tests;
