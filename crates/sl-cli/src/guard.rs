//! Top-level failure boundary for one invocation

use anyhow::Result;
use clap::CommandFactory;
use futures::FutureExt;
use sl_core::token::KNOWN_ACTIONS;
use sl_core::CoreError;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use crate::cli::Cli;

/// Process exit status for any handled failure
pub(crate) const FAILURE: i32 = 1;

/// Drive `fut` to completion and map its outcome to an exit status.
///
/// Errors and panics are logged; usage errors also print the usage line.
pub(crate) async fn run<F>(fut: F) -> i32
where
    F: Future<Output = Result<()>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => 0,
        Ok(Err(err)) => {
            report(&err);
            FAILURE
        }
        Err(panic) => {
            log::error!("Unexpected failure: {}", panic_message(panic.as_ref()));
            FAILURE
        }
    }
}

fn report(err: &anyhow::Error) {
    log::error!("{:#}", err);
    if is_usage_error(err) {
        eprintln!("{}", Cli::command().render_usage());
        eprintln!("Actions: {}", KNOWN_ACTIONS.join(", "));
    }
}

/// Whether the error came from an unparsable action or directive
pub(crate) fn is_usage_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<CoreError>())
        .any(CoreError::is_usage_error)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
