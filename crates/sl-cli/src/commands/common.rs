//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sl_core::{ConfigSource, Direction, Overrides, ResolvedConfiguration};
use sl_db::RunSummary;

/// Resolve the configuration for a command that talks to a backend.
///
/// Connection settings are logged with secrets masked; the full JSON form
/// only at debug level.
pub(crate) fn resolve_config(
    source: &ConfigSource,
    overrides: &Overrides,
) -> Result<ResolvedConfiguration> {
    let config = source
        .resolve(overrides)
        .context("Failed to resolve configuration")?;
    log::info!(
        "Environment '{}' using {}",
        config.environment,
        config.connection
    );
    log::debug!(
        "Connection settings: {}",
        config
            .connection
            .masked_json()
            .context("Failed to render connection settings")?
    );
    Ok(config)
}

/// Print one line per unit followed by a summary line
pub(crate) fn print_summary(summary: &RunSummary, noun: &str) {
    if summary.is_empty() {
        println!("No pending {}s", noun);
        return;
    }

    for unit in &summary.units {
        if summary.dry_run {
            println!("  · {} (dry run)", unit);
        } else {
            println!("  ✓ {}", unit);
        }
    }

    let verb = match (summary.dry_run, summary.direction) {
        (true, _) => "Would run",
        (false, Direction::Up) => "Applied",
        (false, Direction::Down) => "Reverted",
    };
    println!("{} {} {}(s)", verb, summary.units.len(), noun);
}
