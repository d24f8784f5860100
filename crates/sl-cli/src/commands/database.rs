//! Database create and drop

use anyhow::{Context, Result};
use sl_core::{Action, ConfigSource, Directive, Overrides};
use sl_db::{Connector, CreateDatabaseOptions, Driver, DropDatabaseOptions};

use crate::commands::common::resolve_config;
use crate::context::ExecutionContext;

/// Execute `db:create` or `db:drop`.
///
/// Both are idempotent: creating an existing database or dropping a missing
/// one succeeds.
pub(crate) async fn execute(
    directive: &Directive,
    source: &ConfigSource,
    overrides: &Overrides,
    connector: &dyn Connector,
) -> Result<()> {
    let name = directive
        .name()
        .with_context(|| format!("'{}' requires a database name", directive.action()))?;
    let config = resolve_config(source, overrides)?;

    let handle = connector
        .connect_driver(&config.connection)
        .await
        .context("Failed to connect to database server")?;
    let ctx = ExecutionContext::new(directive, &config, None, handle);
    let outcome = run(&ctx, name).await;
    ctx.finish(outcome).await
}

async fn run(ctx: &ExecutionContext<'_, dyn Driver>, name: &str) -> Result<()> {
    let driver = ctx.handle();
    let action = ctx.directive().action();

    if ctx.directive().dry_run() {
        log::info!("[dry-run] would run '{}' for database '{}'", action, name);
        return Ok(());
    }

    if action == Action::DatabaseDrop {
        driver
            .drop_database(name, DropDatabaseOptions { if_exists: true })
            .await
            .with_context(|| format!("Failed to drop database '{}'", name))?;
        println!("Dropped database {}", name);
    } else {
        driver
            .create_database(name, CreateDatabaseOptions { if_not_exists: true })
            .await
            .with_context(|| format!("Failed to create database '{}'", name))?;
        println!("Created database {}", name);
    }
    Ok(())
}
