//! Seed command implementation

use anyhow::{Context, Result};
use sl_core::{paths, ConfigSource, Directive, Overrides, SeedSource};
use sl_db::{Connector, Executor, ExecutorOptions, RunSummary};

use crate::commands::common::{print_summary, resolve_config};
use crate::context::ExecutionContext;

/// Execute the seed command
pub(crate) async fn execute(
    directive: &Directive,
    source: &ConfigSource,
    overrides: &Overrides,
    connector: &dyn Connector,
) -> Result<()> {
    let config = resolve_config(source, overrides)?;
    let seed_source = directive.seed_source();
    let dir = paths::seeds_dir(&config.layout, seed_source, directive.scope());
    let options = ExecutorOptions {
        units_dir: dir.clone(),
        ledger_table: config.layout.seeds_table.clone(),
        dry_run: directive.dry_run(),
    };

    let handle = connector
        .connect_executor(&config.connection, options)
        .await
        .context("Failed to connect to database")?;
    let ctx = ExecutionContext::new(directive, &config, Some(dir), handle);
    let outcome = run(&ctx, seed_source).await;
    ctx.finish(outcome).await.map(|_| ())
}

async fn run(ctx: &ExecutionContext<'_, dyn Executor>, source: SeedSource) -> Result<RunSummary> {
    let executor = ctx.handle();

    // Static seeds are re-run every time and never recorded
    if source == SeedSource::VersionControlled && !ctx.directive().dry_run() {
        let table = &ctx.config().layout.seeds_table;
        executor
            .create_ledger_table()
            .await
            .with_context(|| format!("Failed to create seeds table '{}'", table))?;
    }

    log::info!(
        "Seeding from {} ({})",
        ctx.dir().map(|d| d.display().to_string()).unwrap_or_default(),
        source
    );
    let summary = executor
        .run_seeds(source, &ctx.directive().run_request())
        .await
        .with_context(|| format!("Failed to run {} seeds", source))?;
    print_summary(&summary, "seed");
    Ok(summary)
}
