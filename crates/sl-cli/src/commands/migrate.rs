//! Apply, revert, and reset

use anyhow::{Context, Result};
use sl_core::{paths, Action, ConfigSource, Directive, Overrides};
use sl_db::{Connector, Executor, ExecutorOptions, RunSummary};

use crate::commands::common::{print_summary, resolve_config};
use crate::context::ExecutionContext;

/// Run migrations forward (`up`) or backward (`down`, `reset`)
pub(crate) async fn execute(
    directive: &Directive,
    source: &ConfigSource,
    overrides: &Overrides,
    connector: &dyn Connector,
) -> Result<()> {
    let config = resolve_config(source, overrides)?;
    let dir = paths::migrations_dir(&config.layout, directive.scope());
    let options = ExecutorOptions {
        units_dir: dir.clone(),
        ledger_table: config.layout.migration_table.clone(),
        dry_run: directive.dry_run(),
    };

    let handle = connector
        .connect_executor(&config.connection, options)
        .await
        .context("Failed to connect to database")?;
    let ctx = ExecutionContext::new(directive, &config, Some(dir), handle);
    let outcome = run(&ctx).await;
    ctx.finish(outcome).await.map(|_| ())
}

async fn run(ctx: &ExecutionContext<'_, dyn Executor>) -> Result<RunSummary> {
    let executor = ctx.handle();
    let directive = ctx.directive();
    let table = &ctx.config().layout.migration_table;

    if !directive.dry_run() {
        executor
            .create_ledger_table()
            .await
            .with_context(|| format!("Failed to create ledger table '{}'", table))?;
    }

    let request = directive.run_request();
    log::info!(
        "Running '{}' ({}) from {}",
        directive.action(),
        request.bound,
        ctx.dir().map(|d| d.display().to_string()).unwrap_or_default()
    );

    let summary = if directive.action() == Action::Apply {
        executor
            .run_forward(&request)
            .await
            .context("Failed to apply migrations")?
    } else {
        executor
            .run_backward(&request)
            .await
            .context("Failed to revert migrations")?
    };
    print_summary(&summary, "migration");
    Ok(summary)
}
