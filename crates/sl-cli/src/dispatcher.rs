//! Action dispatch: token and positionals to a directive, directive to a handler

use anyhow::{Context, Result};
use sl_core::{Action, ActionToken, ConfigSource, CoreResult, Directive};
use sl_db::Connector;
use std::path::Path;

use crate::cli::{Cli, GlobalArgs};
use crate::commands::{create, database, migrate, seed};

/// Build the directive for an action token, its positionals, and the flags.
///
/// Warnings about accepted-but-ignored input are logged here.
pub(crate) fn build_directive(
    action: &str,
    args: &[String],
    global: &GlobalArgs,
) -> CoreResult<Directive> {
    let token = ActionToken::parse(action)?;
    let positional = args.first().cloned();
    if args.len() > 1 {
        log::warn!("Ignoring extra arguments: {}", args[1..].join(" "));
    }

    let builder = Directive::builder(token.action)
        .scope(token.scope)
        .count(global.count)
        .dry_run(global.dry_run)
        .use_transactions(!global.no_transactions);

    let builder = match token.action {
        action if action.is_migration_run() => builder.mode(token.mode).destination(positional),
        Action::Seed => {
            if let (Some(mode), Some(arg)) = (&token.mode, &positional) {
                log::warn!("Seed source '{}' from the action token wins over '{}'", mode, arg);
            }
            builder.mode(token.mode.or(positional))
        }
        _ => builder.mode(token.mode).name(positional),
    };

    let directive = builder.build()?;
    for warning in directive.warnings() {
        log::warn!("{}", warning);
    }
    Ok(directive)
}

/// Entry point for one invocation
pub(crate) async fn dispatch(cli: &Cli, connector: &dyn Connector) -> Result<()> {
    let directive = build_directive(&cli.action, &cli.args, &cli.global)?;
    log::debug!("Directive: {:?}", directive);

    let source = ConfigSource::from_env(Path::new(&cli.global.config))
        .with_context(|| format!("Failed to load configuration from {}", cli.global.config))?;
    route(&directive, &cli.global, &source, connector).await
}

/// Hand a directive to the handler for its action
pub(crate) async fn route(
    directive: &Directive,
    global: &GlobalArgs,
    source: &ConfigSource,
    connector: &dyn Connector,
) -> Result<()> {
    let overrides = global.overrides();
    match directive.action() {
        Action::Apply | Action::Revert | Action::Reset => {
            migrate::execute(directive, source, &overrides, connector).await
        }
        Action::Create => create::execute(directive, source, &overrides, global.yaml_file),
        Action::Seed => seed::execute(directive, source, &overrides, connector).await,
        Action::DatabaseCreate | Action::DatabaseDrop => {
            database::execute(directive, source, &overrides, connector).await
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
