//! Create command implementation

use anyhow::{Context, Result};
use chrono::Utc;
use sl_core::{paths, scaffold, ConfigSource, Directive, MigrationName, Overrides, TemplateKind};

use crate::completion::DONE_MARKER;

/// Template for a new migration: `--yaml-file` wins, then the sql-file
/// loader (flag or `sql_file` in the config file), then a plain script.
fn template_kind(sql_file: bool, yaml_file: bool) -> TemplateKind {
    if yaml_file {
        TemplateKind::Yaml
    } else if sql_file {
        TemplateKind::SqlFileLoader
    } else {
        TemplateKind::Sql
    }
}

/// Scaffold a new migration. Needs no backend connection.
pub(crate) fn execute(
    directive: &Directive,
    source: &ConfigSource,
    overrides: &Overrides,
    yaml_file: bool,
) -> Result<()> {
    let raw_name = directive
        .name()
        .context("'create' requires a migration name")?;
    let name = MigrationName::parse(raw_name)?;
    let layout = source
        .layout(overrides)
        .context("Failed to resolve configuration")?;

    let base = paths::migrations_dir(&layout, directive.scope());
    let kind = template_kind(layout.sql_file, yaml_file);
    log::debug!("Scaffolding {:?} migration under {}", kind, base.display());

    let files = scaffold(&base, &name, kind, Utc::now())
        .with_context(|| format!("Failed to create migration '{}'", raw_name))?;
    for file in &files {
        println!("  Created {}", file.display());
    }
    log::info!("{}", DONE_MARKER);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_kind_precedence() {
        assert_eq!(template_kind(false, false), TemplateKind::Sql);
        assert_eq!(template_kind(true, false), TemplateKind::SqlFileLoader);
        assert_eq!(template_kind(true, true), TemplateKind::Yaml);
    }
}
