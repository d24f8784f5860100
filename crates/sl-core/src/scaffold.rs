//! Migration scaffolding: name parsing, template selection, file creation.

use crate::error::{CoreError, CoreResult};
use crate::paths::ensure_dir;
use chrono::{DateTime, Utc};
use minijinja::{context, Environment};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp prefix format shared by every scaffolded artifact.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Subdirectory holding the companion files of the SQL-file loader variant.
pub const SQLS_DIR: &str = "sqls";

const SQL_TEMPLATE: &str = "\
-- Migration: {{ title }}
-- Created: {{ created }}

-- sluice:up


-- sluice:down

";

const LOADER_TEMPLATE: &str = "\
# Migration: {{ title }}
# Created: {{ created }}
up:
  file: {{ sqls_dir }}/{{ stem }}-up.sql
down:
  file: {{ sqls_dir }}/{{ stem }}-down.sql
";

const COMPANION_TEMPLATE: &str = "\
/* {{ title }} ({{ direction }}): replace with your SQL commands */
";

const YAML_TEMPLATE: &str = "\
# Migration: {{ title }}
# Created: {{ created }}
up: []
down: []
";

/// Which template a new migration is written from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateKind {
    /// One `.sql` file with up/down markers
    #[default]
    Sql,
    /// A `.yml` loader plus `sqls/<stem>-up.sql` and `sqls/<stem>-down.sql`
    SqlFileLoader,
    /// One `.yml` file listing up/down statements
    Yaml,
}

/// A requested migration name split into its title and parent directories.
///
/// `group/add-users` has title `add-users` and lives under `group/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationName {
    pub title: String,
    pub subdirs: Vec<String>,
}

impl MigrationName {
    /// Parse a (possibly nested) migration name.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidMigrationName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("name is empty"));
        }
        if trimmed.starts_with('/') || trimmed.starts_with('\\') {
            return Err(invalid("name must be relative"));
        }

        let mut segments: Vec<String> = Vec::new();
        for segment in trimmed.split(['/', '\\']) {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(invalid("name contains an empty path segment"));
            }
            if segment == "." || segment == ".." {
                return Err(invalid("name may not contain '.' or '..' segments"));
            }
            segments.push(segment.split_whitespace().collect::<Vec<_>>().join("-"));
        }

        let title = segments.pop().ok_or_else(|| invalid("name is empty"))?;
        Ok(Self {
            title,
            subdirs: segments,
        })
    }

    /// Directory (relative to the migrations dir) the files go into.
    pub fn relative_dir(&self) -> PathBuf {
        self.subdirs.iter().collect()
    }
}

/// Write the files for a new migration and return their paths, loader or
/// script first.
///
/// The target directory is created when missing. Existing files are never
/// overwritten.
pub fn scaffold(
    base_dir: &Path,
    name: &MigrationName,
    kind: TemplateKind,
    now: DateTime<Utc>,
) -> CoreResult<Vec<PathBuf>> {
    let dir = base_dir.join(name.relative_dir());
    ensure_dir(&dir)?;

    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let stem = format!("{}-{}", timestamp, name.title);
    let created = now.to_rfc3339();

    let mut env = Environment::new();
    env.add_template("sql", SQL_TEMPLATE)?;
    env.add_template("loader", LOADER_TEMPLATE)?;
    env.add_template("companion", COMPANION_TEMPLATE)?;
    env.add_template("yaml", YAML_TEMPLATE)?;

    let render = |template: &str, direction: &str| -> CoreResult<String> {
        let tmpl = env.get_template(template)?;
        Ok(tmpl.render(context! {
            title => name.title,
            stem => stem,
            created => created,
            sqls_dir => SQLS_DIR,
            direction => direction,
        })?)
    };

    let mut written = Vec::new();
    match kind {
        TemplateKind::Sql => {
            let path = dir.join(format!("{}.sql", stem));
            write_new(&path, &render("sql", "")?)?;
            written.push(path);
        }
        TemplateKind::Yaml => {
            let path = dir.join(format!("{}.yml", stem));
            write_new(&path, &render("yaml", "")?)?;
            written.push(path);
        }
        TemplateKind::SqlFileLoader => {
            let sqls = dir.join(SQLS_DIR);
            ensure_dir(&sqls)?;

            let loader = dir.join(format!("{}.yml", stem));
            write_new(&loader, &render("loader", "")?)?;
            written.push(loader);

            for direction in ["up", "down"] {
                let path = sqls.join(format!("{}-{}.sql", stem, direction));
                write_new(&path, &render("companion", direction)?)?;
                written.push(path);
            }
        }
    }

    Ok(written)
}

fn write_new(path: &Path, content: &str) -> CoreResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => CoreError::ScaffoldFileExists {
                path: path.display().to_string(),
            },
            _ => CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            },
        })?;
    file.write_all(content.as_bytes())
        .map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
