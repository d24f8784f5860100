//! Migration unit discovery and parsing.
//!
//! A unit is a single file directly inside a migrations (or seeds)
//! directory. Supported formats:
//!
//! - `.sql` with `-- sluice:up` / `-- sluice:down` section markers. A file
//!   with no markers at all is treated as one up section (plain seed files).
//! - `.yml` / `.yaml` manifests whose `up`/`down` entries are either a list
//!   of statements or `{ file: <relative path> }`.
//! - `.csv` (seed directories only), loaded into a table named after the stem.
//!
//! Subdirectories are never scanned: they hold scopes and `sqls/` companions.

use crate::error::{CoreError, CoreResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Marker opening the forward section of a `.sql` unit.
pub const UP_MARKER: &str = "-- sluice:up";

/// Marker opening the reverse section of a `.sql` unit.
pub const DOWN_MARKER: &str = "-- sluice:down";

/// Which half of a unit to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// On-disk format of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFormat {
    Sql,
    Yaml,
    Csv,
}

impl UnitFormat {
    fn from_path(path: &Path, allow_csv: bool) -> Option<Self> {
        match path.extension()?.to_str()? {
            "sql" => Some(UnitFormat::Sql),
            "yml" | "yaml" => Some(UnitFormat::Yaml),
            "csv" if allow_csv => Some(UnitFormat::Csv),
            _ => None,
        }
    }
}

/// A discovered migration or seed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationUnit {
    /// File stem, e.g. `20240101120000-add-users`
    pub name: String,
    /// Path to the unit file
    pub path: PathBuf,
    pub format: UnitFormat,
}

impl MigrationUnit {
    /// Whether `target` names this unit: the full name, the file name, or
    /// the timestamp prefix.
    pub fn matches(&self, target: &str) -> bool {
        if self.name == target {
            return true;
        }
        if self.path.file_name().and_then(|f| f.to_str()) == Some(target) {
            return true;
        }
        self.name
            .split_once('-')
            .is_some_and(|(timestamp, _)| timestamp == target)
    }

    /// SQL to execute for `direction`, or `None` when the unit has no such
    /// section.
    pub fn statements(&self, direction: Direction) -> CoreResult<Option<String>> {
        match self.format {
            UnitFormat::Sql => {
                let content = read(&self.path)?;
                Ok(split_sections(&content, direction))
            }
            UnitFormat::Yaml => {
                let content = read(&self.path)?;
                let manifest: UnitManifest =
                    serde_yaml::from_str(&content).map_err(|e| CoreError::UnitParseError {
                        name: self.name.clone(),
                        message: e.to_string(),
                    })?;
                let step = match direction {
                    Direction::Up => manifest.up,
                    Direction::Down => manifest.down,
                };
                match step {
                    Some(step) => step.into_sql(&self.path),
                    None => Ok(None),
                }
            }
            UnitFormat::Csv => Err(CoreError::UnitParseError {
                name: self.name.clone(),
                message: "CSV seeds carry data, not SQL".to_string(),
            }),
        }
    }
}

/// YAML unit manifest.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnitManifest {
    #[serde(default)]
    up: Option<Step>,
    #[serde(default)]
    down: Option<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Step {
    File { file: String },
    Statements(Vec<String>),
    Single(String),
}

impl Step {
    fn into_sql(self, unit_path: &Path) -> CoreResult<Option<String>> {
        let sql = match self {
            Step::File { file } => {
                let base = unit_path.parent().unwrap_or_else(|| Path::new("."));
                read(&base.join(file))?
            }
            Step::Statements(stmts) => stmts
                .iter()
                .map(|s| s.trim().trim_end_matches(';').to_string())
                .filter(|s| !s.is_empty())
                .map(|s| format!("{};", s))
                .collect::<Vec<_>>()
                .join("\n"),
            Step::Single(sql) => sql,
        };
        Ok(non_blank(sql))
    }
}

/// Discover migration units (`.sql`, `.yml`, `.yaml`) in `dir`, ordered by name.
///
/// A missing directory yields no units.
pub fn discover_units(dir: &Path) -> CoreResult<Vec<MigrationUnit>> {
    discover(dir, false)
}

/// Discover seed units, which may also be `.csv` files.
pub fn discover_seed_units(dir: &Path) -> CoreResult<Vec<MigrationUnit>> {
    discover(dir, true)
}

fn discover(dir: &Path, allow_csv: bool) -> CoreResult<Vec<MigrationUnit>> {
    if !dir.is_dir() {
        log::debug!("Unit directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut units = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(format) = UnitFormat::from_path(&path, allow_csv) else {
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(previous) = seen.insert(stem.to_string(), path.clone()) {
            return Err(CoreError::UnitParseError {
                name: stem.to_string(),
                message: format!(
                    "defined twice ({} and {})",
                    previous.display(),
                    path.display()
                ),
            });
        }
        units.push(MigrationUnit {
            name: stem.to_string(),
            path,
            format,
        });
    }

    units.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(units)
}

/// Extract one section of a marker-delimited SQL file.
pub fn split_sections(content: &str, direction: Direction) -> Option<String> {
    let has_markers = content.lines().any(|l| marker_of(l).is_some());
    if !has_markers {
        return match direction {
            Direction::Up => non_blank(content.to_string()),
            Direction::Down => None,
        };
    }

    let mut current: Option<Direction> = None;
    let mut section = String::new();
    for line in content.lines() {
        if let Some(marker) = marker_of(line) {
            current = Some(marker);
            continue;
        }
        if current == Some(direction) {
            section.push_str(line);
            section.push('\n');
        }
    }
    non_blank(section)
}

fn marker_of(line: &str) -> Option<Direction> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case(UP_MARKER) {
        Some(Direction::Up)
    } else if trimmed.eq_ignore_ascii_case(DOWN_MARKER) {
        Some(Direction::Down)
    } else {
        None
    }
}

fn non_blank(sql: String) -> Option<String> {
    if sql.trim().is_empty() {
        None
    } else {
        Some(sql)
    }
}

fn read(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
