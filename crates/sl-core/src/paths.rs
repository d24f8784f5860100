//! Effective directory resolution for migrations and seeds.

use crate::config::Layout;
use crate::directive::SeedSource;
use crate::error::{CoreError, CoreResult};
use crate::names::ScopeName;
use std::path::{Path, PathBuf};

/// Apply an optional scope subfolder to a base directory.
pub fn scoped(base: &Path, scope: Option<&ScopeName>) -> PathBuf {
    match scope {
        Some(scope) => base.join(scope.as_str()),
        None => base.to_path_buf(),
    }
}

/// Effective migrations directory. Existence is not checked; the executor
/// reports a missing or empty directory itself.
pub fn migrations_dir(layout: &Layout, scope: Option<&ScopeName>) -> PathBuf {
    scoped(&layout.migrations_dir, scope)
}

/// Effective seeds directory for the given source.
pub fn seeds_dir(layout: &Layout, source: SeedSource, scope: Option<&ScopeName>) -> PathBuf {
    let base = match source {
        SeedSource::VersionControlled => &layout.vcseeder_dir,
        SeedSource::Static => &layout.staticseeder_dir,
    };
    scoped(base, scope)
}

/// Make sure `dir` exists, creating it and any parents when absent.
///
/// A directory that already exists is not an error.
pub fn ensure_dir(dir: &Path) -> CoreResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    log::debug!("Creating directory {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|e| CoreError::DirectoryCreation {
        path: dir.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "paths_test.rs"]
mod tests;
