use super::*;
use crate::names::TableName;
use std::fs;
use tempfile::tempdir;

fn layout() -> Layout {
    Layout {
        migrations_dir: PathBuf::from("migrations"),
        vcseeder_dir: PathBuf::from("vcseeds"),
        staticseeder_dir: PathBuf::from("seeds"),
        migration_table: TableName::try_new("migrations").unwrap(),
        seeds_table: TableName::try_new("seeds").unwrap(),
        sql_file: false,
    }
}

#[test]
fn test_unscoped_dirs() {
    let layout = layout();
    assert_eq!(migrations_dir(&layout, None), PathBuf::from("migrations"));
    assert_eq!(
        seeds_dir(&layout, SeedSource::VersionControlled, None),
        PathBuf::from("vcseeds")
    );
}

#[test]
fn test_static_seed_dir() {
    assert_eq!(
        seeds_dir(&layout(), SeedSource::Static, None),
        PathBuf::from("seeds")
    );
}

#[test]
fn test_scope_appends_subfolder() {
    let scope = ScopeName::try_new("billing").unwrap();
    assert_eq!(
        migrations_dir(&layout(), Some(&scope)),
        PathBuf::from("migrations/billing")
    );
    assert_eq!(
        seeds_dir(&layout(), SeedSource::Static, Some(&scope)),
        PathBuf::from("seeds/billing")
    );
}

#[test]
fn test_ensure_dir_creates_recursively() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("a/b/c");
    ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
    // Second call on an existing directory is fine
    ensure_dir(&dir).unwrap();
}

#[test]
fn test_ensure_dir_fails_when_blocked_by_file() {
    let tmp = tempdir().unwrap();
    let blocker = tmp.path().join("taken");
    fs::write(&blocker, "not a directory").unwrap();
    let err = ensure_dir(&blocker.join("child")).unwrap_err();
    assert!(matches!(err, CoreError::DirectoryCreation { .. }));
}
