use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_split_sections() {
    let sql = "\
-- leading comment is ignored
-- sluice:up
CREATE TABLE users (id INTEGER);
-- sluice:down
DROP TABLE users;
";
    assert_eq!(
        split_sections(sql, Direction::Up).unwrap().trim(),
        "CREATE TABLE users (id INTEGER);"
    );
    assert_eq!(
        split_sections(sql, Direction::Down).unwrap().trim(),
        "DROP TABLE users;"
    );
}

#[test]
fn test_split_sections_without_markers_is_all_up() {
    let sql = "INSERT INTO t VALUES (1);";
    assert_eq!(split_sections(sql, Direction::Up).as_deref(), Some(sql));
    assert_eq!(split_sections(sql, Direction::Down), None);
}

#[test]
fn test_empty_down_section_is_none() {
    let sql = "-- sluice:up\nSELECT 1;\n-- sluice:down\n\n   \n";
    assert_eq!(split_sections(sql, Direction::Down), None);
}

#[test]
fn test_markers_are_case_insensitive() {
    let sql = "  -- SLUICE:UP  \nSELECT 1;\n";
    assert_eq!(split_sections(sql, Direction::Up).unwrap().trim(), "SELECT 1;");
}

#[test]
fn test_discover_orders_by_name_and_skips_subdirs() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("20240103000000-c.sql"), "SELECT 3;").unwrap();
    fs::write(dir.join("20240101000000-a.sql"), "SELECT 1;").unwrap();
    fs::write(dir.join("20240102000000-b.yml"), "up: [SELECT 2]").unwrap();
    fs::write(dir.join("README.md"), "ignored").unwrap();
    fs::write(dir.join("data.csv"), "id\n1\n").unwrap();
    fs::create_dir_all(dir.join("billing")).unwrap();
    fs::write(dir.join("billing/20240104000000-d.sql"), "SELECT 4;").unwrap();

    let units = discover_units(dir).unwrap();
    let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["20240101000000-a", "20240102000000-b", "20240103000000-c"]
    );
    assert_eq!(units[1].format, UnitFormat::Yaml);
}

#[test]
fn test_discover_seed_units_includes_csv() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("countries.csv"), "code\nNL\n").unwrap();
    fs::write(tmp.path().join("admins.sql"), "INSERT INTO admins VALUES (1);").unwrap();
    let units = discover_seed_units(tmp.path()).unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].name, "admins");
    assert_eq!(units[1].format, UnitFormat::Csv);
}

#[test]
fn test_discover_missing_dir_is_empty() {
    let tmp = tempdir().unwrap();
    assert!(discover_units(&tmp.path().join("nope")).unwrap().is_empty());
}

#[test]
fn test_discover_rejects_duplicate_stems() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("20240101000000-a.sql"), "SELECT 1;").unwrap();
    fs::write(tmp.path().join("20240101000000-a.yml"), "up: SELECT 1").unwrap();
    let err = discover_units(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("defined twice"));
}

#[test]
fn test_yaml_statement_list() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("20240101000000-a.yml");
    fs::write(
        &path,
        "up:\n  - CREATE TABLE a (id INTEGER)\n  - INSERT INTO a VALUES (1);\ndown: DROP TABLE a\n",
    )
    .unwrap();
    let unit = &discover_units(tmp.path()).unwrap()[0];
    assert_eq!(
        unit.statements(Direction::Up).unwrap().unwrap(),
        "CREATE TABLE a (id INTEGER);\nINSERT INTO a VALUES (1);"
    );
    assert_eq!(
        unit.statements(Direction::Down).unwrap().unwrap(),
        "DROP TABLE a"
    );
}

#[test]
fn test_yaml_file_loader() {
    let tmp = tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("sqls")).unwrap();
    fs::write(
        tmp.path().join("sqls/20240101000000-a-up.sql"),
        "CREATE TABLE a (id INTEGER);",
    )
    .unwrap();
    fs::write(
        tmp.path().join("20240101000000-a.yml"),
        "up:\n  file: sqls/20240101000000-a-up.sql\n",
    )
    .unwrap();
    let unit = &discover_units(tmp.path()).unwrap()[0];
    assert_eq!(
        unit.statements(Direction::Up).unwrap().unwrap(),
        "CREATE TABLE a (id INTEGER);"
    );
    assert_eq!(unit.statements(Direction::Down).unwrap(), None);
}

#[test]
fn test_yaml_parse_error_names_unit() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("20240101000000-a.yml"), "sideways: 1\n").unwrap();
    let unit = &discover_units(tmp.path()).unwrap()[0];
    let err = unit.statements(Direction::Up).unwrap_err();
    assert!(err.to_string().contains("20240101000000-a"));
}

#[test]
fn test_unit_matching() {
    let unit = MigrationUnit {
        name: "20240101000000-add-users".to_string(),
        path: PathBuf::from("migrations/20240101000000-add-users.sql"),
        format: UnitFormat::Sql,
    };
    assert!(unit.matches("20240101000000-add-users"));
    assert!(unit.matches("20240101000000-add-users.sql"));
    assert!(unit.matches("20240101000000"));
    assert!(!unit.matches("add-users"));
    assert!(!unit.matches("20240101"));
}
