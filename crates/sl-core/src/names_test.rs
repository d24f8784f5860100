use super::*;

#[test]
fn test_scope_name_accepts_plain_directory() {
    let scope = ScopeName::try_new("billing").unwrap();
    assert_eq!(scope, "billing");
    assert_eq!(scope.as_str(), "billing");
}

#[test]
fn test_scope_name_rejects_paths() {
    assert!(ScopeName::try_new("").is_err());
    assert!(ScopeName::try_new("..").is_err());
    assert!(ScopeName::try_new("a/b").is_err());
    assert!(ScopeName::try_new("a\\b").is_err());
}

#[test]
fn test_table_name_validation() {
    assert!(TableName::try_new("migrations").is_ok());
    assert!(TableName::try_new("_seeds_v2").is_ok());
    assert!(TableName::try_new("ops.migrations").is_ok());

    assert!(TableName::try_new("").is_err());
    assert!(TableName::try_new("1table").is_err());
    assert!(TableName::try_new("bad-name").is_err());
    assert!(TableName::try_new("a.b.c").is_err());
    assert!(TableName::try_new("x; DROP TABLE y").is_err());
}

#[test]
fn test_table_name_error_mentions_value() {
    let err = TableName::try_new("bad-name").unwrap_err();
    assert!(err.contains("bad-name"), "got: {err}");
    assert!(err.contains("TableName"), "got: {err}");
}

#[test]
fn test_env_name_deserialize_rejects_blank() {
    let ok: EnvName = serde_yaml::from_str("prod").unwrap();
    assert_eq!(ok, "prod");
    let err = serde_yaml::from_str::<EnvName>("'  '");
    assert!(err.is_err());
}
