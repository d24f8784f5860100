//! Strongly-typed names used across Sluice.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Named partition of the migrations (or seeds) directory.
    ///
    /// A scope is a single directory name: it may not contain path
    /// separators and may not be `.` or `..`.
    pub struct ScopeName;
    check = check_scope;
}

define_newtype_string! {
    /// Name of a configured environment (e.g. `dev`, `test`, `prod`).
    pub struct EnvName;
    check = check_env;
}

define_newtype_string! {
    /// SQL identifier used for the ledger and seeds tables.
    ///
    /// Optionally schema-qualified (`schema.table`). Each part must start with
    /// a letter or underscore and contain only ASCII alphanumerics and
    /// underscores, since the name is interpolated into DDL.
    pub struct TableName;
    check = check_table;
}

fn check_scope(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("must not be empty".to_string());
    }
    if s == "." || s == ".." {
        return Err("must not be a relative directory marker".to_string());
    }
    if s.contains('/') || s.contains('\\') {
        return Err("must be a single directory name".to_string());
    }
    Ok(())
}

fn check_env(s: &str) -> Result<(), String> {
    if s.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(())
}

fn check_table(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("must not be empty".to_string());
    }
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() > 2 {
        return Err("at most one schema qualifier is allowed".to_string());
    }
    for part in parts {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err("identifiers must start with a letter or underscore".to_string()),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err("identifiers may only contain letters, digits and underscores".to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "names_test.rs"]
mod tests;
