//! Error types for sl-core

use thiserror::Error;

/// Core error type for Sluice
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Action token does not name a known action
    #[error("[E001] Invalid action '{token}': {reason}")]
    InvalidAction { token: String, reason: String },

    /// E002: Configuration file not found
    #[error("[E002] Config file not found: {path}. Create it or set DATABASE_URL")]
    ConfigNotFound { path: String },

    /// E003: Failed to parse configuration file
    #[error("[E003] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E004: Requested environment is not defined
    #[error("[E004] Environment '{name}' not found. Available environments: {available}")]
    EnvironmentNotFound { name: String, available: String },

    /// E005: Connection string could not be parsed
    #[error("[E005] Malformed connection string: {reason}")]
    MalformedConnectionString { reason: String },

    /// E006: Scaffold directory could not be created
    #[error("[E006] Failed to create directory '{path}': {source}")]
    DirectoryCreation {
        path: String,
        source: std::io::Error,
    },

    /// E007: Directive fields are missing or contradictory
    #[error("[E007] Invalid directive: {message}")]
    InvalidDirective { message: String },

    /// E008: Invalid migration name for scaffolding
    #[error("[E008] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// E009: Scaffold target already exists
    #[error("[E009] Refusing to overwrite existing file: {path}")]
    ScaffoldFileExists { path: String },

    /// E010: Migration unit could not be parsed
    #[error("[E010] Failed to parse migration unit '{name}': {message}")]
    UnitParseError { name: String, message: String },

    /// E011: Invalid configuration value
    #[error("[E011] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E012: Template rendering failed
    #[error("[E012] Template render error: {0}")]
    Template(String),

    /// E013: IO error with file path context
    #[error("[E013] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E014: YAML parse error
    #[error("[E014] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<minijinja::Error> for CoreError {
    fn from(err: minijinja::Error) -> Self {
        CoreError::Template(err.to_string())
    }
}

impl CoreError {
    /// Whether the error comes from the command grammar and should be
    /// accompanied by usage help.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidAction { .. } | CoreError::InvalidDirective { .. }
        )
    }
}
