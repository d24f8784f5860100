//! sl-core - Core library for Sluice
//!
//! This crate provides the directive model and action-token grammar,
//! configuration resolution, directory resolution, migration unit
//! discovery, and migration scaffolding shared by the Sluice crates.

pub mod config;
pub mod directive;
pub mod error;
pub mod migration;
pub mod names;
mod newtype_string;
pub mod paths;
pub mod scaffold;
pub mod token;

pub use config::{
    Config, ConfigSource, ConnectionSettings, DbType, Layout, Overrides, ResolvedConfiguration,
    Secret,
};
pub use directive::{Action, Count, Directive, DirectiveBuilder, RunBound, RunRequest, SeedSource};
pub use error::{CoreError, CoreResult};
pub use migration::{discover_seed_units, discover_units, Direction, MigrationUnit, UnitFormat};
pub use names::{EnvName, ScopeName, TableName};
pub use scaffold::{scaffold, MigrationName, TemplateKind};
pub use token::ActionToken;
