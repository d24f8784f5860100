//! CLI argument definitions using clap derive API

use clap::{Args, Parser};
use sl_core::Overrides;

/// Sluice - directive-driven database migrations and seeds
#[derive(Parser, Debug)]
#[command(name = "sluice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Action token: up, down, reset, create, seed, db:create or db:drop,
    /// optionally qualified as `action:mode:scope`
    pub action: String,

    /// Destination (up), migration name (create), database name (db:*),
    /// or seed source (seed)
    pub args: Vec<String>,

    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by every action
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Environment to run against (falls back to SLUICE_ENV, then default_env, then dev)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Migrations directory
    #[arg(short, long)]
    pub migrations_dir: Option<String>,

    /// Number of migrations to apply or revert
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Report what would run without executing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Exit the process immediately after a successful run
    #[arg(long)]
    pub force_exit: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(long, default_value = sl_core::config::DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Scaffold migrations as a YAML loader with separate up/down SQL files
    #[arg(long, conflicts_with = "yaml_file")]
    pub sql_file: bool,

    /// Scaffold migrations as a YAML statement list
    #[arg(long)]
    pub yaml_file: bool,

    /// Ledger table for migrations
    #[arg(short, long)]
    pub table: Option<String>,

    /// Ledger table for version-controlled seeds
    #[arg(long)]
    pub seeds_table: Option<String>,

    /// Directory of version-controlled seeds
    #[arg(long)]
    pub vcseeder_dir: Option<String>,

    /// Directory of static seeds
    #[arg(long)]
    pub staticseeder_dir: Option<String>,

    /// Do not wrap each unit in its own transaction
    #[arg(long)]
    pub no_transactions: bool,
}

impl GlobalArgs {
    /// Flag values layered over the configuration file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            env: self.env.clone(),
            migrations_dir: self.migrations_dir.clone(),
            vcseeder_dir: self.vcseeder_dir.clone(),
            staticseeder_dir: self.staticseeder_dir.clone(),
            migration_table: self.table.clone(),
            seeds_table: self.seeds_table.clone(),
            sql_file: self.sql_file,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
