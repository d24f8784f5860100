//! The directive model: one validated execution request.
//!
//! A [`Directive`] is built once per invocation through [`DirectiveBuilder`],
//! which resolves count/destination precedence and rejects incomplete input
//! up front. After `build()` the directive is never mutated.

use crate::error::{CoreError, CoreResult};
use crate::names::ScopeName;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The action a directive asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Apply pending migrations forward
    Apply,
    /// Revert applied migrations (count-bounded)
    Revert,
    /// Revert every applied migration
    Reset,
    /// Scaffold a new migration
    Create,
    /// Run seeders
    Seed,
    /// Create a database
    DatabaseCreate,
    /// Drop a database
    DatabaseDrop,
}

impl Action {
    /// Whether this action runs migration units against a ledger.
    pub fn is_migration_run(&self) -> bool {
        matches!(self, Action::Apply | Action::Revert | Action::Reset)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Apply => "up",
            Action::Revert => "down",
            Action::Reset => "reset",
            Action::Create => "create",
            Action::Seed => "seed",
            Action::DatabaseCreate => "db:create",
            Action::DatabaseDrop => "db:drop",
        };
        f.write_str(s)
    }
}

/// Number of migration units a run may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Count {
    /// At most this many units
    Limited(u32),
    /// No limit
    All,
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Limited(n) => write!(f, "{}", n),
            Count::All => write!(f, "all"),
        }
    }
}

/// Where a run stops, as handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunBound {
    /// Execute at most `n` units
    Count(u32),
    /// Execute every eligible unit
    All,
    /// Execute pending units up to and including the named one (forward only)
    To(String),
}

impl RunBound {
    /// Whether `executed` units already exhaust the bound.
    ///
    /// `To` bounds are resolved by the executor against unit names, so they
    /// never exhaust by count.
    pub fn is_exhausted(&self, executed: usize) -> bool {
        match self {
            RunBound::Count(n) => executed >= *n as usize,
            RunBound::All | RunBound::To(_) => false,
        }
    }
}

impl From<Count> for RunBound {
    fn from(count: Count) -> Self {
        match count {
            Count::Limited(n) => RunBound::Count(n),
            Count::All => RunBound::All,
        }
    }
}

impl fmt::Display for RunBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunBound::Count(n) => write!(f, "count {}", n),
            RunBound::All => write!(f, "all"),
            RunBound::To(name) => write!(f, "up to {}", name),
        }
    }
}

/// Which seed directory a seed run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    /// Version-controlled seeds, recorded in the seeds table
    #[default]
    VersionControlled,
    /// Static seeds, re-applied on every run
    Static,
}

impl FromStr for SeedSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vc" => Ok(SeedSource::VersionControlled),
            "static" => Ok(SeedSource::Static),
            other => Err(format!(
                "unknown seed mode '{}' (expected 'vc' or 'static')",
                other
            )),
        }
    }
}

impl fmt::Display for SeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedSource::VersionControlled => write!(f, "vc"),
            SeedSource::Static => write!(f, "static"),
        }
    }
}

/// A validated, immutable execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    action: Action,
    scope: Option<ScopeName>,
    mode: Option<String>,
    destination: Option<String>,
    count: Option<Count>,
    name: Option<String>,
    dry_run: bool,
    use_transactions: bool,
    #[serde(skip)]
    warnings: Vec<String>,
}

impl Directive {
    /// Start building a directive for `action`.
    pub fn builder(action: Action) -> DirectiveBuilder {
        DirectiveBuilder {
            action,
            scope: None,
            mode: None,
            destination: None,
            count: None,
            name: None,
            dry_run: false,
            use_transactions: true,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn scope(&self) -> Option<&ScopeName> {
        self.scope.as_ref()
    }

    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    /// Destination migration; only ever set for [`Action::Apply`].
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Effective count after defaults (`None` for actions that are not
    /// migration runs, and for Apply runs bounded by a destination).
    pub fn count(&self) -> Option<Count> {
        self.count
    }

    /// Migration name for Create, database name for database admin.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn use_transactions(&self) -> bool {
        self.use_transactions
    }

    /// Notes about input that was accepted but ignored.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The bound handed to the executor for a migration or seed run.
    pub fn bound(&self) -> RunBound {
        if let Some(dest) = &self.destination {
            return RunBound::To(dest.clone());
        }
        self.count.map(RunBound::from).unwrap_or(RunBound::All)
    }

    /// Seed source selected by `mode` (version-controlled unless `static`).
    pub fn seed_source(&self) -> SeedSource {
        self.mode
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default()
    }

    /// Build the request forwarded to the executor.
    pub fn run_request(&self) -> RunRequest {
        RunRequest {
            bound: self.bound(),
            scope: self.scope.clone(),
            mode: self.mode.clone(),
            dry_run: self.dry_run,
            use_transactions: self.use_transactions,
        }
    }
}

/// Builder for [`Directive`]; `build()` is the single validation point.
#[derive(Debug, Clone)]
pub struct DirectiveBuilder {
    action: Action,
    scope: Option<String>,
    mode: Option<String>,
    destination: Option<String>,
    count: Option<u32>,
    name: Option<String>,
    dry_run: bool,
    use_transactions: bool,
}

impl DirectiveBuilder {
    pub fn scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn mode(mut self, mode: Option<String>) -> Self {
        self.mode = mode;
        self
    }

    pub fn destination(mut self, destination: Option<String>) -> Self {
        self.destination = destination;
        self
    }

    pub fn count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn use_transactions(mut self, use_transactions: bool) -> Self {
        self.use_transactions = use_transactions;
        self
    }

    /// Validate the collected fields and produce a [`Directive`].
    pub fn build(self) -> CoreResult<Directive> {
        let mut warnings = Vec::new();

        let scope = non_empty(self.scope)
            .map(ScopeName::try_new)
            .transpose()
            .map_err(|message| CoreError::InvalidDirective { message })?;
        let mode = non_empty(self.mode);
        let mut destination = non_empty(self.destination);
        let name = non_empty(self.name);

        let count = match self.action {
            Action::Apply => match (&destination, self.count) {
                (Some(dest), Some(n)) => {
                    warnings.push(format!(
                        "both destination '{}' and --count {} given; destination takes precedence",
                        dest, n
                    ));
                    None
                }
                (Some(_), None) => None,
                (None, Some(n)) => Some(Count::Limited(n)),
                (None, None) => Some(Count::All),
            },
            Action::Revert | Action::Reset => {
                if destination.take().is_some() {
                    warnings.push("destination is not honored for revert; use count".to_string());
                }
                if self.action == Action::Reset {
                    if let Some(n) = self.count {
                        warnings.push(format!(
                            "reset always reverts every migration; ignoring --count {}",
                            n
                        ));
                    }
                    Some(Count::All)
                } else {
                    Some(Count::Limited(self.count.unwrap_or(1)))
                }
            }
            Action::Seed => {
                if let Some(m) = &mode {
                    m.parse::<SeedSource>()
                        .map_err(|message| CoreError::InvalidDirective { message })?;
                }
                destination = None;
                self.count.map(Count::Limited)
            }
            Action::Create | Action::DatabaseCreate | Action::DatabaseDrop => {
                if name.is_none() {
                    let what = if self.action == Action::Create {
                        "a migration name"
                    } else {
                        "a database name"
                    };
                    return Err(CoreError::InvalidDirective {
                        message: format!("'{}' requires {}", self.action, what),
                    });
                }
                destination = None;
                None
            }
        };

        Ok(Directive {
            action: self.action,
            scope,
            mode,
            destination,
            count,
            name,
            dry_run: self.dry_run,
            use_transactions: self.use_transactions,
            warnings,
        })
    }
}

/// Request forwarded to an executor for a forward, backward, or seed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    /// How far the run goes
    pub bound: RunBound,
    /// Scope filter; ledger entries are matched by `scope/` prefix
    pub scope: Option<ScopeName>,
    /// Secondary qualifier passed through untouched
    pub mode: Option<String>,
    /// Report without executing or recording
    pub dry_run: bool,
    /// Wrap each unit in its own transaction
    pub use_transactions: bool,
}

impl RunRequest {
    /// Ledger name for a unit under this request's scope.
    pub fn ledger_name(&self, unit: &str) -> String {
        match &self.scope {
            Some(scope) => format!("{}/{}", scope, unit),
            None => unit.to_string(),
        }
    }

    /// Whether a ledger entry belongs to this request's scope.
    ///
    /// Unscoped requests only see unscoped entries.
    pub fn owns_ledger_entry(&self, entry: &str) -> bool {
        match &self.scope {
            Some(scope) => entry
                .strip_prefix(scope.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|rest| !rest.contains('/')),
            None => !entry.contains('/'),
        }
    }

    /// Strip the scope prefix from a ledger entry.
    pub fn unit_name<'a>(&self, entry: &'a str) -> &'a str {
        entry.rsplit('/').next().unwrap_or(entry)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "directive_test.rs"]
mod tests;
