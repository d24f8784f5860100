//! Recording fakes for the executor, driver, and connector traits

use async_trait::async_trait;
use sl_core::{ConnectionSettings, Direction, RunRequest, SeedSource};
use sl_db::{
    Closeable, Connector, CreateDatabaseOptions, DbError, DbResult, Driver, DropDatabaseOptions,
    Executor, ExecutorOptions, RunSummary,
};
use std::sync::{Arc, Mutex};

/// Shared call log
#[derive(Debug, Clone, Default)]
pub(crate) struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub(crate) fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub(crate) fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.all().iter().filter(|c| c.as_str() == call).count()
    }
}

/// Which fake step should fail
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Failures {
    pub(crate) connect: bool,
    pub(crate) ledger: bool,
    pub(crate) run: bool,
    pub(crate) close: bool,
}

pub(crate) struct FakeHandle {
    pub(crate) calls: Calls,
    pub(crate) failures: Failures,
    pub(crate) options: Option<ExecutorOptions>,
}

impl FakeHandle {
    fn outcome(&self, call: String, direction: Direction, request: &RunRequest) -> DbResult<RunSummary> {
        self.calls.push(call);
        if self.failures.run {
            return Err(DbError::ExecutionError("run failed".to_string()));
        }
        let mut summary = RunSummary::new(direction, request.dry_run);
        summary.units.push(request.ledger_name("001-fake"));
        Ok(summary)
    }
}

#[async_trait]
impl Closeable for FakeHandle {
    async fn close(&mut self) -> DbResult<()> {
        self.calls.push("close");
        if self.failures.close {
            return Err(DbError::ConnectionError("close failed".to_string()));
        }
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "fake"
    }
}

#[async_trait]
impl Executor for FakeHandle {
    async fn create_ledger_table(&self) -> DbResult<()> {
        let table = self
            .options
            .as_ref()
            .map(|o| o.ledger_table.to_string())
            .unwrap_or_default();
        self.calls.push(format!("ledger {}", table));
        if self.failures.ledger {
            return Err(DbError::LedgerError {
                table,
                message: "ledger failed".to_string(),
            });
        }
        Ok(())
    }

    async fn run_forward(&self, request: &RunRequest) -> DbResult<RunSummary> {
        self.outcome(format!("forward {}", request.bound), Direction::Up, request)
    }

    async fn run_backward(&self, request: &RunRequest) -> DbResult<RunSummary> {
        self.outcome(format!("backward {}", request.bound), Direction::Down, request)
    }

    async fn run_seeds(&self, source: SeedSource, request: &RunRequest) -> DbResult<RunSummary> {
        self.outcome(format!("seeds {}", source), Direction::Up, request)
    }
}

#[async_trait]
impl Driver for FakeHandle {
    async fn create_database(&self, name: &str, options: CreateDatabaseOptions) -> DbResult<()> {
        self.calls
            .push(format!("create_database {} if_not_exists={}", name, options.if_not_exists));
        Ok(())
    }

    async fn drop_database(&self, name: &str, options: DropDatabaseOptions) -> DbResult<()> {
        self.calls
            .push(format!("drop_database {} if_exists={}", name, options.if_exists));
        Ok(())
    }
}

/// Connector handing out [`FakeHandle`]s that share one call log
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeConnector {
    pub(crate) calls: Calls,
    pub(crate) failures: Failures,
}

impl FakeConnector {
    pub(crate) fn failing(failures: Failures) -> Self {
        Self {
            calls: Calls::default(),
            failures,
        }
    }

    pub(crate) fn handle(&self, options: Option<ExecutorOptions>) -> FakeHandle {
        FakeHandle {
            calls: self.calls.clone(),
            failures: self.failures,
            options,
        }
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect_executor(
        &self,
        _settings: &ConnectionSettings,
        options: ExecutorOptions,
    ) -> DbResult<Box<dyn Executor>> {
        let suffix = if options.dry_run { " (dry run)" } else { "" };
        self.calls.push(format!(
            "connect_executor {}{}",
            options.units_dir.display(),
            suffix
        ));
        if self.failures.connect {
            return Err(DbError::ConnectionError("connect failed".to_string()));
        }
        Ok(Box::new(self.handle(Some(options))))
    }

    async fn connect_driver(&self, _settings: &ConnectionSettings) -> DbResult<Box<dyn Driver>> {
        self.calls.push("connect_driver");
        if self.failures.connect {
            return Err(DbError::ConnectionError("connect failed".to_string()));
        }
        Ok(Box::new(self.handle(None)))
    }
}
