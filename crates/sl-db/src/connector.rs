//! Backend selection from connection settings

use crate::duckdb::{database_path, DuckDbDriver, DuckDbExecutor};
use crate::error::DbResult;
use crate::postgres;
use crate::traits::{Connector, Driver, Executor, ExecutorOptions};
use async_trait::async_trait;
use sl_core::{ConnectionSettings, DbType};

/// Connector dispatching on [`ConnectionSettings::driver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConnector;

#[async_trait]
impl Connector for DefaultConnector {
    async fn connect_executor(
        &self,
        settings: &ConnectionSettings,
        options: ExecutorOptions,
    ) -> DbResult<Box<dyn Executor>> {
        match settings.driver {
            DbType::DuckDb => {
                let path = database_path(settings);
                Ok(Box::new(DuckDbExecutor::open(&path, options)?))
            }
            DbType::Postgres => postgres::connect_executor(settings),
        }
    }

    async fn connect_driver(&self, settings: &ConnectionSettings) -> DbResult<Box<dyn Driver>> {
        match settings.driver {
            DbType::DuckDb => Ok(Box::new(DuckDbDriver::new(settings))),
            DbType::Postgres => postgres::connect_driver(settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use sl_core::TableName;
    use std::path::PathBuf;

    fn options() -> ExecutorOptions {
        ExecutorOptions {
            units_dir: PathBuf::from("migrations"),
            ledger_table: TableName::try_new("migrations").unwrap(),
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn test_duckdb_executor_in_memory() {
        let mut exec = DefaultConnector
            .connect_executor(&ConnectionSettings::in_memory(), options())
            .await
            .unwrap();
        assert_eq!(exec.db_type(), "duckdb");
        exec.create_ledger_table().await.unwrap();
        exec.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_postgres_not_implemented() {
        let settings = ConnectionSettings::from_url("postgres://app@localhost:5432/app").unwrap();
        let err = DefaultConnector
            .connect_executor(&settings, options())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DbError::NotImplemented { .. }));
        let err = DefaultConnector.connect_driver(&settings).await.err().unwrap();
        assert!(matches!(err, DbError::NotImplemented { .. }));
    }
}
