//! Builds a production `PollingHost`: PostgreSQL outbox + SQS FIFO queue.

use std::sync::Arc;

use relay_core::app::BuildError;
use relay_core::domain::StoreError;
use relay_core::impls::postgres_store::InvalidTableName;
use relay_core::impls::{PostgresOutboxStore, SqsMessageBus, TableName};
use relay_core::{ConfigError, PollingHost, RelayBuilder, RelayConfig};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] InvalidTableName),

    #[error("could not set up database pool: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// プロセスごとに 1 回呼ぶ。返した host（と SQS クライアント）は毎回の起動で使い回す
pub async fn build_host(config: &RelayConfig) -> Result<PollingHost, WiringError> {
    let table = TableName::parse(&config.table)?;
    let database_url = config.require_database_url()?;
    let queue_url = config.require_queue_url()?;

    let store = PostgresOutboxStore::connect_lazy(database_url, config.db_max_connections, table)?;
    let bus = SqsMessageBus::from_env().await;
    info!(
        queue_url,
        table = %config.table,
        batch_size = config.batch_size,
        "relay wired"
    );

    Ok(RelayBuilder::new(config.clone())
        .store(Arc::new(store))
        .bus(Arc::new(bus))
        .build()?)
}
