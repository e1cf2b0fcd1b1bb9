//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryOutboxStore** / **InMemoryMessageBus**: 開発・テスト用
//! - **PostgresOutboxStore**: 本番用の outbox（feature `postgres`）
//! - **SqsMessageBus**: 本番用の FIFO キュー（feature `sqs`）

pub mod inmem_bus;
pub mod inmem_store;
#[cfg(feature = "postgres")]
pub mod postgres_store;
#[cfg(feature = "sqs")]
pub mod sqs_bus;

pub use self::inmem_bus::InMemoryMessageBus;
pub use self::inmem_store::{InMemoryOutboxStore, OutboxRow, StatusCounts};
#[cfg(feature = "postgres")]
pub use self::postgres_store::{PostgresOutboxStore, TableName};
#[cfg(feature = "sqs")]
pub use self::sqs_bus::SqsMessageBus;
