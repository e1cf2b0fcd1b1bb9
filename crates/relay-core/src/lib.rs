//! relay-core
//!
//! Transactional outbox relay: claims pending rows from the outbox table,
//! forwards each to a FIFO queue with a deduplication token and an ordering
//! group, and writes the outcome back.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（record, ids, status, outcome, envelope, errors）
//! - **ports**: 抽象化レイヤー（OutboxStore, MessageBus, Clock, ExecutionBudget, IdGenerator）
//! - **app**: アプリケーションロジック（builder, dispatcher, cycle_runner, host_loop, status）
//! - **impls**: 実装（InMemory*、PostgreSQL、SQS）
//! - **config**: 環境変数からの設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{HostReport, PollingHost, RelayBuilder};
pub use config::{ConfigError, RelayConfig};
