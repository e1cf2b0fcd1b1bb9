//! App - アプリケーション層
//!
//! ports を組み合わせて relay のロジックを実装します。
//!
//! # 主要コンポーネント
//! - **RelayBuilder**: ワイヤリングと起動時検証
//! - **DispatchEngine**: 1 レコード → 1 enqueue
//! - **CycleRunner**: claim → dispatch → acknowledge を 1 回
//! - **PollingHost**: サイクルの繰り返しと実行予算の管理

pub mod builder;
pub mod cycle_runner;
pub mod dispatcher;
pub mod host_loop;
pub mod status;

pub use self::builder::{BuildError, RelayBuilder};
pub use self::cycle_runner::CycleRunner;
pub use self::dispatcher::DispatchEngine;
pub use self::host_loop::PollingHost;
pub use self::status::{CycleReport, HostReport, StopReason};
