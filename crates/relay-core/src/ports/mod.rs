//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（outbox を持つ DB、FIFO キュー、ホスト環境）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - DB が source of truth（正本）。claim の原子性はここで保証する
//! - バスは group/dedup のセマンティクスだけを前提にする
//! - 時刻と実行予算は trait で差し替え可能（テストでは FixedClock）

pub mod budget;
pub mod clock;
pub mod id_generator;
pub mod message_bus;
pub mod outbox_store;

pub use self::budget::{DeadlineBudget, ExecutionBudget, Unbounded};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::message_bus::MessageBus;
pub use self::outbox_store::{OutboxStore, StoreSession};
