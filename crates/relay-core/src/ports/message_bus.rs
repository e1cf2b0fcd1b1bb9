//! MessageBus port - 順序保証・重複排除つきのキュー
//!
//! # 前提とするセマンティクス
//! - `ordering_group` が同じメッセージは enqueue 順に配送される
//! - 同じ `dedup_token` の再 enqueue は 1 通に畳み込まれる
//!
//! 実装は重い（コネクションプールを持つ）ので、プロセス起動時に 1 回だけ
//! 構築し `Arc<dyn MessageBus>` で共有します。

use async_trait::async_trait;

use crate::domain::{BusError, QueueMessage};

#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn enqueue(&self, message: &QueueMessage) -> Result<(), BusError>;
}
