//! OutboxStore port - outbox テーブルへのゲートウェイ
//!
//! 1 サイクルにつき `open()` で 1 セッション（1 コネクション）を取得し、
//! サイクル終了時に drop で解放します。

use async_trait::async_trait;

use crate::domain::{DeliveryStatus, OutboundRecord, RecordId, StoreError};

/// OutboxStore はサイクルごとのセッションを開く
#[async_trait]
pub trait OutboxStore: Send + Sync {
    async fn open(&self) -> Result<Box<dyn StoreSession>, StoreError>;
}

/// StoreSession はコネクション 1 本分の store。drop でコネクションを返す
#[async_trait]
pub trait StoreSession: Send {
    /// Pending の行を最大 `limit` 件（`created_at` 昇順、同時刻は id 順）選び、
    /// 同じ操作で Claimed にする
    ///
    /// 並行する呼び出しが同じ行を受け取ることはない。0 件はエラーではない。
    async fn claim(&mut self, limit: usize) -> Result<Vec<OutboundRecord>, StoreError>;

    /// 1 行の status（と任意のエラー文字列）を書く。冪等
    async fn update_status(
        &mut self,
        id: RecordId,
        status: DeliveryStatus,
        error: Option<&str>,
    ) -> Result<(), StoreError>;
}
