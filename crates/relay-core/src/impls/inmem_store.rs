//! InMemoryOutboxStore - 開発・テスト用の outbox
//!
//! # 実装詳細
//! - `BTreeMap<RecordId, OutboxRow>` を tokio の Mutex で保護
//! - claim は 1 回のロック取得の中で「選択 + Claimed へのマーク」を行う
//!   （PostgreSQL 実装の `FOR UPDATE SKIP LOCKED` に相当）
//! - 障害注入（open / claim / 特定 ID の update の失敗）をサポート

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::{DeliveryStatus, OutboundRecord, RecordId, StoreError};
use crate::ports::{OutboxStore, StoreSession};

/// OutboxRow はレコードと配送状態をまとめた 1 行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxRow {
    pub record: OutboundRecord,
    pub status: DeliveryStatus,
    pub last_error: Option<String>,
}

/// status ごとの行数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub claimed: usize,
    pub dispatched: usize,
    pub failed: usize,
}

#[derive(Default)]
struct InMemoryStoreState {
    rows: BTreeMap<RecordId, OutboxRow>,
    fail_open: bool,
    fail_claim: bool,
    failing_updates: HashSet<RecordId>,
}

impl InMemoryStoreState {
    fn claim(&mut self, limit: usize) -> Vec<OutboundRecord> {
        let mut pending: Vec<&mut OutboxRow> = self
            .rows
            .values_mut()
            .filter(|row| row.status.is_claimable())
            .collect();
        pending.sort_by_key(|row| (row.record.created_at, row.record.id));

        pending
            .into_iter()
            .take(limit)
            .map(|row| {
                row.status = DeliveryStatus::Claimed;
                row.record.clone()
            })
            .collect()
    }

    fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for row in self.rows.values() {
            match row.status {
                DeliveryStatus::Pending => counts.pending += 1,
                DeliveryStatus::Claimed => counts.claimed += 1,
                DeliveryStatus::Dispatched => counts.dispatched += 1,
                DeliveryStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }
}

/// インメモリの outbox テーブル
#[derive(Clone, Default)]
pub struct InMemoryOutboxStore {
    state: Arc<Mutex<InMemoryStoreState>>,
    open_sessions: Arc<AtomicUsize>,
}

impl InMemoryOutboxStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending で挿入する。同じ id の行は置き換える
    pub async fn insert(&self, record: OutboundRecord) {
        self.insert_with_status(record, DeliveryStatus::Pending).await;
    }

    pub async fn insert_with_status(&self, record: OutboundRecord, status: DeliveryStatus) {
        let mut state = self.state.lock().await;
        state.rows.insert(
            record.id,
            OutboxRow {
                record,
                status,
                last_error: None,
            },
        );
    }

    pub async fn row(&self, id: RecordId) -> Option<OutboxRow> {
        self.state.lock().await.rows.get(&id).cloned()
    }

    pub async fn counts(&self) -> StatusCounts {
        self.state.lock().await.counts()
    }

    /// 以降の `open()` を失敗させる
    pub async fn fail_open(&self, fail: bool) {
        self.state.lock().await.fail_open = fail;
    }

    /// 以降の `claim()` を失敗させる
    pub async fn fail_claims(&self, fail: bool) {
        self.state.lock().await.fail_claim = fail;
    }

    /// `id` の status 書き込みを失敗させる
    pub async fn fail_updates_for(&self, id: RecordId) {
        self.state.lock().await.failing_updates.insert(id);
    }

    /// 開いている（drop されていない）セッション数
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OutboxStore for InMemoryOutboxStore {
    async fn open(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        if self.state.lock().await.fail_open {
            return Err(StoreError::Connection("store unreachable".into()));
        }
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemorySession {
            state: Arc::clone(&self.state),
            open_sessions: Arc::clone(&self.open_sessions),
        }))
    }
}

struct InMemorySession {
    state: Arc<Mutex<InMemoryStoreState>>,
    open_sessions: Arc<AtomicUsize>,
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreSession for InMemorySession {
    async fn claim(&mut self, limit: usize) -> Result<Vec<OutboundRecord>, StoreError> {
        let mut state = self.state.lock().await;
        if state.fail_claim {
            return Err(StoreError::Query("claim query failed".into()));
        }
        Ok(state.claim(limit))
    }

    async fn update_status(
        &mut self,
        id: RecordId,
        status: DeliveryStatus,
        error: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.failing_updates.contains(&id) {
            return Err(StoreError::Connection(format!("update of {id} lost")));
        }
        // Unknown ids are a no-op, like an UPDATE matching zero rows.
        if let Some(row) = state.rows.get_mut(&id) {
            row.status = status;
            row.last_error = error.map(str::to_string);
        }
        Ok(())
    }
}
