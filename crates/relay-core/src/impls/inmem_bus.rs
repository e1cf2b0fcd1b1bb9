//! InMemoryMessageBus - 開発・テスト用の FIFO キュー
//!
//! # 実装詳細
//! - destination → ordering group → `VecDeque<QueueMessage>` の二段 HashMap
//! - destination ごとに dedup token の集合を保持し、重複 enqueue は成功扱いで捨てる
//! - 障害注入: 指定した dedup token の enqueue を失敗させる

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{BusError, DedupToken, QueueMessage};
use crate::ports::MessageBus;

#[derive(Default)]
struct InMemoryBusState {
    queues: HashMap<String, HashMap<String, VecDeque<QueueMessage>>>,
    seen: HashMap<String, HashSet<DedupToken>>,
    failing: HashSet<DedupToken>,
    /// enqueue の呼び出し履歴（失敗・重複も含む、呼び出し順）
    attempts: Vec<QueueMessage>,
}

#[derive(Clone, Default)]
pub struct InMemoryMessageBus {
    state: Arc<Mutex<InMemoryBusState>>,
}

impl InMemoryMessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// `token` を持つ enqueue を失敗させる
    pub async fn fail_token(&self, token: DedupToken) {
        self.state.lock().await.failing.insert(token);
    }

    /// ordering group の先頭を取り出す
    pub async fn receive(&self, destination: &str, group: &str) -> Option<QueueMessage> {
        let mut state = self.state.lock().await;
        state
            .queues
            .get_mut(destination)
            .and_then(|groups| groups.get_mut(group))
            .and_then(VecDeque::pop_front)
    }

    /// `destination` に溜まっているメッセージ数（全グループ合計）
    pub async fn depth(&self, destination: &str) -> usize {
        let state = self.state.lock().await;
        state
            .queues
            .get(destination)
            .map(|groups| groups.values().map(VecDeque::len).sum())
            .unwrap_or(0)
    }

    pub async fn attempts(&self) -> Vec<QueueMessage> {
        self.state.lock().await.attempts.clone()
    }
}

#[async_trait]
impl MessageBus for InMemoryMessageBus {
    async fn enqueue(&self, message: &QueueMessage) -> Result<(), BusError> {
        let mut state = self.state.lock().await;
        state.attempts.push(message.clone());

        if state.failing.contains(&message.dedup_token) {
            return Err(BusError::Transport(format!(
                "connection reset while sending {}",
                message.dedup_token
            )));
        }

        let fresh = state
            .seen
            .entry(message.destination.clone())
            .or_default()
            .insert(message.dedup_token.clone());
        if fresh {
            state
                .queues
                .entry(message.destination.clone())
                .or_default()
                .entry(message.ordering_group.clone())
                .or_default()
                .push_back(message.clone());
        }
        Ok(())
    }
}
