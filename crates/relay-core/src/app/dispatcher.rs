//! DispatchEngine - 1 レコードを 1 回だけバスへ送る
//!
//! # フロー
//! 1. `OutboundRecord` を JSON にして `QueueMessage` を組み立てる
//!    （group = recipient_key, dedup = `"{id}_{ticks}"`）
//! 2. `MessageBus::enqueue()` を 1 回だけ呼ぶ（サイクル内リトライなし）
//! 3. 結果を `DispatchOutcome` にして返す。エラーは上に投げない

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{BusError, DispatchOutcome, OutboundRecord, QueueMessage};
use crate::ports::MessageBus;

/// 送信失敗時に `last_error` に書く文字列の接頭辞
pub const FAILURE_PREFIX: &str = "bus error: ";

pub struct DispatchEngine {
    bus: Arc<dyn MessageBus>,
    destination: String,
}

impl DispatchEngine {
    pub fn new(bus: Arc<dyn MessageBus>, destination: impl Into<String>) -> Self {
        Self {
            bus,
            destination: destination.into(),
        }
    }

    pub fn build_message(&self, record: &OutboundRecord) -> Result<QueueMessage, BusError> {
        QueueMessage::for_record(&self.destination, record)
    }

    /// `record` を 1 回だけ enqueue する。組み立てに失敗したらバスには触れない
    pub async fn dispatch(&self, record: &OutboundRecord) -> DispatchOutcome {
        let sent = match self.build_message(record) {
            Ok(message) => self.bus.enqueue(&message).await,
            Err(error) => Err(error),
        };

        match sent {
            Ok(()) => {
                debug!(record_id = %record.id, recipient_key = %record.recipient_key, "enqueued");
                DispatchOutcome::Delivered
            }
            Err(error) => {
                warn!(record_id = %record.id, %error, "enqueue failed");
                DispatchOutcome::Failed(format!("{FAILURE_PREFIX}{error}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;
    use crate::impls::InMemoryMessageBus;
    use chrono::{TimeZone, Utc};

    fn record(id: i64) -> OutboundRecord {
        OutboundRecord::from_columns(
            RecordId::new(id),
            Some("https://api.example.test".into()),
            Some("{}".into()),
            Some("payload".into()),
            Some("+551199999999".into()),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn delivered_on_successful_send() {
        let bus = InMemoryMessageBus::new();
        let engine = DispatchEngine::new(Arc::new(bus.clone()), "queue");

        let outcome = engine.dispatch(&record(1)).await;

        assert_eq!(outcome, DispatchOutcome::Delivered);
        let sent = bus.receive("queue", "+551199999999").await.unwrap();
        assert_eq!(sent.dedup_token, record(1).dedup_token().unwrap());
    }

    #[tokio::test]
    async fn failed_send_captures_reason() {
        let bus = InMemoryMessageBus::new();
        bus.fail_token(record(1).dedup_token().unwrap()).await;
        let engine = DispatchEngine::new(Arc::new(bus.clone()), "queue");

        let outcome = engine.dispatch(&record(1)).await;

        let DispatchOutcome::Failed(reason) = outcome else {
            panic!("expected failure");
        };
        assert!(reason.starts_with(FAILURE_PREFIX));
        assert!(reason.contains("connection reset"));
    }

    #[tokio::test]
    async fn one_attempt_per_dispatch() {
        let bus = InMemoryMessageBus::new();
        bus.fail_token(record(1).dedup_token().unwrap()).await;
        let engine = DispatchEngine::new(Arc::new(bus.clone()), "queue");

        engine.dispatch(&record(1)).await;

        assert_eq!(bus.attempts().await.len(), 1);
    }

    #[tokio::test]
    async fn unbuildable_message_fails_without_sending() {
        let bus = InMemoryMessageBus::new();
        let engine = DispatchEngine::new(Arc::new(bus.clone()), "queue");
        let mut far_future = record(9);
        far_future.created_at = Utc.with_ymd_and_hms(40_000, 1, 1, 0, 0, 0).unwrap();

        let outcome = engine.dispatch(&far_future).await;

        let DispatchOutcome::Failed(reason) = outcome else {
            panic!("expected failure");
        };
        assert!(reason.starts_with(FAILURE_PREFIX));
        assert!(reason.contains("tick range"));
        assert!(bus.attempts().await.is_empty());
    }
}
