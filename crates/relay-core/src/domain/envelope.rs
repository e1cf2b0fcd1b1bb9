//! QueueMessage - バスに渡すメッセージ
//!
//! `OutboundRecord` から組み立て、`MessageBus::enqueue` に渡します。

use serde::{Deserialize, Serialize};

use super::errors::BusError;
use super::record::{DedupToken, OutboundRecord};

/// 1 回の enqueue 要求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    /// キューのアドレス（SQS FIFO キューの URL など）
    pub destination: String,
    /// JSON にした `OutboundRecord`
    pub body: String,
    /// FIFO グループ。同じグループ内は enqueue 順に届く
    pub ordering_group: String,
    pub dedup_token: DedupToken,
}

impl QueueMessage {
    /// レコードからメッセージを組み立てる。token か body を作れなければ `BusError`
    pub fn for_record(
        destination: impl Into<String>,
        record: &OutboundRecord,
    ) -> Result<Self, BusError> {
        let dedup_token = record.dedup_token()?;
        Ok(Self {
            destination: destination.into(),
            body: serde_json::to_string(record)?,
            ordering_group: record.recipient_key.clone(),
            dedup_token,
        })
    }
}
