//! Errors - エラー型と分類
//!
//! | 種類 | 発生箇所 | 扱い |
//! |------|----------|------|
//! | `StoreError` | open / claim | サイクルを中断（何も claim していないので損失なし） |
//! | `BusError` | メッセージ組み立て / enqueue | レコード単位で `Failed` として記録 |
//! | `AckError` | 送信後の status 書き込み | ログのみ（次回 reclaim 時は dedup token が保険） |

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::ids::RecordId;
use super::status::DeliveryStatus;

/// StoreError は DB への接続・クエリの失敗
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("could not decode row: {0}")]
    Decode(String),
}

/// BusError は 1 メッセージの組み立て・送信の失敗
#[derive(Debug, Error)]
pub enum BusError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("throttled: {0}")]
    Throttled(String),

    #[error("message rejected: {0}")]
    Rejected(String),

    #[error("could not serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    DedupToken(#[from] TickOverflow),
}

/// `created_at` が .NET tick（i64）の範囲外で dedup token を作れない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("created_at {0} is outside the dedup token tick range")]
pub struct TickOverflow(pub DateTime<Utc>);

/// AckError は dispatch 後の status 書き込みの失敗
///
/// バスへの送信（または Failed の判定）は既に済んでいるので取り消さない。
#[derive(Debug, Error)]
#[error("failed to record status {status:?} for record {record_id}: {source}")]
pub struct AckError {
    pub record_id: RecordId,
    pub status: DeliveryStatus,
    #[source]
    pub source: StoreError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_error_mentions_record_and_status() {
        let err = AckError {
            record_id: RecordId::new(7),
            status: DeliveryStatus::Dispatched,
            source: StoreError::Connection("reset by peer".into()),
        };
        let text = err.to_string();
        assert!(text.contains("record 7"));
        assert!(text.contains("Dispatched"));
        assert!(text.contains("reset by peer"));
    }
}
