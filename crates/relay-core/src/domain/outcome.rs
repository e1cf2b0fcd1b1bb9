//! Dispatch outcome: the per-record result the cycle turns into a status write.

use super::status::DeliveryStatus;

/// DispatchOutcome は 1 回の enqueue の結果
///
/// dispatcher はエラーを上に投げず、呼び出し側がこれを見て status を書く。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    Failed(String),
}

impl DispatchOutcome {
    /// store に書き戻す status
    pub fn status(&self) -> DeliveryStatus {
        match self {
            DispatchOutcome::Delivered => DeliveryStatus::Dispatched,
            DispatchOutcome::Failed(_) => DeliveryStatus::Failed,
        }
    }

    /// 書き戻すエラー文字列（成功時は `None`）
    pub fn error(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Delivered => None,
            DispatchOutcome::Failed(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivered_maps_to_dispatched_without_error() {
        let outcome = DispatchOutcome::Delivered;
        assert_eq!(outcome.status(), DeliveryStatus::Dispatched);
        assert_eq!(outcome.error(), None);
    }

    #[test]
    fn failed_carries_reason() {
        let outcome = DispatchOutcome::Failed("bus error: throttled".into());
        assert_eq!(outcome.status(), DeliveryStatus::Failed);
        assert_eq!(outcome.error(), Some("bus error: throttled"));
    }
}
