//! Delivery status of an outbox row and its persisted code.

use serde::{Deserialize, Serialize};

/// DeliveryStatus は outbox 行の配送状態
///
/// 状態遷移:
/// - Pending -> Claimed (atomic claim)
/// - Claimed -> Dispatched
/// - Claimed -> Failed (last_error populated)
///
/// Failed の行は relay の外で Pending に戻されない限り再 claim されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending,
    Claimed,
    Dispatched,
    Failed,
}

impl DeliveryStatus {
    pub const PENDING_CODE: i32 = 0;
    pub const CLAIMED_CODE: i32 = 1;
    pub const DISPATCHED_CODE: i32 = 2;
    pub const FAILED_CODE: i32 = -99;

    /// `status` カラムに保存する整数コード
    pub fn code(self) -> i32 {
        match self {
            DeliveryStatus::Pending => Self::PENDING_CODE,
            DeliveryStatus::Claimed => Self::CLAIMED_CODE,
            DeliveryStatus::Dispatched => Self::DISPATCHED_CODE,
            DeliveryStatus::Failed => Self::FAILED_CODE,
        }
    }

    /// 未知のコードは `None`
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            Self::PENDING_CODE => Some(DeliveryStatus::Pending),
            Self::CLAIMED_CODE => Some(DeliveryStatus::Claimed),
            Self::DISPATCHED_CODE => Some(DeliveryStatus::Dispatched),
            Self::FAILED_CODE => Some(DeliveryStatus::Failed),
            _ => None,
        }
    }

    /// claim の対象になるか（Pending のみ）
    pub fn is_claimable(self) -> bool {
        matches!(self, DeliveryStatus::Pending)
    }
}
