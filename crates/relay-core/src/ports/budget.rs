//! ExecutionBudget port - ホストの残り実行時間
//!
//! Lambda のような実行時間制限のあるホストでは、残り時間が安全マージンを
//! 下回ったら次のサイクルを始めない。

use chrono::{DateTime, Utc};
use std::time::Duration;

use super::Clock;

pub trait ExecutionBudget: Send + Sync {
    /// 残り実行時間。制限のないホストでは `None`
    fn remaining(&self) -> Option<Duration>;
}

/// 常駐デーモンの予算（無制限）
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl ExecutionBudget for Unbounded {
    fn remaining(&self) -> Option<Duration> {
        None
    }
}

/// 壁時計の期限で尽きる予算
pub struct DeadlineBudget<C> {
    deadline: DateTime<Utc>,
    clock: C,
}

impl<C: Clock> DeadlineBudget<C> {
    pub fn new(deadline: DateTime<Utc>, clock: C) -> Self {
        Self { deadline, clock }
    }

    /// Unix epoch からのミリ秒で期限を指定する。範囲外の値は期限切れ扱い
    pub fn from_epoch_millis(deadline_ms: u64, clock: C) -> Self {
        let deadline = i64::try_from(deadline_ms)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::new(deadline, clock)
    }
}

impl<C: Clock> ExecutionBudget for DeadlineBudget<C> {
    fn remaining(&self) -> Option<Duration> {
        // Past the deadline: zero remaining.
        Some((self.deadline - self.clock.now()).to_std().unwrap_or(Duration::ZERO))
    }
}
