//! Cycle and host reports.

use serde::{Deserialize, Serialize};

use crate::domain::CycleId;

/// CycleReport は claim → dispatch → acknowledge 1 回分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle_id: CycleId,
    pub claimed: usize,
    pub dispatched: usize,
    pub failed: usize,
    /// 失敗した status 書き込みの数（バス側の結果はそのまま）
    pub ack_failures: usize,
    /// claim 前にサイクルが終わった（store 不達、claim 失敗）
    pub aborted: bool,
}

impl CycleReport {
    pub fn new(cycle_id: CycleId) -> Self {
        Self {
            cycle_id,
            claimed: 0,
            dispatched: 0,
            failed: 0,
            ack_failures: 0,
            aborted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxCycles,
    BudgetExhausted,
    Cancelled,
}

/// HostReport はホスト 1 回の起動分の合計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostReport {
    pub cycles: usize,
    pub claimed: usize,
    pub dispatched: usize,
    pub failed: usize,
    pub ack_failures: usize,
    pub aborted_cycles: usize,
    pub stop_reason: Option<StopReason>,
}

impl HostReport {
    pub fn absorb(&mut self, cycle: &CycleReport) {
        self.cycles += 1;
        self.claimed += cycle.claimed;
        self.dispatched += cycle.dispatched;
        self.failed += cycle.failed;
        self.ack_failures += cycle.ack_failures;
        if cycle.aborted {
            self.aborted_cycles += 1;
        }
    }
}
