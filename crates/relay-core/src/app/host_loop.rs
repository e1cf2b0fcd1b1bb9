//! PollingHost - サイクルを繰り返し実行するホストループ
//!
//! # フロー（1 回の起動あたり）
//! 1. `max_cycles` に達したら終了
//! 2. キャンセルされていたら終了
//! 3. 残り実行時間が `safety_margin` 未満なら終了
//! 4. `CycleRunner::run_cycle()`
//! 5. 最後のサイクルでなければ `cycle_delay` 待つ（キャンセルで中断可）
//!
//! Lambda では 20 サイクル × 3 秒で約 1 分動き、デーモンでは
//! `max_cycles = None` で停止シグナルまで動き続ける。

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::cycle_runner::CycleRunner;
use super::status::{HostReport, StopReason};
use crate::ports::ExecutionBudget;

pub struct PollingHost {
    runner: CycleRunner,
    max_cycles: Option<u32>,
    cycle_delay: Duration,
    safety_margin: Duration,
}

impl PollingHost {
    pub fn new(
        runner: CycleRunner,
        max_cycles: Option<u32>,
        cycle_delay: Duration,
        safety_margin: Duration,
    ) -> Self {
        Self {
            runner,
            max_cycles,
            cycle_delay,
            safety_margin,
        }
    }

    pub fn runner(&self) -> &CycleRunner {
        &self.runner
    }

    pub async fn run(
        &self,
        budget: &dyn ExecutionBudget,
        cancel: &CancellationToken,
    ) -> HostReport {
        let mut report = HostReport::default();
        let mut completed: u32 = 0;

        let reason = loop {
            if self.max_cycles.is_some_and(|max| completed >= max) {
                break StopReason::MaxCycles;
            }
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if let Some(remaining) = budget.remaining()
                && remaining < self.safety_margin
            {
                info!(
                    remaining_ms = remaining.as_millis() as u64,
                    "execution budget below safety margin"
                );
                break StopReason::BudgetExhausted;
            }

            let cycle = self.runner.run_cycle().await;
            report.absorb(&cycle);
            completed += 1;

            if self.max_cycles.is_some_and(|max| completed >= max) {
                break StopReason::MaxCycles;
            }

            let cancelled = tokio::select! {
                _ = cancel.cancelled() => true,
                _ = tokio::time::sleep(self.cycle_delay) => false,
            };
            if cancelled {
                break StopReason::Cancelled;
            }
        };

        info!(
            cycles = report.cycles,
            dispatched = report.dispatched,
            failed = report.failed,
            stop_reason = ?reason,
            "host run finished"
        );
        report.stop_reason = Some(reason);
        report
    }
}
