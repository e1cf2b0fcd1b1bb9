//! CycleRunner - claim → dispatch → acknowledge を 1 回まわす
//!
//! # フロー
//! 1. `OutboxStore::open()` でセッションを開く
//! 2. `StoreSession::claim(batch_size)` で Pending を原子的に確保
//! 3. claim 順に 1 件ずつ `DispatchEngine::dispatch()` → `update_status()`
//! 4. セッションを drop してコネクションを返す
//!
//! # エラーの扱い
//! - open / claim の失敗: ログを出してサイクル終了（何も claim していない）
//! - dispatch の失敗: `Failed` として記録し、次のレコードへ
//! - status 書き込みの失敗: ログのみ。バス側の送信は取り消さない

use std::sync::Arc;

use tracing::{Instrument, debug, error, info, info_span};

use super::dispatcher::DispatchEngine;
use super::status::CycleReport;
use crate::domain::{AckError, CycleId, DispatchOutcome, OutboundRecord, RecordId, StoreError};
use crate::ports::{IdGenerator, OutboxStore, StoreSession};

pub struct CycleRunner {
    store: Arc<dyn OutboxStore>,
    dispatcher: DispatchEngine,
    batch_size: usize,
    ids: Arc<dyn IdGenerator>,
}

impl CycleRunner {
    pub fn new(
        store: Arc<dyn OutboxStore>,
        dispatcher: DispatchEngine,
        batch_size: usize,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            batch_size,
            ids,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 1 サイクル実行する。失敗はしない（エラーはすべてログとカウントに残す）
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle_id = self.ids.generate_cycle_id();
        let span = info_span!("cycle", %cycle_id);
        self.run(cycle_id).instrument(span).await
    }

    async fn run(&self, cycle_id: CycleId) -> CycleReport {
        let mut report = CycleReport::new(cycle_id);

        let (mut session, records) = match self.open_and_claim().await {
            Ok(claimed) => claimed,
            Err(error) => {
                error!(%error, "cycle aborted before claiming");
                report.aborted = true;
                return report;
            }
        };

        report.claimed = records.len();
        if records.is_empty() {
            debug!("no pending records");
            return report;
        }
        info!(claimed = records.len(), "claimed records");

        for record in &records {
            let outcome = self.dispatcher.dispatch(record).await;
            match outcome {
                DispatchOutcome::Delivered => report.dispatched += 1,
                DispatchOutcome::Failed(_) => report.failed += 1,
            }

            if let Err(error) = acknowledge(session.as_mut(), record, &outcome).await {
                error!(%error, "status write failed; row stays claimed");
                report.ack_failures += 1;
            }
        }

        info!(
            dispatched = report.dispatched,
            failed = report.failed,
            ack_failures = report.ack_failures,
            "cycle finished"
        );
        report
    }

    async fn open_and_claim(
        &self,
    ) -> Result<(Box<dyn StoreSession>, Vec<OutboundRecord>), StoreError> {
        let mut session = self.store.open().await?;
        let records = session.claim(self.batch_size).await?;
        Ok((session, records))
    }
}

async fn acknowledge(
    session: &mut dyn StoreSession,
    record: &OutboundRecord,
    outcome: &DispatchOutcome,
) -> Result<(), AckError> {
    let record_id: RecordId = record.id;
    let status = outcome.status();
    session
        .update_status(record_id, status, outcome.error())
        .await
        .map_err(|source| AckError {
            record_id,
            status,
            source,
        })
}
