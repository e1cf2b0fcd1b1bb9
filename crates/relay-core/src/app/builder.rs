//! RelayBuilder - store / bus / config を組み合わせて PollingHost を作る
//!
//! # Fail-fast 設計
//! - store と bus が両方設定されているか
//! - queue URL（destination）があるか
//! - batch_size が 1 以上か
//!
//! 不足があれば `build()` が `BuildError` を返す（起動時に落とす）。

use std::sync::Arc;

use super::cycle_runner::CycleRunner;
use super::dispatcher::DispatchEngine;
use super::host_loop::PollingHost;
use crate::config::RelayConfig;
use crate::ports::{IdGenerator, MessageBus, OutboxStore, SystemClock, UlidGenerator};

/// # 使用例
/// ```ignore
/// let host = RelayBuilder::new(config)
///     .store(Arc::new(store))
///     .bus(Arc::new(bus))
///     .build()?;
/// ```
pub struct RelayBuilder {
    config: RelayConfig,
    store: Option<Arc<dyn OutboxStore>>,
    bus: Option<Arc<dyn MessageBus>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no outbox store configured")]
    MissingStore,

    #[error("no message bus configured")]
    MissingBus,

    #[error("no queue url configured")]
    MissingQueueUrl,

    #[error("batch size must be at least 1")]
    EmptyBatch,
}

impl RelayBuilder {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            store: None,
            bus: None,
            ids: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn OutboxStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn bus(mut self, bus: Arc<dyn MessageBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// 省略時は SystemClock の UlidGenerator
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<PollingHost, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let bus = self.bus.ok_or(BuildError::MissingBus)?;
        let destination = self
            .config
            .queue_url
            .clone()
            .ok_or(BuildError::MissingQueueUrl)?;
        if self.config.batch_size == 0 {
            return Err(BuildError::EmptyBatch);
        }
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(SystemClock)),
        };

        let runner = CycleRunner::new(
            store,
            DispatchEngine::new(bus, destination),
            self.config.batch_size,
            ids,
        );
        Ok(PollingHost::new(
            runner,
            self.config.max_cycles,
            self.config.cycle_delay,
            self.config.safety_margin,
        ))
    }
}
