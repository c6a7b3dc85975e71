pub mod handle;

pub use handle::SchedulerHandle;

use crate::config::Config;
use crate::exchanges::MarketDataSource;
use crate::models::{PipelineSnapshot, VolumeThreshold};
use crate::pipeline::{self, PipelineSettings};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchedulerState {
    Idle,
    Fetching,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Timer,
    Manual,
}

/// Runs one pipeline cycle per period on a single task. Cycles run inline,
/// so there is never more than one in flight.
pub struct PollingScheduler {
    source: Arc<dyn MarketDataSource>,
    settings: PipelineSettings,
    period: Duration,
    threshold_rx: watch::Receiver<VolumeThreshold>,
    snapshot_tx: watch::Sender<Arc<PipelineSnapshot>>,
    state_tx: watch::Sender<SchedulerState>,
    refresh_rx: mpsc::Receiver<()>,
}

impl PollingScheduler {
    pub fn new(source: Arc<dyn MarketDataSource>, config: &Config) -> (Self, SchedulerHandle) {
        let (threshold_tx, threshold_rx) = watch::channel(config.min_volume);
        let (snapshot_tx, snapshot_rx) =
            watch::channel(Arc::new(PipelineSnapshot::empty(config.min_volume)));
        let (state_tx, state_rx) = watch::channel(SchedulerState::Idle);
        // capacity 1: refresh requests made while one is pending collapse into it
        let (refresh_tx, refresh_rx) = mpsc::channel(1);

        let scheduler = Self {
            source,
            settings: PipelineSettings::from(config),
            period: config.refresh_interval,
            threshold_rx,
            snapshot_tx,
            state_tx,
            refresh_rx,
        };
        let handle = SchedulerHandle::new(threshold_tx, refresh_tx, snapshot_rx, state_rx);

        (scheduler, handle)
    }

    /// Polls until `shutdown` resolves. The first cycle runs immediately.
    /// A cycle still in flight at shutdown is dropped, not awaited.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            "[{}] polling every {:?}",
            self.source.name(),
            self.period
        );

        let mut next_tick = Instant::now();

        loop {
            self.state_tx.send_replace(SchedulerState::Idle);

            let trigger = tokio::select! {
                _ = &mut shutdown => break,
                _ = sleep_until(next_tick) => Trigger::Timer,
                Some(()) = self.refresh_rx.recv() => Trigger::Manual,
            };

            let started = Instant::now();
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("[{}] abandoning in-flight cycle", self.source.name());
                    break;
                }
                _ = self.run_cycle() => {}
            }

            // a manual refresh restarts the period from the moment it ran
            next_tick = match trigger {
                Trigger::Timer => next_tick + self.period,
                Trigger::Manual => started + self.period,
            };

            // ticks that fell due while the cycle was in flight are dropped
            let now = Instant::now();
            while next_tick <= now {
                next_tick += self.period;
            }
        }

        tracing::info!("[{}] scheduler stopped", self.source.name());
    }

    /// fetch → pipeline → publish. Never fails: a fetch error republishes
    /// the previous entries marked as stale.
    async fn run_cycle(&self) -> SchedulerState {
        // read once; a change made during the fetch applies to the next cycle
        let threshold = *self.threshold_rx.borrow();
        let previous = Arc::clone(&self.snapshot_tx.borrow());

        self.state_tx.send_replace(SchedulerState::Fetching);
        let attempted_ms = now_ms();

        let (snapshot, state) = match self.source.fetch_tickers().await {
            Ok(records) => {
                let entries = pipeline::run(records, threshold, &self.settings);
                tracing::info!(
                    "[{}] {} assets at or above {}",
                    self.source.name(),
                    entries.len(),
                    threshold
                );
                metrics::counter!("binancewatch_cycles_total", "outcome" => "success").increment(1);
                metrics::gauge!("binancewatch_ranked_entries").set(entries.len() as f64);

                let snapshot = PipelineSnapshot {
                    entries,
                    success: true,
                    updated_ms: attempted_ms,
                    attempted_ms,
                    threshold,
                    error: None,
                };
                (snapshot, SchedulerState::Succeeded)
            }
            Err(e) => {
                tracing::warn!(
                    "[{}] fetch failed, keeping {} stale entries: {}",
                    self.source.name(),
                    previous.count(),
                    e
                );
                metrics::counter!("binancewatch_cycles_total", "outcome" => "failure").increment(1);

                let snapshot = PipelineSnapshot {
                    entries: previous.entries.clone(),
                    success: false,
                    updated_ms: previous.updated_ms,
                    attempted_ms,
                    threshold: previous.threshold,
                    error: Some(e.to_string()),
                };
                (snapshot, SchedulerState::Failed)
            }
        };

        // state first, so anyone woken by the snapshot sees the outcome
        self.state_tx.send_replace(state);
        self.snapshot_tx.send_replace(Arc::new(snapshot));
        state
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
