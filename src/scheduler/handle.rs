use super::SchedulerState;
use crate::models::{PipelineSnapshot, VolumeThreshold};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Cheap, cloneable view of a running scheduler. Readers get the latest
/// snapshot; the settings side writes the threshold and asks for refreshes.
#[derive(Clone)]
pub struct SchedulerHandle {
    threshold_tx: Arc<watch::Sender<VolumeThreshold>>,
    refresh_tx: mpsc::Sender<()>,
    snapshot_rx: watch::Receiver<Arc<PipelineSnapshot>>,
    state_rx: watch::Receiver<SchedulerState>,
}

impl SchedulerHandle {
    pub(super) fn new(
        threshold_tx: watch::Sender<VolumeThreshold>,
        refresh_tx: mpsc::Sender<()>,
        snapshot_rx: watch::Receiver<Arc<PipelineSnapshot>>,
        state_rx: watch::Receiver<SchedulerState>,
    ) -> Self {
        Self {
            threshold_tx: Arc::new(threshold_tx),
            refresh_tx,
            snapshot_rx,
            state_rx,
        }
    }

    pub fn snapshot(&self) -> Arc<PipelineSnapshot> {
        Arc::clone(&self.snapshot_rx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<PipelineSnapshot>> {
        self.snapshot_rx.clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SchedulerState> {
        self.state_rx.clone()
    }

    pub fn state(&self) -> SchedulerState {
        *self.state_rx.borrow()
    }

    pub fn threshold(&self) -> VolumeThreshold {
        *self.threshold_tx.borrow()
    }

    /// Picked up by the next cycle that starts; a cycle already in flight
    /// keeps the value it read.
    pub fn set_threshold(&self, threshold: VolumeThreshold) {
        let changed = self.threshold_tx.send_if_modified(|current| {
            if *current == threshold {
                return false;
            }
            *current = threshold;
            true
        });

        if changed {
            tracing::info!("volume threshold set to {threshold}");
        }
    }

    /// Asks for a cycle now. Returns false if a request is already queued
    /// or the scheduler is gone.
    pub fn refresh_now(&self) -> bool {
        match self.refresh_tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                tracing::debug!("refresh already pending");
                false
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::warn!("refresh requested but scheduler has stopped");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::scheduler::PollingScheduler;
    use crate::scheduler::tests::{FakeSource, market};

    #[tokio::test]
    async fn refresh_requests_coalesce() {
        let (_scheduler, handle) =
            PollingScheduler::new(Arc::new(FakeSource::new(market())), &Config::default());
        assert!(handle.refresh_now());
        assert!(!handle.refresh_now());
    }

    #[tokio::test]
    async fn refresh_fails_once_scheduler_is_dropped() {
        let (scheduler, handle) =
            PollingScheduler::new(Arc::new(FakeSource::new(market())), &Config::default());
        drop(scheduler);
        assert!(!handle.refresh_now());
    }

    #[tokio::test]
    async fn threshold_is_shared_between_clones() {
        let (_scheduler, handle) =
            PollingScheduler::new(Arc::new(FakeSource::new(market())), &Config::default());
        let other = handle.clone();
        assert_eq!(other.threshold(), VolumeThreshold::B1);
        handle.set_threshold(VolumeThreshold::B5);
        assert_eq!(other.threshold(), VolumeThreshold::B5);
    }
}
