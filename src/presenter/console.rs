use super::{Presenter, open_url};
use crate::display;
use crate::errors::PresenterError;
use crate::models::{PipelineSnapshot, RankedEntry};
use crate::scheduler::SchedulerHandle;

/// Logs the menu that a native menu bar would show.
pub struct ConsolePresenter {
    handle: SchedulerHandle,
    max_rows: usize,
}

impl ConsolePresenter {
    pub fn new(handle: SchedulerHandle, max_rows: usize) -> Self {
        Self { handle, max_rows }
    }

    /// Menu rows in display order, with the placeholder for an empty list.
    pub fn rows(snapshot: &PipelineSnapshot) -> Vec<String> {
        if snapshot.entries.is_empty() {
            return vec!["No coins above threshold".to_string()];
        }
        snapshot.entries.iter().map(display::menu_label).collect()
    }
}

impl Presenter for ConsolePresenter {
    fn render(&self, snapshot: &PipelineSnapshot) {
        let title = display::status_title(snapshot, self.handle.state());
        tracing::info!("=== {} (min {}) ===", title, snapshot.threshold);

        if let Some(err) = &snapshot.error {
            tracing::warn!("showing last good data: {}", err);
        }

        for row in Self::rows(snapshot).iter().take(self.max_rows) {
            tracing::info!("{row}");
        }
        for entry in &snapshot.entries {
            tracing::debug!("{} {} -> {}", entry.asset, entry.tier.label(), entry.chart_url);
        }
    }

    fn on_select(&self, entry: &RankedEntry) -> Result<(), PresenterError> {
        tracing::info!("opening chart for {}: {}", entry.asset, entry.chart_url);
        open_url(&entry.chart_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VolumeThreshold;
    use crate::pipeline::{self, PipelineSettings};
    use crate::scheduler::tests::market;

    #[test]
    fn empty_snapshot_shows_placeholder() {
        let snap = PipelineSnapshot::empty(VolumeThreshold::B1);
        assert_eq!(ConsolePresenter::rows(&snap), vec!["No coins above threshold"]);
    }

    #[test]
    fn one_row_per_entry_in_rank_order() {
        let mut snap = PipelineSnapshot::empty(VolumeThreshold::M500);
        snap.entries = pipeline::run(market(), VolumeThreshold::M500, &PipelineSettings::default());
        let rows = ConsolePresenter::rows(&snap);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("BTC"));
        assert!(rows[1].contains("ETH"));
    }
}
