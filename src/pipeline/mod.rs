pub mod dedupe;
pub mod filter;
pub mod rank;

use crate::config::Config;
use crate::models::{RankedEntry, TickerRecord, VolumeThreshold};

/// Settings that stay fixed for the life of the process. The threshold is
/// passed separately because it can change between cycles.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub eligible_quotes: Vec<String>,
    pub max_abs_change_pct: f64,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            eligible_quotes: config.eligible_quotes.clone(),
            max_abs_change_pct: config.max_abs_change_pct,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// normalize → filter → dedupe → rank. Pure.
pub fn run(
    records: Vec<TickerRecord>,
    threshold: VolumeThreshold,
    settings: &PipelineSettings,
) -> Vec<RankedEntry> {
    let total = records.len();
    let normalized = filter::normalize(records, settings.max_abs_change_pct);
    let filtered = filter::filter(normalized, threshold, &settings.eligible_quotes);
    let unique = dedupe::dedupe(filtered);
    let ranked = rank::rank(unique);

    tracing::debug!(
        "pipeline: {} tickers -> {} ranked (threshold {})",
        total,
        ranked.len(),
        threshold
    );
    ranked
}
