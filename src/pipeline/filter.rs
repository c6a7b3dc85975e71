use crate::models::{TickerRecord, VolumeThreshold};

/// Drops rows that should never be listed regardless of threshold:
/// delivery contracts (BTCUSDT_250328) and extreme movers, which are
/// almost always delisting or relisting pumps.
pub fn normalize(records: Vec<TickerRecord>, max_abs_change_pct: f64) -> Vec<TickerRecord> {
    records
        .into_iter()
        .filter(|r| {
            if r.symbol.contains('_') {
                tracing::debug!("skipping delivery contract {}", r.symbol);
                return false;
            }
            if r.price_change_percent.abs() > max_abs_change_pct {
                tracing::debug!(
                    "skipping {} with {:.1}% change",
                    r.symbol,
                    r.price_change_percent
                );
                return false;
            }
            true
        })
        .collect()
}

/// Keeps exactly the records quoted in an eligible currency with
/// `quote_volume >= threshold`. Input order is preserved.
pub fn filter(
    records: Vec<TickerRecord>,
    threshold: VolumeThreshold,
    eligible_quotes: &[String],
) -> Vec<TickerRecord> {
    let floor = threshold.usd();
    records
        .into_iter()
        .filter(|r| eligible_quotes.iter().any(|q| r.symbol.ends_with(q.as_str())))
        .filter(|r| r.quote_volume >= floor)
        .collect()
}
