use crate::models::{AssetKey, RankedEntry, TickerRecord, VolumeTier};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// TradingView perpetual chart for a Binance futures pair.
pub fn chart_url(symbol: &str) -> String {
    format!("https://www.tradingview.com/chart/?symbol=BINANCE:{symbol}.P")
}

/// Sorts by volume descending, then asset ascending, and attaches the
/// display tier and chart link.
pub fn rank(mut records: Vec<(AssetKey, TickerRecord)>) -> Vec<RankedEntry> {
    records.sort_by(|(ka, a), (kb, b)| {
        Reverse(OrderedFloat(a.quote_volume))
            .cmp(&Reverse(OrderedFloat(b.quote_volume)))
            .then_with(|| ka.cmp(kb))
    });

    records
        .into_iter()
        .map(|(asset, r)| RankedEntry {
            chart_url: chart_url(&r.symbol),
            tier: VolumeTier::for_volume(r.quote_volume),
            asset,
            symbol: r.symbol,
            price: r.last_price,
            change_pct: r.price_change_percent,
            volume: r.quote_volume,
        })
        .collect()
}
