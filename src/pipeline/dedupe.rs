use crate::models::{AssetKey, TickerRecord};
use std::collections::HashMap;

/// Keeps one record per underlying asset: the one with the strictly
/// greatest volume, first seen on ties. Output follows the order in which
/// each asset first appeared. Symbols with no known quote are dropped.
pub fn dedupe(records: Vec<TickerRecord>) -> Vec<(AssetKey, TickerRecord)> {
    let mut best: Vec<(AssetKey, TickerRecord)> = Vec::new();
    let mut slot_of: HashMap<AssetKey, usize> = HashMap::new();

    for record in records {
        let Some(key) = AssetKey::from_symbol(&record.symbol) else {
            tracing::debug!("no known quote in {}, skipping", record.symbol);
            continue;
        };

        match slot_of.get(&key) {
            Some(&i) => {
                if record.quote_volume > best[i].1.quote_volume {
                    best[i].1 = record;
                }
            }
            None => {
                slot_of.insert(key.clone(), best.len());
                best.push((key, record));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::ticker;

    #[test]
    fn keeps_highest_volume_pair_per_asset() {
        let out = dedupe(vec![
            ticker("BTCUSDC", 1.5e9, 0.0),
            ticker("ETHUSDT", 1e9, 0.0),
            ticker("BTCUSDT", 2e9, 0.0),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0.as_str(), "BTC");
        assert_eq!(out[0].1.symbol, "BTCUSDT");
        assert_eq!(out[1].0.as_str(), "ETH");
    }

    #[test]
    fn equal_volume_keeps_first_seen() {
        let out = dedupe(vec![
            ticker("BTCUSDC", 2e9, 0.0),
            ticker("BTCUSDT", 2e9, 0.0),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.symbol, "BTCUSDC");
    }

    #[test]
    fn every_asset_survives_exactly_once() {
        let input = vec![
            ticker("AUSDT", 1.0, 0.0),
            ticker("BUSDT", 3.0, 0.0),
            ticker("AUSDC", 2.0, 0.0),
            ticker("CBUSD", 1.0, 0.0),
            ticker("BUSDC", 9.0, 0.0),
            ticker("WEIRD", 9.0, 0.0),
        ];
        let out = dedupe(input);
        let keys: Vec<_> = out.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(out[0].1.quote_volume, 2.0);
        assert_eq!(out[1].1.quote_volume, 9.0);
    }
}
