use crate::models::{PipelineSnapshot, RankedEntry};
use crate::scheduler::SchedulerState;

/// Price with precision that shrinks as the price grows, so every row
/// stays about 8 characters wide.
pub fn format_price(price: f64) -> String {
    if price >= 1000.0 {
        format!("${}", group_thousands(price.round() as u64))
    } else if price >= 100.0 {
        format!("${price:.1}")
    } else if price >= 10.0 {
        format!("${price:.2}")
    } else if price >= 0.1 {
        format!("${price:.3}")
    } else if price >= 0.01 {
        format!("${price:.4}")
    } else {
        format!("${price:.5}")
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_change(change_pct: f64) -> String {
    let sign = if change_pct >= 0.0 { "+" } else { "" };
    format!("{sign}{change_pct:.1}%")
}

pub fn format_volume(volume: f64) -> String {
    format!("${:.1}B", volume / 1_000_000_000.0)
}

/// Fixed-width menu row: marker, asset, price, change, volume.
pub fn menu_label(entry: &RankedEntry) -> String {
    format!(
        "{} {:<6}  {:<10}  {:>7}  {:>6}",
        entry.tier.marker(),
        entry.asset.as_str(),
        format_price(entry.price),
        format_change(entry.change_pct),
        format_volume(entry.volume)
    )
}

/// Compact status shown in the menu bar.
pub fn status_title(snapshot: &PipelineSnapshot, state: SchedulerState) -> String {
    if state == SchedulerState::Fetching || snapshot.is_pending() {
        "₿ ...".to_string()
    } else if snapshot.is_stale() {
        "₿ !".to_string()
    } else {
        format!("₿ {}", snapshot.count())
    }
}
