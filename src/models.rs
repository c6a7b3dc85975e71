use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the 24h ticker statistics, already parsed from the
/// exchange's string-encoded decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerRecord {
    pub symbol: String,
    pub last_price: f64,
    pub price_change_percent: f64,
    /// 24h volume in quote currency (USD for USDT pairs)
    pub quote_volume: f64,
}

/// Quote currencies stripped to find the underlying asset. Order matters:
/// "USD" must come after the longer suffixes.
pub const KNOWN_QUOTES: [&str; 4] = ["USDT", "USDC", "BUSD", "USD"];

/// Underlying asset of a pair, e.g. "BTC" for both BTCUSDT and BTCUSDC.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AssetKey(String);

impl AssetKey {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        KNOWN_QUOTES.iter().find_map(|quote| {
            symbol
                .strip_suffix(quote)
                .filter(|base| !base.is_empty())
                .map(|base| Self(base.to_string()))
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimum 24h volume a pair needs to be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum VolumeThreshold {
    #[serde(rename = "250M")]
    M250,
    #[serde(rename = "500M")]
    M500,
    #[default]
    #[serde(rename = "1B")]
    B1,
    #[serde(rename = "2B")]
    B2,
    #[serde(rename = "5B")]
    B5,
}

impl VolumeThreshold {
    pub const ALL: [VolumeThreshold; 5] = [Self::M250, Self::M500, Self::B1, Self::B2, Self::B5];

    pub fn usd(self) -> f64 {
        match self {
            Self::M250 => 250_000_000.0,
            Self::M500 => 500_000_000.0,
            Self::B1 => 1_000_000_000.0,
            Self::B2 => 2_000_000_000.0,
            Self::B5 => 5_000_000_000.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::M250 => "250M",
            Self::M500 => "500M",
            Self::B1 => "1B",
            Self::B2 => "2B",
            Self::B5 => "5B",
        }
    }
}

impl fmt::Display for VolumeThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VolumeThreshold {
    type Err = ConfigError;

    /// Accepts "1B", "500m", "$2B+" or a raw USD amount like "250000000".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_start_matches('$')
            .trim_end_matches('+')
            .to_uppercase();

        if let Some(t) = Self::ALL.into_iter().find(|t| t.as_str() == cleaned) {
            return Ok(t);
        }

        cleaned
            .parse::<f64>()
            .ok()
            .and_then(|usd| Self::ALL.into_iter().find(|t| t.usd() == usd))
            .ok_or_else(|| ConfigError::UnknownThreshold(s.to_string()))
    }
}

impl TryFrom<String> for VolumeThreshold {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Display bracket for a volume. Finer than the threshold set at the
/// bottom so entries under the smallest threshold still get a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum VolumeTier {
    #[serde(rename = "<250M")]
    Under250M,
    #[serde(rename = "250M")]
    M250,
    #[serde(rename = "500M")]
    M500,
    #[serde(rename = "1B")]
    B1,
    #[serde(rename = "2B")]
    B2,
    #[serde(rename = "5B")]
    B5,
}

impl VolumeTier {
    /// Highest first, so the first bracket met wins.
    const BRACKETS: [(f64, VolumeTier); 5] = [
        (5_000_000_000.0, Self::B5),
        (2_000_000_000.0, Self::B2),
        (1_000_000_000.0, Self::B1),
        (500_000_000.0, Self::M500),
        (250_000_000.0, Self::M250),
    ];

    pub fn for_volume(volume: f64) -> Self {
        Self::BRACKETS
            .iter()
            .find(|(floor, _)| volume >= *floor)
            .map(|(_, tier)| *tier)
            .unwrap_or(Self::Under250M)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Under250M => "<$250M",
            Self::M250 => "$250M+",
            Self::M500 => "$500M+",
            Self::B1 => "$1B+",
            Self::B2 => "$2B+",
            Self::B5 => "$5B+",
        }
    }

    /// Coloured dot shown in front of each menu row.
    pub fn marker(self) -> &'static str {
        match self {
            Self::B1 | Self::B2 | Self::B5 => "🔵",
            Self::M500 => "⚪",
            Self::M250 | Self::Under250M => "🟢",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub asset: AssetKey,
    /// Pair the entry was taken from, e.g. "BTCUSDT"
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
    pub volume: f64,
    pub tier: VolumeTier,
    pub chart_url: String,
}

/// Result of one scheduler cycle. Replaced wholesale every cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSnapshot {
    pub entries: Vec<RankedEntry>,
    pub success: bool,
    /// Time of the last successful fetch, 0 before the first one
    pub updated_ms: u64,
    pub attempted_ms: u64,
    pub threshold: VolumeThreshold,
    pub error: Option<String>,
}

impl PipelineSnapshot {
    /// Placeholder published before the first cycle completes.
    pub fn empty(threshold: VolumeThreshold) -> Self {
        Self {
            entries: Vec::new(),
            success: false,
            updated_ms: 0,
            attempted_ms: 0,
            threshold,
            error: None,
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// No fetch has finished yet, successfully or not.
    pub fn is_pending(&self) -> bool {
        !self.success && self.updated_ms == 0 && self.error.is_none()
    }

    pub fn is_stale(&self) -> bool {
        !self.success && !self.is_pending()
    }

    pub fn find(&self, asset: &str) -> Option<&RankedEntry> {
        self.entries
            .iter()
            .find(|e| e.asset.as_str().eq_ignore_ascii_case(asset))
    }
}
