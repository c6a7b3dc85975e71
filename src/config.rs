use crate::errors::ConfigError;
use crate::models::VolumeThreshold;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TICKER_URL: &str = "https://fapi.binance.com/fapi/v1/ticker/24hr";

#[derive(Debug, Clone)]
pub struct Config {
    pub ticker_url: String,
    pub min_volume: VolumeThreshold,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub eligible_quotes: Vec<String>,
    pub max_abs_change_pct: f64,
    pub api_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticker_url: DEFAULT_TICKER_URL.to_string(),
            min_volume: VolumeThreshold::default(),
            refresh_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(10),
            eligible_quotes: vec!["USDT".to_string()],
            max_abs_change_pct: 150.0,
            api_port: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ticker_url = lookup("TICKER_URL").unwrap_or(defaults.ticker_url);

        let min_volume = match lookup("MIN_VOLUME") {
            Some(v) => v.parse()?,
            None => defaults.min_volume,
        };

        // default to USDT-margined perpetuals only
        let eligible_quotes = match lookup("ELIGIBLE_QUOTES") {
            Some(v) => {
                let quotes: Vec<String> = v
                    .split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if quotes.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "ELIGIBLE_QUOTES",
                        value: v,
                    });
                }
                quotes
            }
            None => defaults.eligible_quotes,
        };

        let refresh_secs: u64 = parse_or(&lookup, "REFRESH_INTERVAL_SECS", 60)?;
        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?;
        if refresh_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REFRESH_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let max_abs_change_pct: f64 =
            parse_or(&lookup, "MAX_ABS_CHANGE_PCT", defaults.max_abs_change_pct)?;
        // NaN would make every comparison false and let all movers through
        if !max_abs_change_pct.is_finite() || max_abs_change_pct < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_ABS_CHANGE_PCT",
                value: max_abs_change_pct.to_string(),
            });
        }

        let api_port = parse_or(&lookup, "API_PORT", defaults.api_port)?;

        Ok(Self {
            ticker_url,
            min_volume,
            refresh_interval: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            eligible_quotes,
            max_abs_change_pct,
            api_port,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
