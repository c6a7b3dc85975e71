use super::MarketDataSource;
use crate::config::Config;
use crate::errors::FetchError;
use crate::models::TickerRecord;
use async_trait::async_trait;
use serde::Deserialize;

/// The raw JSON shape Binance sends back for each pair on /fapi/v1/ticker/24hr.
/// Numbers arrive as decimal strings; everything else is ignored.
#[derive(Debug, Deserialize)]
struct Ticker24hResponse {
    symbol: String,

    #[serde(rename = "lastPrice")]
    last_price: String,

    #[serde(rename = "priceChangePercent")]
    price_change_percent: String,

    #[serde(rename = "quoteVolume")]
    quote_volume: String,
}

impl Ticker24hResponse {
    fn into_record(self) -> Result<TickerRecord, FetchError> {
        let last_price = parse_decimal(&self.symbol, "lastPrice", &self.last_price)?;
        let price_change_percent =
            parse_decimal(&self.symbol, "priceChangePercent", &self.price_change_percent)?;
        let quote_volume = parse_decimal(&self.symbol, "quoteVolume", &self.quote_volume)?;

        Ok(TickerRecord {
            symbol: self.symbol,
            last_price,
            price_change_percent,
            quote_volume,
        })
    }
}

fn parse_decimal(symbol: &str, field: &str, raw: &str) -> Result<f64, FetchError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FetchError::UnexpectedData(format!("{symbol}: invalid {field} {raw:?}")))
}

/// Binance USD-M futures public market data. No auth needed.
pub struct BinanceFutures {
    client: reqwest::Client,
    url: String,
}

impl BinanceFutures {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.ticker_url.clone(),
        })
    }
}

/// Parses a full ticker payload. One bad row fails the whole batch.
pub fn parse_tickers(body: &str) -> Result<Vec<TickerRecord>, FetchError> {
    let raw: Vec<Ticker24hResponse> = serde_json::from_str(body)?;
    raw.into_iter().map(Ticker24hResponse::into_record).collect()
}

#[async_trait]
impl MarketDataSource for BinanceFutures {
    fn name(&self) -> &'static str {
        "binance-futures"
    }

    /// Fetches 24h statistics for every listed pair in a single request.
    async fn fetch_tickers(&self) -> Result<Vec<TickerRecord>, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let records = parse_tickers(&body)?;

        tracing::debug!("[{}] fetched {} tickers", self.name(), records.len());
        Ok(records)
    }
}
