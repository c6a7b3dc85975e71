use crate::errors::FetchError;
use crate::models::TickerRecord;
use async_trait::async_trait;

pub mod binance;

/// Source of 24h ticker statistics. One call is one all-or-nothing fetch;
/// retrying is the scheduler's job.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_tickers(&self) -> Result<Vec<TickerRecord>, FetchError>;
}
