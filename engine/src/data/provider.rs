use async_trait::async_trait;
use shared::models::{Series, TimeFrame};

use crate::error::Result;

/// Source of prices and candle history.
///
/// `Ok(None)` means the provider answered but has nothing for the asset.
/// Callers go through `SeriesFetcher`, which retries both errors and empty
/// answers.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn current_price(&self, asset: &str) -> Result<Option<f64>>;

    /// Up to `count` of the most recent candles, ascending by timestamp.
    async fn ohlcv(&self, asset: &str, interval: TimeFrame, count: usize) -> Result<Option<Series>>;

    /// Assets quoted in `quote` (e.g. `"KRW"`), in the provider's listing order.
    async fn list_assets(&self, quote: &str) -> Result<Vec<String>>;
}
