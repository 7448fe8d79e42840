// Retrying front end over a market data provider. Callers get `None`
// instead of provider errors.
use std::sync::Arc;

use shared::models::{Candle, Series, TimeFrame};

use super::MarketDataProvider;
use crate::error::EngineError;
use crate::retry::RetryPolicy;

#[derive(Clone)]
pub struct SeriesFetcher {
    provider: Arc<dyn MarketDataProvider>,
    retry: RetryPolicy,
}

impl SeriesFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Latest traded price. Non-positive or non-finite quotes count as absent.
    pub async fn fetch_price(&self, asset: &str) -> Option<f64> {
        let provider = &self.provider;
        self.retry
            .run("current_price", asset, move || async move {
                let price = provider.current_price(asset).await?;
                Ok::<_, EngineError>(price.filter(|p| p.is_finite() && *p > 0.0))
            })
            .await
    }

    /// The most recent `count` candles, ascending. An empty series counts as
    /// absent.
    pub async fn fetch_series(&self, asset: &str, interval: TimeFrame, count: usize) -> Option<Series> {
        let provider = &self.provider;
        self.retry
            .run("ohlcv", asset, move || async move {
                let series = provider.ohlcv(asset, interval, count).await?;
                Ok::<_, EngineError>(series
                    .filter(|s| !s.is_empty())
                    .map(|s| s.truncate_front(count)))
            })
            .await
    }

    /// Latest daily candle, used for ranking by traded value.
    pub async fn fetch_daily(&self, asset: &str) -> Option<Candle> {
        let series = self.fetch_series(asset, TimeFrame::Day, 1).await?;
        series.latest().copied()
    }

    /// Listed assets for a quote currency; empty when the listing cannot be
    /// fetched.
    pub async fn list_assets(&self, quote: &str) -> Vec<String> {
        let provider = &self.provider;
        self.retry
            .run("list_assets", quote, move || async move {
                let assets = provider.list_assets(quote).await?;
                Ok::<_, EngineError>(Some(assets).filter(|a| !a.is_empty()))
            })
            .await
            .unwrap_or_default()
    }
}
