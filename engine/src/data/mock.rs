// Scripted in-memory provider for unit tests.
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use shared::models::{Candle, Series, TimeFrame};

use super::MarketDataProvider;
use crate::error::{EngineError, Result};

/// Answers come from per-asset queues; the last entry of a queue is repeated
/// once the others are used up. `fail_first` makes the first `n` calls of
/// every operation for an asset return a provider error.
#[derive(Default)]
pub struct MockProvider {
    prices: Mutex<HashMap<String, VecDeque<f64>>>,
    series: Mutex<HashMap<(String, TimeFrame), VecDeque<Vec<Candle>>>>,
    listing: Vec<String>,
    failures: HashMap<String, usize>,
    calls: Mutex<HashMap<(&'static str, String), usize>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(self, asset: &str, prices: &[f64]) -> Self {
        self.prices
            .lock()
            .unwrap()
            .insert(asset.to_string(), prices.iter().copied().collect());
        self
    }

    pub fn with_series(self, asset: &str, interval: TimeFrame, candles: Vec<Candle>) -> Self {
        self.with_series_sequence(asset, interval, vec![candles])
    }

    pub fn with_series_sequence(self, asset: &str, interval: TimeFrame, seq: Vec<Vec<Candle>>) -> Self {
        self.series
            .lock()
            .unwrap()
            .insert((asset.to_string(), interval), seq.into_iter().collect());
        self
    }

    pub fn with_listing(mut self, assets: &[&str]) -> Self {
        self.listing = assets.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn fail_first(mut self, asset: &str, n: usize) -> Self {
        self.failures.insert(asset.to_string(), n);
        self
    }

    pub fn calls(&self, op: &'static str, asset: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&(op, asset.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, op: &'static str, asset: &str) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let count = calls.entry((op, asset.to_string())).or_insert(0);
        *count += 1;
        let fail_for = self.failures.get(asset).copied().unwrap_or(0);
        if *count <= fail_for {
            return Err(EngineError::ProviderError(format!("{} unavailable for {}", op, asset)));
        }
        Ok(())
    }

    fn next<T: Clone>(queue: Option<&mut VecDeque<T>>) -> Option<T> {
        let queue = queue?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn current_price(&self, asset: &str) -> Result<Option<f64>> {
        self.record("current_price", asset)?;
        let mut prices = self.prices.lock().unwrap();
        Ok(Self::next(prices.get_mut(asset)))
    }

    async fn ohlcv(&self, asset: &str, interval: TimeFrame, count: usize) -> Result<Option<Series>> {
        self.record("ohlcv", asset)?;
        let mut series = self.series.lock().unwrap();
        let candles = Self::next(series.get_mut(&(asset.to_string(), interval)));
        Ok(candles.map(|c| Series::new(asset, interval, c).truncate_front(count)))
    }

    async fn list_assets(&self, quote: &str) -> Result<Vec<String>> {
        self.record("list_assets", quote)?;
        let prefix = format!("{}-", quote);
        Ok(self
            .listing
            .iter()
            .filter(|a| a.starts_with(&prefix))
            .cloned()
            .collect())
    }
}
