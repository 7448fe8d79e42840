// In-memory candle store, used as an offline provider replaying CSV feeds.
use async_trait::async_trait;
use shared::models::{Candle, Series, TimeFrame};
use std::collections::{BTreeMap, HashMap};

use super::csv_parser::CandleCsvParser;
use super::MarketDataProvider;
use crate::config::CsvFeed;
use crate::error::{EngineError, Result};

pub struct MarketDataStore {
    // Assets are kept ordered so listings are stable.
    data: BTreeMap<String, HashMap<TimeFrame, Vec<Candle>>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            data: BTreeMap::new(),
        }
    }

    /// Loads every feed into a new store.
    pub fn from_feeds(feeds: &[CsvFeed]) -> Result<Self> {
        let mut store = Self::new();
        for feed in feeds {
            let candles = CandleCsvParser::load_candles_from_csv(&feed.path)?;
            tracing::info!(asset = %feed.asset, interval = %feed.interval, count = candles.len(), "Loaded CSV feed");
            store.add_candles(&feed.asset, feed.interval, candles)?;
        }
        Ok(store)
    }

    pub fn add_candles(&mut self, asset: &str, timeframe: TimeFrame, new_candles: Vec<Candle>) -> Result<()> {
        if let Some(bad) = new_candles.iter().find(|c| !c.is_finite()) {
            return Err(EngineError::MarketDataError(format!(
                "non-finite candle for {} at {}",
                asset, bad.timestamp
            )));
        }
        let asset_data = self.data.entry(asset.to_string()).or_default();
        let timeframe_data = asset_data.entry(timeframe).or_default();

        timeframe_data.extend(new_candles);
        timeframe_data.sort_by_key(|c| c.timestamp);
        timeframe_data.dedup_by_key(|c| c.timestamp);

        Ok(())
    }

    pub fn get_candles(&self, asset: &str, timeframe: TimeFrame) -> Option<&[Candle]> {
        self.data
            .get(asset)
            .and_then(|asset_data| asset_data.get(&timeframe))
            .map(Vec::as_slice)
    }

    /// Most recent candle for `asset` across all stored intervals.
    pub fn latest_candle(&self, asset: &str) -> Option<Candle> {
        self.data
            .get(asset)?
            .values()
            .filter_map(|candles| candles.last())
            .max_by_key(|c| c.timestamp)
            .copied()
    }

    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for MarketDataStore {
    async fn current_price(&self, asset: &str) -> Result<Option<f64>> {
        Ok(self.latest_candle(asset).map(|c| c.close))
    }

    async fn ohlcv(&self, asset: &str, interval: TimeFrame, count: usize) -> Result<Option<Series>> {
        Ok(self
            .get_candles(asset, interval)
            .filter(|candles| !candles.is_empty())
            .map(|candles| Series::new(asset, interval, candles.to_vec()).truncate_front(count)))
    }

    async fn list_assets(&self, quote: &str) -> Result<Vec<String>> {
        let prefix = format!("{}-", quote);
        Ok(self
            .assets()
            .filter(|a| a.starts_with(&prefix))
            .map(str::to_string)
            .collect())
    }
}
